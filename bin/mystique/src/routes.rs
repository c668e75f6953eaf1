use axum::{Json, Router, extract::Path, response::Html, routing::post};
use mqe_frontdoor::{Mystique, RenderError};
use mqe_mapper::Dataset;

pub fn routes() -> Router {
    Router::new()
        .route("/render", post(render_default))
        .route("/render/{view}", post(render_view))
}

async fn render_default(mystique: Mystique, Json(dataset): Json<Dataset>) -> Result<Html<String>, RenderError> {
    mystique.render_default(&dataset)
}

async fn render_view(
    mystique: Mystique,
    Path(view): Path<String>,
    Json(dataset): Json<Dataset>,
) -> Result<Html<String>, RenderError> {
    mystique.render(Some(&view), &dataset)
}
