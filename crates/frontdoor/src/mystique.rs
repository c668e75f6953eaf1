use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{Html, Response},
};
use mqe_mapper::{Dataset, meta};
use mqe_template::{FsTemplateLoader, TemplateCache, TemplateLoader, TemplatePaths, TemplateRenderer};
use tracing::debug;

use crate::error::RenderError;

/// View rendered when a handler does not name one.
pub const DEFAULT_VIEW: &str = "mystique";

/// Shared rendering pipeline: dataset mapping, template loading and rendering.
#[derive(Clone)]
pub struct Renderer {
    templates: TemplateRenderer,
}

impl Renderer {
    pub fn new(loader: Arc<dyn TemplateLoader>) -> Self {
        Self {
            templates: TemplateRenderer::new(loader),
        }
    }

    pub fn from_dir(paths: TemplatePaths, cache: Arc<TemplateCache>) -> Self {
        Self::new(Arc::new(FsTemplateLoader::new(paths, cache)))
    }

    pub fn render(&self, view: &str, dataset: &Dataset) -> Result<String, RenderError> {
        let mapped = meta(dataset)?;
        let module = self.templates.loader().load(view)?;

        debug!(view, module = %module.id, rows = mapped.data.len(), "rendering dataset");

        Ok(self.templates.render_dataset(&module, &mapped)?)
    }
}

/// Per-request render context, extracted by handlers.
///
/// ```rust,ignore
/// async fn users(mystique: Mystique) -> Result<Html<String>, RenderError> {
///     mystique.render(Some("users"), &load_users().await)
/// }
/// ```
#[derive(Clone)]
pub struct Mystique {
    renderer: Renderer,
}

impl Mystique {
    pub fn new(renderer: Renderer) -> Self {
        Self { renderer }
    }

    pub fn render(&self, view: Option<&str>, dataset: &Dataset) -> Result<Html<String>, RenderError> {
        let view = view.unwrap_or(DEFAULT_VIEW);
        self.renderer.render(view, dataset).map(Html)
    }

    pub fn render_default(&self, dataset: &Dataset) -> Result<Html<String>, RenderError> {
        self.render(None, dataset)
    }
}

impl<S> FromRequestParts<S> for Mystique
where
    S: Send + Sync,
{
    type Rejection = RenderError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Mystique>()
            .cloned()
            .ok_or(RenderError::NotInstalled)
    }
}

/// Middleware installing a fresh [`Mystique`] on every request before the
/// downstream handler runs. Use with `axum::middleware::from_fn_with_state`.
pub async fn install(State(renderer): State<Renderer>, mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(Mystique::new(renderer));
    next.run(request).await
}
