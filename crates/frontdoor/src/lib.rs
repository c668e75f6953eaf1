//! HTTP front door for Mystique views.
//!
//! [`install`] runs as axum middleware and hands every request a fresh
//! [`Mystique`] render context. Handlers extract it and call
//! [`Mystique::render`] with a dataset, which is mapped into field
//! view-models and rendered through the configured view.

mod error;
mod mystique;
mod server;

pub use error::{FrontdoorError, RenderError, Result};
pub use mystique::{DEFAULT_VIEW, Mystique, Renderer, install};
pub use server::{
    CancellationToken, Serve, ServeWithGracefulShutdown, Server, ServerBuilder,
    WithGracefulShutdown, router,
};
