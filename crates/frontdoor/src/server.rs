use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state, routing::get};
use futures::future::BoxFuture;
use mqe_template::{TemplateCache, TemplatePaths, TemplateWatcher};
use tokio::sync::watch;
pub use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::error::{FrontdoorError, Result};
use crate::mystique::{Renderer, install};

pub struct ServerBuilder {
    listen_address: Option<SocketAddr>,
    templates: Option<PathBuf>,
    dev: bool,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            listen_address: None,
            templates: None,
            dev: false,
        }
    }

    pub fn with_listen_address(mut self, listen_address: SocketAddr) -> Self {
        self.listen_address = Some(listen_address);
        self
    }

    pub fn with_templates(mut self, templates: impl Into<PathBuf>) -> Self {
        self.templates = Some(templates.into());
        self
    }

    /// Enables the template watcher.
    pub fn with_dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    pub fn build(self) -> Result<Server> {
        let listen_address = self
            .listen_address
            .ok_or(FrontdoorError::MissingListenAddress)?;
        let templates = self.templates.ok_or(FrontdoorError::MissingTemplatesDir)?;

        Ok(Server {
            listen_address,
            paths: TemplatePaths::new(templates),
            dev: self.dev,
            cache: Arc::new(TemplateCache::new()),
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Server {
    listen_address: SocketAddr,
    paths: TemplatePaths,
    dev: bool,
    cache: Arc<TemplateCache>,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn is_dev(&self) -> bool {
        self.dev
    }

    pub fn cache(&self) -> &Arc<TemplateCache> {
        &self.cache
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::from_dir(self.paths.clone(), self.cache.clone())
    }

    /// Serves `routes` with the render context installed on every request.
    pub fn serve(self, routes: Router) -> Serve {
        Serve { server: self, routes }
    }
}

/// Wraps application routes with the render middleware, a health check and
/// the HTTP tracing and CORS layers.
pub fn router(renderer: Renderer, routes: Router) -> Router {
    routes
        .layer(from_fn_with_state(renderer, install))
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

struct ServiceHandler {
    server: Server,
    routes: Router,
}

impl ServiceHandler {
    async fn run(self, cancel_token: CancellationToken) -> anyhow::Result<()> {
        let ServiceHandler { server, routes } = self;

        let watcher = if server.dev {
            Some(TemplateWatcher::spawn(
                &server.paths,
                server.cache.clone(),
                cancel_token.child_token(),
            )?)
        } else {
            None
        };

        let router = router(server.renderer(), routes);

        let listener = tokio::net::TcpListener::bind(server.listen_address).await?;

        match listener.local_addr() {
            Ok(listen_address) => {
                info!("Axum server listening on {}", listen_address);
            }
            Err(e) => {
                error!("Failed to get local address: {}", e);
            }
        }

        let signal = {
            let cancel_token = cancel_token.clone();
            async move {
                cancel_token.cancelled().await;
            }
        };

        let result = axum::serve(listener, router)
            .with_graceful_shutdown(signal)
            .await
            .map_err(anyhow::Error::from);

        if let Some(watcher) = watcher {
            cancel_token.cancel();
            watcher.join().await;
        }

        result
    }
}

pub struct Serve {
    server: Server,
    routes: Router,
}

impl Serve {
    pub fn with_graceful_shutdown<F>(self, signal: F) -> WithGracefulShutdown<F, Self>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        WithGracefulShutdown::new(signal, self)
    }
}

pub trait ServeWithGracefulShutdown: Send + 'static {
    fn run(self, cancel_token: CancellationToken) -> impl Future<Output = anyhow::Result<()>> + Send + 'static;
}

impl ServeWithGracefulShutdown for Serve {
    async fn run(self, cancel_token: CancellationToken) -> anyhow::Result<()> {
        let Serve { server, routes } = self;

        info!(dev = server.dev, templates = %server.paths.root().display(), "Starting server");

        ServiceHandler { server, routes }.run(cancel_token).await
    }
}

impl IntoFuture for Serve {
    type Output = anyhow::Result<()>;
    type IntoFuture = BoxFuture<'static, anyhow::Result<()>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.run(CancellationToken::new()).await })
    }
}

pub struct WithGracefulShutdown<F, S> {
    signal: F,
    serve: S,
}

impl<F, S> WithGracefulShutdown<F, S>
where
    F: Future<Output = ()> + Send + 'static,
    S: ServeWithGracefulShutdown,
{
    pub fn new(signal: F, serve: S) -> Self {
        Self { signal, serve }
    }

    async fn run(self) -> anyhow::Result<()> {
        let Self { signal, serve } = self;

        let cancel_token = CancellationToken::new();

        let (signal_tx, signal_rx) = watch::channel(());

        tokio::spawn(async move {
            signal.await;
            info!("Received graceful shutdown signal. Telling tasks to shutdown");
            drop(signal_rx);
        });

        let mut serve_handle = tokio::spawn(serve.run(cancel_token.clone()));

        // the server may exit on its own, e.g. when the listener fails to bind
        let finished = tokio::select! {
            _ = signal_tx.closed() => None,
            result = &mut serve_handle => Some(result),
        };

        let result = match finished {
            Some(result) => result,
            None => {
                cancel_token.cancel();
                serve_handle.await
            }
        };
        result??;

        info!("Server shutdown complete");

        Ok(())
    }
}

impl<F, S> IntoFuture for WithGracefulShutdown<F, S>
where
    F: Future<Output = ()> + Send + 'static,
    S: ServeWithGracefulShutdown,
{
    type Output = anyhow::Result<()>;
    type IntoFuture = BoxFuture<'static, anyhow::Result<()>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.run().await })
    }
}
