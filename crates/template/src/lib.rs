//! Template collaborators for Mystique views: path resolution, a process-wide
//! module cache, a file-system loader, a minijinja renderer and the dev-mode
//! watcher that invalidates the cache when templates change on disk.

mod cache;
mod error;
mod loader;
mod paths;
mod render;
pub mod watcher;

pub use cache::{ModuleCache, TEMPLATE_NAMESPACE, TemplateCache, TemplateModule, module_id};
pub use error::{Result, TemplateError};
pub use loader::{FsTemplateLoader, TemplateLoader};
pub use paths::{CONTAINERS_DIR, TEMPLATE_EXTENSION, TemplatePaths, WATCH_GLOB};
pub use render::{RenderContext, TemplateRenderer};
pub use watcher::TemplateWatcher;
