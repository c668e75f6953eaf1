use std::io::ErrorKind;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{TEMPLATE_NAMESPACE, TemplateCache, TemplateModule, module_id};
use crate::error::{Result, TemplateError};
use crate::paths::TemplatePaths;

/// Resolves template names to loaded modules.
pub trait TemplateLoader: Send + Sync {
    /// Loads a top-level view, e.g. `mystique`.
    fn load(&self, view: &str) -> Result<Arc<TemplateModule>>;

    /// Loads a template referenced from another one by its root-relative name.
    fn load_include(&self, name: &str) -> Result<Arc<TemplateModule>>;
}

/// Reads templates from disk, going through the shared module cache.
#[derive(Debug, Clone)]
pub struct FsTemplateLoader {
    paths: TemplatePaths,
    cache: Arc<TemplateCache>,
}

impl FsTemplateLoader {
    pub fn new(paths: TemplatePaths, cache: Arc<TemplateCache>) -> Self {
        Self { paths, cache }
    }

    pub fn paths(&self) -> &TemplatePaths {
        &self.paths
    }

    pub fn cache(&self) -> &Arc<TemplateCache> {
        &self.cache
    }

    fn load_module(&self, name: &str) -> Result<Arc<TemplateModule>> {
        let id = module_id(TEMPLATE_NAMESPACE, name);
        if let Some(module) = self.cache.get(&id) {
            return Ok(module);
        }

        let Some(path) = self.paths.resolve_include(name) else {
            warn!(name, "rejected template name outside the template root");
            return Err(TemplateError::NotFound {
                name: name.to_string(),
                path: self.paths.root().to_path_buf(),
            });
        };

        let generation = self.cache.generation();

        // Blocking read on the request task. Only cache misses get here and
        // rendering is synchronous end to end.
        let source = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TemplateError::NotFound {
                name: name.to_string(),
                path: path.clone(),
            },
            _ => TemplateError::Io {
                path: path.clone(),
                source: e,
            },
        })?;

        debug!(module = %id, path = %path.display(), "loaded template");

        Ok(self.cache.insert(
            TemplateModule {
                id,
                name: name.to_string(),
                path,
                source,
            },
            generation,
        ))
    }
}

impl TemplateLoader for FsTemplateLoader {
    fn load(&self, view: &str) -> Result<Arc<TemplateModule>> {
        self.load_module(&self.paths.view_name(view))
    }

    fn load_include(&self, name: &str) -> Result<Arc<TemplateModule>> {
        self.load_module(name)
    }
}
