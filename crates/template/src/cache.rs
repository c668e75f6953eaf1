use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

/// Namespace under which template modules are cached.
pub const TEMPLATE_NAMESPACE: &str = "mystique";

/// A template source loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateModule {
    /// Cache key, `<namespace>:<relative name>`.
    pub id: String,
    /// Name the template engine knows this module by.
    pub name: String,
    pub path: PathBuf,
    pub source: String,
}

pub fn module_id(namespace: &str, name: &str) -> String {
    format!("{namespace}:{name}")
}

/// Eviction interface used by the dev watcher.
pub trait ModuleCache: Send + Sync {
    /// Drops every module in `namespace` and returns how many were removed.
    fn invalidate(&self, namespace: &str) -> usize;
}

#[derive(Debug, Default)]
struct Modules {
    /// Bumped by every invalidation.
    generation: u64,
    entries: HashMap<String, Arc<TemplateModule>>,
}

/// Process-wide cache of loaded template modules.
///
/// Loaders read [`generation`](Self::generation) before going to disk and
/// pass it back to [`insert`](Self::insert), so a source read before an
/// invalidation never lands in the cache after it.
#[derive(Debug, Default)]
pub struct TemplateCache {
    modules: RwLock<Modules>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.modules.read().generation
    }

    pub fn get(&self, id: &str) -> Option<Arc<TemplateModule>> {
        self.modules.read().entries.get(id).cloned()
    }

    /// Caches `module` unless the cache was invalidated since `generation`
    /// was read. The module is returned either way.
    pub fn insert(&self, module: TemplateModule, generation: u64) -> Arc<TemplateModule> {
        let module = Arc::new(module);

        let mut modules = self.modules.write();
        if modules.generation == generation {
            modules.entries.insert(module.id.clone(), module.clone());
        }

        module
    }

    pub fn len(&self) -> usize {
        self.modules.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().entries.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.modules.read().entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl ModuleCache for TemplateCache {
    fn invalidate(&self, namespace: &str) -> usize {
        let prefix = format!("{namespace}:");
        let mut modules = self.modules.write();
        modules.generation += 1;

        let before = modules.entries.len();
        modules.entries.retain(|id, _| !id.starts_with(&prefix));
        before - modules.entries.len()
    }
}
