use std::path::{Component, Path, PathBuf};

/// Directory under the template root holding top-level views.
pub const CONTAINERS_DIR: &str = "containers";

/// Extension appended to view names that carry none.
pub const TEMPLATE_EXTENSION: &str = "html";

/// Files the dev watcher reacts to, relative to the template root.
pub const WATCH_GLOB: &str = "**/*.html";

/// Resolves logical template names to files beneath a template root.
#[derive(Debug, Clone)]
pub struct TemplatePaths {
    root: PathBuf,
}

impl TemplatePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative name of a view: `mystique` becomes `containers/mystique.html`.
    pub fn view_name(&self, view: &str) -> String {
        with_extension(&format!("{CONTAINERS_DIR}/{view}"))
    }

    /// Included or extended templates resolve against the root, not `containers/`.
    ///
    /// Returns `None` for names that could leave the root: absolute paths,
    /// drive prefixes, `.` or `..` components.
    pub fn resolve_include(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let contained = relative.components().next().is_some()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));

        contained.then(|| self.root.join(relative))
    }

    pub fn watch_root(&self) -> &Path {
        &self.root
    }
}

fn with_extension(name: &str) -> String {
    if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{name}.{TEMPLATE_EXTENSION}")
    }
}
