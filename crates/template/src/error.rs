use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {name} (looked in {})", path.display())]
    NotFound { name: String, path: PathBuf },

    #[error("Failed to read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Render error: {0}")]
    Render(#[from] minijinja::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Invalid watch pattern: {0}")]
    Pattern(#[from] globset::Error),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
