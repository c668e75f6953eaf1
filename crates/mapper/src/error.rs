use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Dataset has no `data` section")]
    MissingData,

    #[error("Dataset has no `descriptions` section")]
    MissingDescriptions,
}

pub type Result<T> = std::result::Result<T, MappingError>;
