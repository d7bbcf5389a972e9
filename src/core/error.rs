use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unexpected token when deserializing row: {0}")]
    Deserialization(String),

    #[error("Field '{0}' already exists")]
    DuplicateField(String),

    #[error("Join alias '{0}' already exists")]
    DuplicateJoin(String),

    #[error("Field '{0}' not found in '{1}'")]
    FieldNotFound(String, String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Reader error: {0}")]
    Reader(String),
}

impl SchemaError {
    /// Raised when a required piece of metadata is unset at the point of use.
    pub fn missing(property: &str) -> Self {
        Self::Configuration(format!("'{}' is not set", property))
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
