// ============================================================================
// rowschema: field descriptors for row schemas
// ============================================================================

pub mod core;
pub mod config;
pub mod expression;
pub mod localization;
pub mod prelude;
pub mod row;
pub mod schema;

// Re-export main types for convenience
pub use crate::core::{FieldFlags, FieldType, Result, SchemaError, SelectLevel, Value};
pub use crate::config::SchemaConfig;
pub use crate::localization::{LocalText, LocalTextCatalog, LocalTextRegistry};
pub use crate::row::{DataReader, FormatProvider, Row, ValueReader};
pub use crate::schema::{Criteria, Field, LeftJoin, RowFields};
