//! Everything needed to declare a schema and work with its rows.

pub use crate::config::SchemaConfig;
pub use crate::core::{FieldFlags, FieldType, Result, SchemaError, SelectLevel, Value};
pub use crate::expression::{JoinAliasLocator, is_valid_identifier, table_alias};
pub use crate::localization::{LocalText, LocalTextCatalog, LocalTextRegistry};
pub use crate::row::{DataReader, FormatProvider, Row, ValueReader};
pub use crate::schema::{Criteria, Field, LeftJoin, RowFields};
