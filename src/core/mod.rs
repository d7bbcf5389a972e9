pub mod error;
pub mod types;
pub mod value;

pub use error::{Result, SchemaError};
pub use types::{FieldFlags, FieldType, SelectLevel};
pub use value::Value;
