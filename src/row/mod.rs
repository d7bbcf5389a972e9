pub mod field_value;
pub mod format;
pub mod reader;
pub mod row;

pub use field_value::token_kind;
pub use format::FormatProvider;
pub use reader::{DataReader, ValueReader};
pub use row::Row;
