pub mod criteria;
pub mod field;
pub mod fields;
pub mod join;

pub use criteria::{Criteria, CriteriaOp};
pub use field::Field;
pub use fields::RowFields;
pub use join::LeftJoin;
