pub mod alias_locator;
pub mod identifier;

pub use alias_locator::JoinAliasLocator;
pub use identifier::{is_valid_identifier, table_alias, PRIMARY_ALIAS};
