/// Alias of the primary (un-joined) table in generated queries.
pub const PRIMARY_ALIAS: &str = "T0";

/// True for plain SQL identifiers: a letter or underscore followed by
/// letters, digits or underscores.
pub fn is_valid_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Positional table alias: `0` is the primary table, `1` is `T1`, and so on.
pub fn table_alias(index: usize) -> String {
    format!("T{}", index)
}
