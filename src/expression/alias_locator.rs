use indexmap::IndexSet;
use regex::Regex;

lazy_static::lazy_static! {
    // '...' with '' as an escaped quote
    static ref STRING_LITERAL: Regex = Regex::new(r"'(?:[^']|'')*'").unwrap();

    // <alias>.<column>, where the column may also be [bracketed] or "quoted"
    static ref ALIAS_REFERENCE: Regex =
        Regex::new(r#"([A-Za-z_][A-Za-z0-9_]*)\.[A-Za-z_\["]"#).unwrap();
}

/// Finds the join aliases an SQL expression refers to.
pub struct JoinAliasLocator;

impl JoinAliasLocator {
    /// Every distinct `alias` appearing as the leading part of an
    /// `alias.column` reference, in order of first appearance.
    ///
    /// Text inside string literals is ignored, and only the first segment of
    /// a multi-part name counts (`a.b.c` yields `a`).
    pub fn locate(expression: &str) -> IndexSet<String> {
        let mut aliases = IndexSet::new();
        if !expression.contains('.') {
            return aliases;
        }

        let stripped = STRING_LITERAL.replace_all(expression, "''");
        let bytes = stripped.as_bytes();

        for caps in ALIAS_REFERENCE.captures_iter(&stripped) {
            let Some(alias) = caps.get(1) else { continue };

            // Reject matches that start in the middle of a longer token or
            // continue a dotted name.
            if alias.start() > 0 {
                let prev = bytes[alias.start() - 1];
                if prev.is_ascii_alphanumeric() || prev == b'_' || prev == b'.' {
                    continue;
                }
            }

            aliases.insert(alias.as_str().to_string());
        }

        aliases
    }
}
