use std::sync::{Arc, OnceLock};

use indexmap::IndexSet;

use super::{Criteria, LeftJoin, RowFields};
use crate::core::{FieldFlags, FieldType, Result, SchemaError, SelectLevel, Value};
use crate::expression::{JoinAliasLocator, PRIMARY_ALIAS, is_valid_identifier, table_alias};
use crate::localization::{LocalText, LocalTextRegistry};

/// Metadata for one column or expression of a row schema.
///
/// A field is declared with [`Field::new`] and the `with_*` builders, then
/// handed to [`RowFields::add`], which assigns its index. Setters exist for
/// schema customization before the schema is shared; nothing here is
/// expected to change afterwards.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    field_type: FieldType,
    index: Option<usize>,
    size: usize,
    scale: usize,
    flags: FieldFlags,
    caption: Option<LocalText>,
    auto_text_key: OnceLock<String>,
    property_name: Option<String>,
    default_value: Value,
    row_type: Option<String>,
    expression: Option<String>,
    referenced_joins: Option<IndexSet<String>>,
    join_alias: Option<String>,
    origin: Option<String>,
    // Set only on a successful lookup; a miss is retried on the next read.
    join: OnceLock<Arc<LeftJoin>>,
    foreign_table: Option<String>,
    foreign_field: Option<String>,
    min_select_level: SelectLevel,
    natural_order: i32,
}

impl Field {
    pub fn new(field_type: FieldType, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            index: None,
            size: 0,
            scale: 0,
            flags: FieldFlags::DEFAULT,
            caption: None,
            auto_text_key: OnceLock::new(),
            property_name: None,
            default_value: Value::Null,
            row_type: None,
            expression: None,
            referenced_joins: None,
            join_alias: None,
            origin: None,
            join: OnceLock::new(),
            foreign_table: None,
            foreign_field: None,
            min_select_level: SelectLevel::Default,
            natural_order: 0,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<LocalText>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_scale(mut self, scale: usize) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_property_name(mut self, property_name: &str) -> Self {
        self.set_property_name(Some(property_name));
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn with_expression(mut self, expression: &str) -> Self {
        self.set_expression(Some(expression));
        self
    }

    pub fn with_foreign(mut self, table: &str, field: Option<&str>) -> Self {
        self.set_foreign_table(Some(table));
        self.set_foreign_field(field);
        self.flags.insert(FieldFlags::FOREIGN);
        self
    }

    pub fn with_min_select_level(mut self, level: SelectLevel) -> Self {
        self.min_select_level = level;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Position in the owning collection, `None` until registered.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub(crate) fn register(&mut self, index: usize, row_type: &str) {
        self.index = Some(index);
        self.row_type = Some(row_type.to_string());
        self.reset_text_key();
    }

    pub(crate) fn reset_text_key(&mut self) {
        self.auto_text_key = OnceLock::new();
    }

    pub(crate) fn require_index(&self) -> Result<usize> {
        self.index.ok_or_else(|| {
            SchemaError::Configuration(format!("field '{}' is not registered", self.name))
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn set_size(&mut self, size: usize) {
        self.size = size;
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    pub fn set_scale(&mut self, scale: usize) {
        self.scale = scale;
    }

    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: FieldFlags) {
        self.flags = flags;
    }

    pub fn caption(&self) -> Option<&LocalText> {
        self.caption.as_ref()
    }

    pub fn set_caption(&mut self, caption: Option<LocalText>) {
        self.caption = caption;
    }

    pub fn property_name(&self) -> Option<&str> {
        self.property_name.as_deref()
    }

    pub fn set_property_name(&mut self, property_name: Option<&str>) {
        self.property_name = property_name.map(str::to_string);
        self.reset_text_key();
    }

    /// Key used for this field in external object representations.
    pub fn external_name(&self) -> &str {
        self.property_name.as_deref().unwrap_or(&self.name)
    }

    pub fn default_value(&self) -> &Value {
        &self.default_value
    }

    pub fn set_default_value(&mut self, value: Value) {
        self.default_value = value;
    }

    /// Type name of the owning schema, stamped at registration.
    pub fn row_type(&self) -> Option<&str> {
        self.row_type.as_deref()
    }

    pub fn min_select_level(&self) -> SelectLevel {
        self.min_select_level
    }

    pub fn set_min_select_level(&mut self, level: SelectLevel) {
        self.min_select_level = level;
    }

    pub fn natural_order(&self) -> i32 {
        self.natural_order
    }

    pub fn set_natural_order(&mut self, order: i32) {
        self.natural_order = order;
    }

    /// Display title.
    ///
    /// A caption always wins. Without one, the key
    /// `Db.<prefix>.<property name or name>` is looked up on every call so a
    /// language switch shows up immediately; the key itself is built once.
    ///
    /// `fields` must be the collection that owns this field. The key is
    /// rebuilt after registration, a property name change or
    /// `RowFields::set_local_text_prefix`, but not when another collection
    /// is passed in.
    pub fn title(&self, fields: &RowFields, registry: &dyn LocalTextRegistry) -> String {
        if let Some(caption) = &self.caption {
            return caption.resolve(registry);
        }

        let key = self.auto_text_key.get_or_init(|| {
            format!(
                "{}.{}.{}",
                fields.config().local_text_root,
                fields.local_text_prefix(),
                self.external_name()
            )
        });

        registry
            .try_get(key)
            .unwrap_or_else(|| self.external_name().to_string())
    }

    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    /// Replace the SQL expression and re-derive join wiring from it.
    ///
    /// Blank input clears the expression. Assigning the current value is a
    /// no-op and keeps the cached join.
    pub fn set_expression(&mut self, expression: Option<&str>) {
        let expression = expression.map(str::trim).filter(|e| !e.is_empty());
        if self.expression.as_deref() == expression {
            return;
        }

        self.expression = expression.map(str::to_string);
        self.referenced_joins = None;
        self.join_alias = None;
        self.origin = None;
        self.join = OnceLock::new();

        let Some(expression) = expression else {
            tracing::trace!(field = %self.name, "expression cleared");
            return;
        };

        let aliases = JoinAliasLocator::locate(expression);
        if aliases.is_empty() {
            return;
        }

        if aliases.len() == 1 {
            let alias = &aliases[0];
            let parts: Vec<&str> = expression.split('.').collect();
            if parts.len() == 2 && parts[0] == alias.as_str() && is_valid_identifier(parts[1]) {
                self.join_alias = Some(alias.clone());
                self.origin = Some(parts[1].to_string());
            }
        }

        tracing::trace!(
            field = %self.name,
            expression,
            joins = aliases.len(),
            join_alias = ?self.join_alias,
            "expression updated"
        );
        self.referenced_joins = Some(aliases);
    }

    /// Join aliases the expression mentions, `None` without an expression.
    pub fn referenced_joins(&self) -> Option<&IndexSet<String>> {
        self.referenced_joins.as_ref()
    }

    /// Alias of the join this field passes through, set only for a plain
    /// `alias.column` expression.
    pub fn join_alias(&self) -> Option<&str> {
        self.join_alias.as_deref()
    }

    /// Column name on the joined table for a plain `alias.column` expression.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// SQL used to select this field: its expression, or the column on the
    /// primary table.
    pub fn query_expression(&self) -> String {
        match &self.expression {
            Some(expression) => expression.clone(),
            None => format!("{}.{}", PRIMARY_ALIAS, self.name),
        }
    }

    /// The join named by `join_alias`, looked up in `fields` and memoized.
    ///
    /// Only hits are cached, so a join registered after a miss is found on
    /// the next call. The cache is a set-once cell without a lock: racing
    /// first reads may each perform the lookup, and the first write wins.
    pub fn join(&self, fields: &RowFields) -> Option<Arc<LeftJoin>> {
        if let Some(join) = self.join.get() {
            return Some(join.clone());
        }

        let alias = self.join_alias.as_deref()?;
        match fields.join(alias) {
            Some(join) => {
                let _ = self.join.set(join.clone());
                Some(join)
            }
            None => {
                tracing::debug!(field = %self.name, alias, "join not registered yet");
                None
            }
        }
    }

    pub fn foreign_table(&self) -> Option<&str> {
        self.foreign_table.as_deref()
    }

    pub fn set_foreign_table(&mut self, table: Option<&str>) {
        self.foreign_table = trim_to_none(table);
    }

    pub fn foreign_field(&self) -> Option<&str> {
        self.foreign_field.as_deref()
    }

    pub fn set_foreign_field(&mut self, field: Option<&str>) {
        self.foreign_field = trim_to_none(field);
    }

    /// Build (without registering) a left join from the primary table to
    /// `foreign_table` on this field.
    ///
    /// Without an index the alias is `j` + the name minus a trailing `Id`
    /// (exact case) or `_ID` (any case); with one it is the positional
    /// alias `T<index>`.
    pub fn foreign_join(&self, foreign_index: Option<usize>) -> Result<LeftJoin> {
        let foreign_table = self
            .foreign_table
            .as_deref()
            .ok_or_else(|| SchemaError::missing("foreign_table"))?;

        let alias = match foreign_index {
            Some(index) => table_alias(index),
            None => format!("j{}", strip_id_suffix(&self.name)),
        };

        let join_key = self.foreign_field.as_deref().unwrap_or(&self.name);
        let on = Criteria::field(alias.as_str(), join_key)
            .equals(Criteria::field(PRIMARY_ALIAS, self.name.as_str()));

        LeftJoin::new(foreign_table, &alias, on)
    }
}

fn trim_to_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn strip_id_suffix(name: &str) -> &str {
    if let Some(stripped) = name.strip_suffix("Id") {
        return stripped;
    }

    let len = name.len();
    match name.get(len.saturating_sub(3)..) {
        Some(suffix) if len >= 3 && suffix.eq_ignore_ascii_case("_ID") => &name[..len - 3],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_field_is_unregistered() {
        let field = Field::new(FieldType::Int32, "Amount");
        assert_eq!(field.index(), None);
        assert_eq!(field.min_select_level(), SelectLevel::Default);
        assert_eq!(field.flags(), FieldFlags::DEFAULT);
        assert!(field.require_index().is_err());
    }

    #[test]
    fn test_expression_is_trimmed() {
        let mut field = Field::new(FieldType::String, "CustomerName");
        field.set_expression(Some("  jCustomer.Name  "));
        assert_eq!(field.expression(), Some("jCustomer.Name"));

        field.set_expression(Some("   "));
        assert_eq!(field.expression(), None);
        assert_eq!(field.referenced_joins(), None);
        assert_eq!(field.join_alias(), None);
        assert_eq!(field.origin(), None);
    }

    #[test]
    fn test_invalid_origin_keeps_alias_unset() {
        let mut field = Field::new(FieldType::String, "Odd");
        field.set_expression(Some("j.[Order Date]"));
        assert_eq!(field.referenced_joins().map(|j| j.len()), Some(1));
        assert_eq!(field.join_alias(), None);
        assert_eq!(field.origin(), None);
    }

    #[test]
    fn test_expression_without_alias() {
        let mut field = Field::new(FieldType::Int32, "Total");
        field.set_expression(Some("COUNT(*)"));
        assert_eq!(field.referenced_joins(), None);
        assert_eq!(field.query_expression(), "COUNT(*)");
    }

    #[test]
    fn test_strip_id_suffix() {
        assert_eq!(strip_id_suffix("CustomerId"), "Customer");
        assert_eq!(strip_id_suffix("Customer_ID"), "Customer");
        assert_eq!(strip_id_suffix("Customer_id"), "Customer");
        assert_eq!(strip_id_suffix("CustomerID"), "CustomerID");
        assert_eq!(strip_id_suffix("Id"), "");
        assert_eq!(strip_id_suffix("ID"), "ID");
    }

    #[test]
    fn test_foreign_fields_trim_to_none() {
        let mut field = Field::new(FieldType::Int32, "CountryId");
        field.set_foreign_table(Some("  "));
        assert_eq!(field.foreign_table(), None);

        field.set_foreign_table(Some(" Countries "));
        field.set_foreign_field(Some(" Id "));
        assert_eq!(field.foreign_table(), Some("Countries"));
        assert_eq!(field.foreign_field(), Some("Id"));
    }
}
