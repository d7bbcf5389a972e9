use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

use super::{Field, LeftJoin};
use crate::config::SchemaConfig;
use crate::core::{Result, SchemaError, SelectLevel};
use crate::expression::is_valid_identifier;
use crate::row::{DataReader, Row};
use crate::row::field_value::unexpected_token;

/// Ordered registry of the fields of one row type, plus the joins their
/// expressions may refer to.
#[derive(Debug, Clone)]
pub struct RowFields {
    row_type: String,
    table_name: String,
    local_text_prefix: String,
    config: SchemaConfig,
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
    left_joins: IndexMap<String, Arc<LeftJoin>>,
}

impl RowFields {
    pub fn new(row_type: &str, table_name: &str) -> Self {
        Self::with_config(row_type, table_name, SchemaConfig::default())
    }

    pub fn with_config(row_type: &str, table_name: &str, config: SchemaConfig) -> Self {
        Self {
            row_type: row_type.to_string(),
            table_name: table_name.to_string(),
            local_text_prefix: default_local_text_prefix(row_type),
            config,
            fields: Vec::new(),
            by_name: HashMap::new(),
            left_joins: IndexMap::new(),
        }
    }

    /// Middle segment of auto-generated title keys; the row type without a
    /// trailing `Row` unless overridden.
    pub fn local_text_prefix(&self) -> &str {
        &self.local_text_prefix
    }

    pub fn set_local_text_prefix(&mut self, prefix: &str) {
        self.local_text_prefix = prefix.to_string();
        self.fields.iter_mut().for_each(Field::reset_text_key);
    }

    pub fn row_type(&self) -> &str {
        &self.row_type
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Register a field and return its index. Names are unique, and so are
    /// external names (property name, else name) since they key row JSON.
    pub fn add(&mut self, mut field: Field) -> Result<usize> {
        if self.by_name.contains_key(field.name()) {
            return Err(SchemaError::DuplicateField(field.name().to_string()));
        }

        let external = field.external_name();
        if self.fields.iter().any(|f| f.external_name() == external) {
            return Err(SchemaError::DuplicateField(external.to_string()));
        }

        if field.min_select_level() == SelectLevel::Default {
            field.set_min_select_level(self.config.default_select_level);
        }

        let index = self.fields.len();
        field.register(index, &self.row_type);
        tracing::debug!(
            row_type = %self.row_type,
            field = field.name(),
            index,
            kind = %field.field_type(),
            "field registered"
        );

        self.by_name.insert(field.name().to_string(), index);
        self.fields.push(field);
        Ok(index)
    }

    /// Register a join under its alias. Expressions can only reference
    /// aliases that are plain identifiers.
    pub fn add_join(&mut self, join: LeftJoin) -> Result<Arc<LeftJoin>> {
        if !is_valid_identifier(join.alias()) {
            return Err(SchemaError::Configuration(format!(
                "'{}' is not a valid join alias",
                join.alias()
            )));
        }

        if self.left_joins.contains_key(join.alias()) {
            return Err(SchemaError::DuplicateJoin(join.alias().to_string()));
        }

        tracing::debug!(
            row_type = %self.row_type,
            alias = join.alias(),
            table = join.table(),
            "join registered"
        );

        let join = Arc::new(join);
        self.left_joins.insert(join.alias().to_string(), join.clone());
        Ok(join)
    }

    pub fn join(&self, alias: &str) -> Option<Arc<LeftJoin>> {
        self.left_joins.get(alias).cloned()
    }

    pub fn left_joins(&self) -> impl Iterator<Item = &Arc<LeftJoin>> {
        self.left_joins.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn by_name(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    pub fn by_property_name(&self, property: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.property_name() == Some(property))
    }

    /// Field whose external name (property name, else name) is `key`.
    pub fn by_external_name(&self, key: &str) -> Option<&Field> {
        self.by_property_name(key).or_else(|| {
            self.by_name(key)
                .filter(|f| f.property_name().is_none())
        })
    }

    /// Mutable access for schema customization before the schema is shared.
    pub fn field_mut(&mut self, name: &str) -> Result<&mut Field> {
        match self.by_name.get(name) {
            Some(&i) => Ok(&mut self.fields[i]),
            None => Err(self.not_found(name)),
        }
    }

    fn not_found(&self, name: &str) -> SchemaError {
        SchemaError::FieldNotFound(name.to_string(), self.row_type.clone())
    }

    /// A row with every field's default written and no field assigned.
    pub fn new_row(&self) -> Result<Row> {
        let mut row = Row::new(self.fields.len(), self.config.track_assignments);
        for field in &self.fields {
            field.on_row_initialization(&mut row)?;
        }
        row.clear_assignments();
        Ok(row)
    }

    /// JSON object of the row's non-null values keyed by external name.
    pub fn row_to_json(&self, row: &Row) -> JsonValue {
        let mut map = Map::new();
        for field in &self.fields {
            if field.is_null(row) {
                continue;
            }
            map.insert(field.external_name().to_string(), field.value_to_json(row));
        }
        JsonValue::Object(map)
    }

    /// Build a row from a JSON object keyed by external name.
    pub fn row_from_json(&self, json: &JsonValue) -> Result<Row> {
        let JsonValue::Object(map) = json else {
            return Err(unexpected_token(json));
        };

        let mut row = self.new_row()?;
        for (key, token) in map {
            match self.by_external_name(key) {
                Some(field) => field.value_from_json(token, &mut row)?,
                None if self.config.ignore_unknown_json_fields => {
                    tracing::warn!(
                        row_type = %self.row_type,
                        key = key.as_str(),
                        "unknown JSON property skipped"
                    );
                }
                None => return Err(self.not_found(key)),
            }
        }
        Ok(row)
    }

    /// Build a row from the reader's current record, matching columns to
    /// fields by name. Unmatched columns are ignored.
    pub fn read_row(&self, reader: &dyn DataReader) -> Result<Row> {
        let mut row = self.new_row()?;
        for column in 0..reader.field_count() {
            let Some(name) = reader.column_name(column) else { continue };
            match self.by_name(name) {
                Some(field) => field.get_from_reader(reader, column, &mut row)?,
                None => tracing::trace!(column = name, "no field for reader column"),
            }
        }
        Ok(row)
    }

    pub fn validate(&self, row: &Row) -> Result<()> {
        self.fields.iter().try_for_each(|field| field.validate(row))
    }
}

impl<'a> IntoIterator for &'a RowFields {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

fn default_local_text_prefix(row_type: &str) -> String {
    row_type.strip_suffix("Row").filter(|s| !s.is_empty()).unwrap_or(row_type).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FieldType;

    #[test]
    fn test_indexes_follow_registration_order() {
        let mut fields = RowFields::new("OrderRow", "Orders");
        assert_eq!(fields.add(Field::new(FieldType::Int32, "OrderId")).unwrap(), 0);
        assert_eq!(fields.add(Field::new(FieldType::String, "Note")).unwrap(), 1);

        assert_eq!(fields.by_name("Note").and_then(|f| f.index()), Some(1));
        assert_eq!(fields.by_name("Note").and_then(|f| f.row_type()), Some("OrderRow"));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut fields = RowFields::new("OrderRow", "Orders");
        fields.add(Field::new(FieldType::Int32, "OrderId")).unwrap();

        let err = fields.add(Field::new(FieldType::Int64, "OrderId")).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField("OrderId".into()));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let mut fields = RowFields::new("OrderRow", "Orders");
        fields
            .add(Field::new(FieldType::Int32, "order_id").with_property_name("OrderId"))
            .unwrap();

        let err = fields
            .add(Field::new(FieldType::Int32, "legacy_id").with_property_name("OrderId"))
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField(_)));
    }

    #[test]
    fn test_property_name_cannot_shadow_field_name() {
        let mut fields = RowFields::new("ItemRow", "Items");
        fields.add(Field::new(FieldType::Int32, "Code")).unwrap();

        let err = fields
            .add(Field::new(FieldType::Int32, "legacy").with_property_name("Code"))
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField("Code".into()));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_field_name_cannot_reuse_property_name() {
        let mut fields = RowFields::new("ItemRow", "Items");
        fields
            .add(Field::new(FieldType::Int32, "item_code").with_property_name("Code"))
            .unwrap();

        let err = fields.add(Field::new(FieldType::Int32, "Code")).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField("Code".into()));
    }

    #[test]
    fn test_add_join_rejects_invalid_alias() {
        let mut fields = RowFields::new("ItemRow", "Items");
        let on = crate::schema::Criteria::field("j Item", "ItemId")
            .equals(crate::schema::Criteria::field("T0", "ItemId"));
        let join = LeftJoin::new("Items", "j Item", on).unwrap();

        let err = fields.add_join(join).unwrap_err();
        assert!(matches!(err, SchemaError::Configuration(_)));
    }

    #[test]
    fn test_default_prefix_strips_row_suffix() {
        assert_eq!(default_local_text_prefix("InvoiceRow"), "Invoice");
        assert_eq!(default_local_text_prefix("Row"), "Row");
        assert_eq!(default_local_text_prefix("Invoice"), "Invoice");
    }

    #[test]
    fn test_config_select_level_applied() {
        let config = SchemaConfig::new().default_select_level(SelectLevel::List);
        let mut fields = RowFields::with_config("OrderRow", "Orders", config);
        fields.add(Field::new(FieldType::Int32, "A")).unwrap();
        fields
            .add(Field::new(FieldType::Int32, "B").with_min_select_level(SelectLevel::Never))
            .unwrap();

        assert_eq!(fields.by_name("A").unwrap().min_select_level(), SelectLevel::List);
        assert_eq!(fields.by_name("B").unwrap().min_select_level(), SelectLevel::Never);
    }

    #[test]
    fn test_field_mut_unknown() {
        let mut fields = RowFields::new("OrderRow", "Orders");
        let err = fields.field_mut("Missing").unwrap_err();
        assert_eq!(err, SchemaError::FieldNotFound("Missing".into(), "OrderRow".into()));
    }
}
