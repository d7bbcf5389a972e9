use rowschema::core::{FieldType, Result, SchemaError};
use rowschema::schema::{Field, RowFields};

#[test]
fn test_alias_strips_id_suffix() -> Result<()> {
    let field = Field::new(FieldType::Int32, "CustomerId").with_foreign("Customers", None);
    let join = field.foreign_join(None)?;

    assert_eq!(join.alias(), "jCustomer");
    assert_eq!(join.table(), "Customers");
    assert_eq!(join.on_criteria().to_string(), "jCustomer.CustomerId = T0.CustomerId");
    Ok(())
}

#[test]
fn test_alias_strips_upper_id_suffix_case_insensitively() -> Result<()> {
    let field = Field::new(FieldType::Int32, "Customer_ID").with_foreign("Customers", None);
    assert_eq!(field.foreign_join(None)?.alias(), "jCustomer");

    let field = Field::new(FieldType::Int32, "Customer_id").with_foreign("Customers", None);
    assert_eq!(field.foreign_join(None)?.alias(), "jCustomer");
    Ok(())
}

#[test]
fn test_alias_without_suffix() -> Result<()> {
    let field = Field::new(FieldType::String, "Country").with_foreign("Countries", Some("Code"));
    let join = field.foreign_join(None)?;

    assert_eq!(join.alias(), "jCountry");
    assert_eq!(join.on_criteria().to_string(), "jCountry.Code = T0.Country");
    Ok(())
}

#[test]
fn test_non_ascii_name_builds_join() -> Result<()> {
    let field = Field::new(FieldType::Int32, "KundeÄId").with_foreign("Kunden", None);
    let join = field.foreign_join(None)?;

    assert_eq!(join.alias(), "jKundeÄ");
    assert_eq!(join.table(), "Kunden");
    assert_eq!(join.on_criteria().to_string(), "jKundeÄ.KundeÄId = T0.KundeÄId");
    Ok(())
}

#[test]
fn test_explicit_index_uses_positional_alias() -> Result<()> {
    let field = Field::new(FieldType::Int32, "CustomerId").with_foreign("Customers", Some("Id"));
    let join = field.foreign_join(Some(3))?;

    assert_eq!(join.alias(), "T3");
    assert_eq!(
        join.to_sql(),
        "LEFT JOIN Customers T3 ON (T3.Id = T0.CustomerId)"
    );
    Ok(())
}

#[test]
fn test_missing_foreign_table_is_configuration_error() {
    let field = Field::new(FieldType::Int32, "CustomerId");
    let err = field.foreign_join(None).unwrap_err();
    assert!(matches!(err, SchemaError::Configuration(_)));

    let mut field = Field::new(FieldType::Int32, "CustomerId");
    field.set_foreign_table(Some("   "));
    assert!(matches!(
        field.foreign_join(None),
        Err(SchemaError::Configuration(_))
    ));
}

#[test]
fn test_foreign_join_is_not_registered() -> Result<()> {
    let mut fields = RowFields::new("OrderRow", "Orders");
    fields.add(Field::new(FieldType::Int32, "CustomerId").with_foreign("Customers", None))?;

    let join = fields.by_name("CustomerId").unwrap().foreign_join(None)?;
    assert!(fields.join("jCustomer").is_none());

    fields.add_join(join.clone())?;
    assert!(fields.join("jCustomer").is_some());

    let err = fields.add_join(join).unwrap_err();
    assert_eq!(err, SchemaError::DuplicateJoin("jCustomer".into()));
    Ok(())
}
