//! Schema 校验
//!
//! 在生成任何编解码器之前对整个 Schema 运行一次，遇到第一个错误即返回。

use crate::error::{Result, SchemaError};
use crate::model::{FieldDef, MessageDef, Schema};
use crate::types;
use protoforge_wire::MAX_FIELD_NUMBER;
use std::collections::HashSet;
use tracing::debug;

/// 校验整个 Schema
pub fn validate(schema: &Schema) -> Result<()> {
    let mut type_names = HashSet::new();
    for name in schema
        .messages
        .iter()
        .map(|m| &m.name)
        .chain(schema.enums.iter().map(|e| &e.name))
    {
        if !type_names.insert(name.as_str()) {
            return Err(SchemaError::DuplicateType(name.clone()));
        }
    }

    for enum_def in &schema.enums {
        if enum_def.values.is_empty() {
            return Err(SchemaError::EmptyEnum(enum_def.name.clone()));
        }
    }

    for message in &schema.messages {
        validate_message(schema, message)?;
    }

    debug!(
        messages = schema.messages.len(),
        enums = schema.enums.len(),
        "Schema 校验通过"
    );
    Ok(())
}

fn validate_message(schema: &Schema, message: &MessageDef) -> Result<()> {
    let mut names = HashSet::new();
    let mut tags = HashSet::new();

    for field in &message.fields {
        if !names.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateFieldName {
                message: message.name.clone(),
                field: field.name.clone(),
            });
        }

        if field.tag == 0 || field.tag > MAX_FIELD_NUMBER {
            return Err(SchemaError::InvalidTag {
                message: message.name.clone(),
                field: field.name.clone(),
                tag: field.tag,
            });
        }
        if !tags.insert(field.tag) {
            return Err(SchemaError::DuplicateTag {
                message: message.name.clone(),
                tag: field.tag,
            });
        }

        validate_field(schema, message, field)?;
    }
    Ok(())
}

fn validate_field(schema: &Schema, message: &MessageDef, field: &FieldDef) -> Result<()> {
    let Some(type_ref) = types::resolve(schema, &field.type_name) else {
        return Err(SchemaError::UnresolvedType {
            message: message.name.clone(),
            field: field.name.clone(),
            type_name: field.type_name.clone(),
        });
    };

    if field.options.packed == Some(true) {
        let reason = if !field.is_repeated() {
            Some("字段不是 repeated".to_string())
        } else if !type_ref.is_packable() {
            Some(format!("类型 {} 不支持 packed 编码", field.type_name))
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(SchemaError::InvalidPacked {
                message: message.name.clone(),
                field: field.name.clone(),
                reason,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EnumDef;

    fn with_fields(fields: Vec<FieldDef>) -> Schema {
        let mut message = MessageDef::new("Msg");
        message.fields = fields;
        Schema::new()
            .message(message)
            .message(MessageDef::new("Inner"))
            .enumeration(EnumDef::new("Color").value("RED", 0))
    }

    #[test]
    fn test_valid_schema() {
        let schema = with_fields(vec![
            FieldDef::required("id", "int32", 1),
            FieldDef::repeated("values", "double", 2).packed(true),
            FieldDef::repeated("colors", "Color", 3).packed(true),
            FieldDef::repeated("names", "string", 4),
            FieldDef::optional("inner", "Inner", 5),
            FieldDef::optional("flag", "bool", 6).packed(false),
        ]);
        assert!(validate(&schema).is_ok());
    }

    #[test]
    fn test_packed_on_singular_field() {
        let schema = with_fields(vec![FieldDef::optional("id", "int32", 1).packed(true)]);
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::InvalidPacked { field, .. }) if field == "id"
        ));
    }

    #[test]
    fn test_packed_on_non_packable_types() {
        for type_name in ["string", "bytes", "Inner"] {
            let schema = with_fields(vec![FieldDef::repeated("items", type_name, 1).packed(true)]);
            assert!(
                matches!(validate(&schema), Err(SchemaError::InvalidPacked { .. })),
                "{}",
                type_name
            );
        }
    }

    #[test]
    fn test_packed_false_is_always_allowed() {
        let schema = with_fields(vec![FieldDef::repeated("names", "string", 1).packed(false)]);
        assert!(validate(&schema).is_ok());
    }

    #[test]
    fn test_duplicate_tag() {
        let schema = with_fields(vec![
            FieldDef::optional("a", "int32", 1),
            FieldDef::optional("b", "int32", 1),
        ]);
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::DuplicateTag { tag: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_field_name() {
        let schema = with_fields(vec![
            FieldDef::optional("a", "int32", 1),
            FieldDef::optional("a", "int64", 2),
        ]);
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::DuplicateFieldName { .. })
        ));
    }

    #[test]
    fn test_invalid_tags() {
        for tag in [0, MAX_FIELD_NUMBER + 1] {
            let schema = with_fields(vec![FieldDef::optional("a", "int32", tag)]);
            assert!(matches!(
                validate(&schema),
                Err(SchemaError::InvalidTag { .. })
            ));
        }
    }

    #[test]
    fn test_unresolved_type() {
        let schema = with_fields(vec![FieldDef::optional("a", "Missing", 1)]);
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::UnresolvedType { type_name, .. }) if type_name == "Missing"
        ));
    }

    #[test]
    fn test_duplicate_type_names() {
        let schema = Schema::new()
            .message(MessageDef::new("Color"))
            .enumeration(EnumDef::new("Color").value("RED", 0));
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::DuplicateType(name)) if name == "Color"
        ));
    }

    #[test]
    fn test_empty_enum() {
        let schema = Schema::new().enumeration(EnumDef::new("Empty"));
        assert!(matches!(validate(&schema), Err(SchemaError::EmptyEnum(_))));
    }
}
