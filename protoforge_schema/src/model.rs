//! Schema 数据模型
//!
//! 由外部 Schema 提供者构造，也可以从 TOML 描述反序列化。

use crate::error::{Result, SchemaError};
use crate::types::{self, TypeRef};
use protoforge_wire::WireType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 完整 Schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// 命名空间
    #[serde(default)]
    pub package: Option<String>,

    /// 消息定义（保持声明顺序）
    #[serde(default)]
    pub messages: Vec<MessageDef>,

    /// 枚举定义（保持声明顺序）
    #[serde(default)]
    pub enums: Vec<EnumDef>,
}

/// 消息定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDef {
    /// 消息名称
    pub name: String,

    /// 字段描述（保持声明顺序）
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// 字段基数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Required,
    #[default]
    Optional,
    Repeated,
}

/// 字段选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptions {
    /// packed 三态：`None` 表示未设置
    #[serde(default)]
    pub packed: Option<bool>,
}

/// 字段描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// 字段名
    pub name: String,

    /// 类型名：标量关键字或已声明的枚举/消息名
    #[serde(rename = "type")]
    pub type_name: String,

    /// 字段编号
    pub tag: u32,

    /// 基数
    #[serde(default)]
    pub label: Label,

    /// 选项
    #[serde(default)]
    pub options: FieldOptions,
}

/// 枚举定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    /// 枚举名称
    pub name: String,

    /// 值定义（保持声明顺序，数值可重复）
    #[serde(default)]
    pub values: Vec<EnumValueDef>,
}

/// 枚举值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueDef {
    /// 符号名
    pub name: String,
    /// 整数值
    pub number: i32,
}

impl Schema {
    /// 创建空 Schema
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置命名空间
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// 追加消息定义
    pub fn message(mut self, message: MessageDef) -> Self {
        self.messages.push(message);
        self
    }

    /// 追加枚举定义
    pub fn enumeration(mut self, enum_def: EnumDef) -> Self {
        self.enums.push(enum_def);
        self
    }

    /// 从 TOML 文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SchemaError::Parse(e.to_string()))
    }

    /// 按名称查找消息
    pub fn find_message(&self, name: &str) -> Option<(usize, &MessageDef)> {
        self.messages
            .iter()
            .enumerate()
            .find(|(_, message)| message.name == name)
    }

    /// 按名称查找枚举
    pub fn find_enum(&self, name: &str) -> Option<(usize, &EnumDef)> {
        self.enums
            .iter()
            .enumerate()
            .find(|(_, enum_def)| enum_def.name == name)
    }

    /// 解析类型引用
    pub fn resolve_type(&self, type_name: &str) -> Option<TypeRef> {
        types::resolve(self, type_name)
    }

    /// 获取类型名对应的 wire type
    pub fn wire_type_of(&self, type_name: &str) -> Option<WireType> {
        self.resolve_type(type_name).map(|ty| ty.wire_type())
    }

    /// 校验整个 Schema
    pub fn validate(&self) -> Result<()> {
        crate::validate::validate(self)
    }
}

impl MessageDef {
    /// 创建消息定义
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// 追加字段
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

impl FieldDef {
    /// 创建字段描述
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, tag: u32, label: Label) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            tag,
            label,
            options: FieldOptions::default(),
        }
    }

    /// 创建 required 字段
    pub fn required(name: impl Into<String>, type_name: impl Into<String>, tag: u32) -> Self {
        Self::new(name, type_name, tag, Label::Required)
    }

    /// 创建 optional 字段
    pub fn optional(name: impl Into<String>, type_name: impl Into<String>, tag: u32) -> Self {
        Self::new(name, type_name, tag, Label::Optional)
    }

    /// 创建 repeated 字段
    pub fn repeated(name: impl Into<String>, type_name: impl Into<String>, tag: u32) -> Self {
        Self::new(name, type_name, tag, Label::Repeated)
    }

    /// 显式设置 packed 选项
    pub fn packed(mut self, packed: bool) -> Self {
        self.options.packed = Some(packed);
        self
    }

    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated
    }

    pub fn is_required(&self) -> bool {
        self.label == Label::Required
    }
}

impl EnumDef {
    /// 创建枚举定义
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// 追加枚举值
    pub fn value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.values.push(EnumValueDef {
            name: name.into(),
            number,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSON_TOML: &str = r#"
package = "demo"

[[enums]]
name = "Color"
values = [
    { name = "Color_RED", number = 0 },
    { name = "Color_GREEN", number = 1 },
]

[[messages]]
name = "Person"

[[messages.fields]]
name = "id"
type = "int32"
tag = 1
label = "required"

[[messages.fields]]
name = "scores"
type = "sint32"
tag = 2
label = "repeated"
options = { packed = false }

[[messages.fields]]
name = "color"
type = "Color"
tag = 3
"#;

    #[test]
    fn test_from_toml() {
        let schema = Schema::from_toml_str(PERSON_TOML).unwrap();
        assert_eq!(schema.package.as_deref(), Some("demo"));
        assert_eq!(schema.enums[0].values.len(), 2);

        let (index, person) = schema.find_message("Person").unwrap();
        assert_eq!(index, 0);
        assert_eq!(person.fields.len(), 3);
        assert!(person.fields[0].is_required());
        assert_eq!(person.fields[1].options.packed, Some(false));
        assert_eq!(person.fields[2].label, Label::Optional);
        assert_eq!(person.fields[2].options.packed, None);
    }

    #[test]
    fn test_from_toml_invalid() {
        let result = Schema::from_toml_str("[[messages]]\nfields = 3\n");
        assert!(matches!(result, Err(SchemaError::Parse(_))));
    }

    #[test]
    fn test_builder_matches_toml() {
        let built = Schema::new()
            .with_package("demo")
            .message(
                MessageDef::new("Person")
                    .field(FieldDef::required("id", "int32", 1))
                    .field(FieldDef::repeated("scores", "sint32", 2).packed(false))
                    .field(FieldDef::optional("color", "Color", 3)),
            )
            .enumeration(EnumDef::new("Color").value("Color_RED", 0).value("Color_GREEN", 1));
        assert_eq!(built, Schema::from_toml_str(PERSON_TOML).unwrap());
    }

    #[test]
    fn test_wire_type_of() {
        let schema = Schema::from_toml_str(PERSON_TOML).unwrap();
        assert_eq!(schema.wire_type_of("Color"), Some(WireType::Varint));
        assert_eq!(schema.wire_type_of("Person"), Some(WireType::LengthDelimited));
        assert_eq!(schema.wire_type_of("double"), Some(WireType::Fixed64));
        assert_eq!(schema.wire_type_of("Missing"), None);
    }
}
