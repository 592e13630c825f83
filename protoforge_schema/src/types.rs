//! 类型引用解析
//!
//! 类型名在编解码器构造时解析一次，之后的编解码不再查表。

use crate::model::Schema;
use protoforge_wire::{ScalarType, WireType};

/// 解析后的字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// 标量类型
    Scalar(ScalarType),
    /// 枚举，值为 `Schema::enums` 中的下标
    Enum(usize),
    /// 嵌套消息，值为 `Schema::messages` 中的下标
    Message(usize),
}

impl TypeRef {
    /// 获取 wire type
    pub fn wire_type(&self) -> WireType {
        match self {
            TypeRef::Scalar(scalar) => scalar.wire_type(),
            TypeRef::Enum(_) => WireType::Varint,
            TypeRef::Message(_) => WireType::LengthDelimited,
        }
    }

    /// 是否可以使用 packed 编码
    pub fn is_packable(&self) -> bool {
        match self {
            TypeRef::Scalar(scalar) => scalar.is_packable(),
            TypeRef::Enum(_) => true,
            TypeRef::Message(_) => false,
        }
    }
}

/// 解析类型名
///
/// 依次尝试标量关键字、枚举、消息。引用名允许带前导 `.` 和命名空间前缀，
/// 例如 `.demo.Person`。
pub fn resolve(schema: &Schema, type_name: &str) -> Option<TypeRef> {
    if let Some(scalar) = ScalarType::from_keyword(type_name) {
        return Some(TypeRef::Scalar(scalar));
    }

    let name = local_name(schema.package.as_deref(), type_name);
    if let Some((index, _)) = schema.find_enum(name) {
        return Some(TypeRef::Enum(index));
    }
    schema
        .find_message(name)
        .map(|(index, _)| TypeRef::Message(index))
}

/// 去掉前导 `.` 和命名空间前缀，得到 Schema 内的本地类型名
pub fn local_name<'a>(package: Option<&str>, type_name: &'a str) -> &'a str {
    let name = type_name.strip_prefix('.').unwrap_or(type_name);
    package
        .and_then(|package| name.strip_prefix(package))
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(name)
}
