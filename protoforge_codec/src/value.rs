//! 消息值
//!
//! 字段值是封闭的带标签变体，变体由字段声明类型决定：
//! int32/sint32/sfixed32 → `Int32`，uint32/fixed32 → `UInt32`，64 位同理。

use bytes::Bytes;
use std::collections::BTreeMap;

/// 枚举字段的值
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnumValue {
    /// 符号名（已去除前缀）
    Name(String),
    /// 没有对应名称的原始整数
    Number(i32),
}

impl EnumValue {
    /// 获取符号名
    pub fn name(&self) -> Option<&str> {
        match self {
            EnumValue::Name(name) => Some(name),
            EnumValue::Number(_) => None,
        }
    }

    /// 获取原始整数（仅未知值）
    pub fn number(&self) -> Option<i32> {
        match self {
            EnumValue::Name(_) => None,
            EnumValue::Number(number) => Some(*number),
        }
    }
}

/// 字段值
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Bytes),
    Enum(EnumValue),
    Message(MessageValue),
    /// repeated 字段的有序序列
    Repeated(Vec<Value>),
}

impl Value {
    /// 由任意可转换元素构造 repeated 值
    pub fn repeated<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Repeated(items.into_iter().map(Into::into).collect())
    }

    /// 构造符号名枚举值
    pub fn enum_name(name: impl Into<String>) -> Self {
        Value::Enum(EnumValue::Name(name.into()))
    }

    /// 构造整数枚举值
    pub fn enum_number(number: i32) -> Self {
        Value::Enum(EnumValue::Number(number))
    }

    /// 变体名称，用于错误信息
    pub fn type_label(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::UInt32(_) => "uint32",
            Value::UInt64(_) => "uint64",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Enum(_) => "enum",
            Value::Message(_) => "message",
            Value::Repeated(_) => "repeated",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Value::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&MessageValue> {
        match self {
            Value::Message(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_repeated(&self) -> Option<&[Value]> {
        match self {
            Value::Repeated(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i32 => Int32,
    i64 => Int64,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
    Bytes => Bytes,
    EnumValue => Enum,
    MessageValue => Message,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// 消息值：字段名到字段值的映射
///
/// 键不存在表示字段未出现；对 repeated 字段表示空序列。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageValue {
    fields: BTreeMap<String, Value>,
}

impl MessageValue {
    /// 创建空消息值
    pub fn new() -> Self {
        Self::default()
    }

    /// 以构建器方式设置字段
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// 设置字段，返回旧值
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// 追加 repeated 字段的一个元素
    ///
    /// 已有的非序列值会被替换为新序列。
    pub fn push(&mut self, name: &str, value: impl Into<Value>) {
        let slot = self
            .fields
            .entry(name.to_string())
            .or_insert_with(|| Value::Repeated(Vec::new()));
        if !matches!(slot, Value::Repeated(_)) {
            *slot = Value::Repeated(Vec::new());
        }
        if let Value::Repeated(items) = slot {
            items.push(value.into());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// 字段是否存在
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 按字段名顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for MessageValue
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut message = MessageValue::new();
        for (name, value) in iter {
            message.set(name, value);
        }
        message
    }
}
