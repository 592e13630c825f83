//! 编解码错误

use protoforge_config::ConfigError;
use protoforge_schema::SchemaError;
use protoforge_wire::{WireError, WireType};
use thiserror::Error;

/// 编解码错误
///
/// 解码错误只影响当前调用，不会污染其他调用共享的编解码器。
#[derive(Error, Debug)]
pub enum CodecError {
    /// 线格式错误
    #[error(transparent)]
    Wire(#[from] WireError),

    /// Schema 校验错误
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 解码结束后缺少 required 字段
    #[error("消息 {message} 缺少 required 字段: {field}")]
    MissingRequiredField { message: String, field: String },

    /// 字段值与声明类型不一致
    #[error("消息 {message} 的字段 {field} 类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch {
        message: String,
        field: String,
        expected: String,
        actual: &'static str,
    },

    /// 已知字段携带了错误的 wire type
    #[error("消息 {message} 的字段 {field} wire type 不匹配: 期望 {expected}, 实际 {actual}")]
    UnexpectedWireType {
        message: String,
        field: String,
        expected: WireType,
        actual: u8,
    },

    /// 编码时枚举名不存在
    #[error("枚举 {enum_name} 没有名为 {name} 的值")]
    UnknownEnumName { enum_name: String, name: String },

    /// 严格模式下枚举整数没有对应名称
    #[error("枚举 {enum_name} 没有数值为 {number} 的值")]
    UnknownEnumNumber { enum_name: String, number: i32 },

    /// 嵌套层数超过上限
    #[error("超过最大递归深度: {0}")]
    RecursionLimitExceeded(u32),

    /// 消息未注册
    #[error("消息未注册: {0}")]
    UnknownMessage(String),

    /// 消息超过大小上限
    #[error("消息过大: {size} 字节 (上限 {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// 是否为线格式层面的输入错误
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, CodecError::Wire(_) | CodecError::UnexpectedWireType { .. })
    }
}

/// 编解码 Result 类型
pub type Result<T> = std::result::Result<T, CodecError>;
