//! Schema 错误

use thiserror::Error;

/// Schema 加载与校验错误
///
/// 校验错误在生成任何编解码器之前抛出。
#[derive(Error, Debug)]
pub enum SchemaError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析 Schema 失败: {0}")]
    Parse(String),

    /// 类型名重复（消息与枚举共用命名空间）
    #[error("类型名重复: {0}")]
    DuplicateType(String),

    /// 消息内字段名重复
    #[error("消息 {message} 中字段名重复: {field}")]
    DuplicateFieldName { message: String, field: String },

    /// 消息内字段标签重复
    #[error("消息 {message} 中字段标签重复: {tag}")]
    DuplicateTag { message: String, tag: u32 },

    /// 字段标签越界
    #[error("消息 {message} 的字段 {field} 标签无效: {tag}")]
    InvalidTag {
        message: String,
        field: String,
        tag: u32,
    },

    /// 类型引用无法解析
    #[error("消息 {message} 的字段 {field} 引用了未声明的类型: {type_name}")]
    UnresolvedType {
        message: String,
        field: String,
        type_name: String,
    },

    /// packed 选项不适用
    #[error("消息 {message} 的字段 {field} 不能使用 packed: {reason}")]
    InvalidPacked {
        message: String,
        field: String,
        reason: String,
    },

    /// 枚举没有任何值
    #[error("枚举 {0} 没有定义任何值")]
    EmptyEnum(String),
}

/// Schema Result 类型
pub type Result<T> = std::result::Result<T, SchemaError>;
