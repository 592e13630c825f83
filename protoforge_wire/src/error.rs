//! 线格式错误

use thiserror::Error;

/// 线格式层错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// varint 超过最大宽度仍未结束
    #[error("varint 格式错误: 超过 10 字节仍未结束")]
    MalformedVarint,

    /// 输入在字段中途结束
    #[error("数据不完整: 需要 {needed} 字节, 剩余 {remaining} 字节")]
    UnexpectedEof {
        /// 需要的字节数
        needed: usize,
        /// 当前边界内剩余的字节数
        remaining: usize,
    },

    /// 遇到未实现的 wire type（3、4 组类型以及 6、7）
    #[error("未实现的 wire type: {0}")]
    UnimplementedWireType(u8),

    /// 字段编号超出 u32 范围
    #[error("无效的字段标签: {0}")]
    InvalidTag(u64),

    /// 字符串字段不是合法 UTF-8
    #[error("字符串不是有效的 UTF-8: {0}")]
    InvalidUtf8(String),
}

/// 线格式 Result 类型
pub type Result<T> = std::result::Result<T, WireError>;
