//! # protoforge - 基于 Schema 的 Protobuf 二进制编解码器
//!
//! protoforge 由外部提供的消息 Schema 构造编解码器，输出与其他 Protobuf 实现
//! 逐字节兼容的二进制格式。
//!
//! ## 特性
//!
//! - 完整的标量类型映射（varint、zigzag、定长小端、长度前缀）
//! - repeated 字段的 packed / 非 packed 编码，解码两种形式都接受
//! - 枚举名称与整数双向映射，可去除 `<EnumName>_` 前缀
//! - 嵌套消息的边界隔离与递归深度限制
//! - 未知字段跳过与 required 字段检查
//! - 基于 tokio-util 的长度前缀消息流（`framed` 特性）
//!
//! ## 快速开始
//!
//! ```rust,no_run,ignore
//! use protoforge::prelude::*;
//!
//! fn main() -> protoforge::Result<()> {
//!     let schema = Schema::from_file("schema.toml")?;
//!     let registry = protoforge::compile(&schema)?;
//!     let person = registry.message("Person")?;
//!
//!     let bytes = person.encode(&MessageValue::new().with("id", 7).with("name", "ok"))?;
//!     let decoded = person.decode(&bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## 模块组织
//!
//! ### 配置模块
//! - CodecConfig - 递归深度、消息大小、枚举策略
//!
//! ### 线格式模块
//! - WireType / ScalarType - wire type 与标量类型映射
//! - WireReader - 带边界的输入游标
//!
//! ### Schema 模块
//! - Schema / MessageDef / FieldDef / EnumDef - Schema 数据模型
//!
//! ### 编解码模块
//! - CodecRegistry - 编解码注册表
//! - MessageCodec - 单个消息的编解码器
//! - DelimitedCodec - 长度前缀消息流编解码器

pub mod error;

// ============================================================================
// Crate Re-exports (for advanced users)
// ============================================================================

pub use protoforge_codec;
pub use protoforge_config;
pub use protoforge_schema;
pub use protoforge_wire;

pub use crate::error::{Error, ErrorKind, Result};

pub use protoforge_codec::{
    CodecRegistry, EnumTable, EnumValue, FieldCodec, MessageCodec, MessageValue, Value,
};
pub use protoforge_config::CodecConfig;
pub use protoforge_schema::{EnumDef, FieldDef, Label, MessageDef, Schema};
pub use protoforge_wire::{ScalarType, WireType};

#[cfg(feature = "framed")]
pub use protoforge_codec::DelimitedCodec;

// ============================================================================
// Prelude Module
// ============================================================================

/// 预导出常用类型
///
/// 通过 `use protoforge::prelude::*;` 导入所有常用类型
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};
    pub use protoforge_codec::prelude::*;
    pub use protoforge_config::{CodecConfig, ConfigError};
    pub use protoforge_schema::prelude::*;
    pub use protoforge_wire::prelude::*;
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// 使用默认配置编译 Schema
pub fn compile(schema: &Schema) -> Result<CodecRegistry> {
    Ok(CodecRegistry::compile(schema)?)
}

/// 从文件加载 Schema 和配置并编译
///
/// 配置文件同样会应用 `PROTOFORGE_*` 环境变量覆盖。
pub fn compile_files<P, Q>(schema_path: P, config_path: Q) -> Result<CodecRegistry>
where
    P: AsRef<std::path::Path>,
    Q: AsRef<std::path::Path>,
{
    let schema = Schema::from_file(schema_path)?;
    let config = CodecConfig::from_file_with_env(config_path)?;
    tracing::debug!(config = %config.summary(), "加载编解码配置");
    Ok(CodecRegistry::compile_with_config(&schema, config)?)
}

// ============================================================================
// Version Information
// ============================================================================

/// protoforge 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// protoforge 包名
pub const NAME: &str = env!("CARGO_PKG_NAME");
