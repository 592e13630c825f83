//! protoforge 消息编解码
//!
//! 由 Schema 构造 [`CodecRegistry`]：每个枚举一张 [`EnumTable`]，每个消息一个
//! [`MessageCodec`]。编码输出标准 Protobuf 二进制，解码接受 packed 和非 packed
//! 两种 repeated 形式、跳过未知字段并检查 required 字段。
//!
//! ```rust,ignore
//! use protoforge_codec::prelude::*;
//!
//! let registry = CodecRegistry::compile(&schema)?;
//! let person = registry.message("Person")?;
//! let bytes = person.encode(&MessageValue::new().with("id", 7).with("name", "ok"))?;
//! let decoded = person.decode(&bytes)?;
//! ```

pub mod enum_table;
pub mod error;
pub mod field;
pub mod message;
mod packed;
pub mod registry;
pub mod value;

#[cfg(feature = "framed")]
pub mod framed;

// 重新导出主要类型
pub use enum_table::{EnumTable, strip_enum_prefix};
pub use error::{CodecError, Result};
pub use field::FieldCodec;
pub use message::MessageCodec;
pub use registry::CodecRegistry;
pub use value::{EnumValue, MessageValue, Value};

#[cfg(feature = "framed")]
pub use framed::DelimitedCodec;

// 预导出
pub mod prelude {
    pub use crate::error::{CodecError, Result};
    pub use crate::message::MessageCodec;
    pub use crate::registry::CodecRegistry;
    pub use crate::value::{EnumValue, MessageValue, Value};

    #[cfg(feature = "framed")]
    pub use crate::framed::DelimitedCodec;
}
