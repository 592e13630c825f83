//! protoforge 消息 Schema
//!
//! Schema 由外部提供者给出，本模块只负责数据模型、类型引用解析和生成前校验。

pub mod error;
pub mod model;
pub mod types;
pub mod validate;

// 重新导出主要类型
pub use error::{Result, SchemaError};
pub use model::{EnumDef, EnumValueDef, FieldDef, FieldOptions, Label, MessageDef, Schema};
pub use types::TypeRef;
pub use validate::validate;

// 预导出
pub mod prelude {
    pub use crate::error::{Result, SchemaError};
    pub use crate::model::{EnumDef, FieldDef, Label, MessageDef, Schema};
    pub use crate::types::TypeRef;
}
