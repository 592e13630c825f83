//! protoforge Protobuf 线格式原语
//!
//! 提供 wire type 映射、varint/zigzag 编解码、字段标签以及带边界的输入游标。

pub mod error;
pub mod reader;
pub mod tag;
pub mod varint;
pub mod wire_type;

// 重新导出主要类型
pub use error::{Result, WireError};
pub use reader::WireReader;
pub use tag::{MAX_FIELD_NUMBER, Tag, encode_tag, encoded_len_tag};
pub use varint::{
    MAX_VARINT_LEN, decode_varint, decode_zigzag32, decode_zigzag64, encode_varint,
    encode_zigzag32, encode_zigzag64, encoded_len_varint,
};
pub use wire_type::{ScalarType, WireType};

// 预导出
pub mod prelude {
    pub use crate::error::{Result, WireError};
    pub use crate::reader::WireReader;
    pub use crate::tag::Tag;
    pub use crate::wire_type::{ScalarType, WireType};
}
