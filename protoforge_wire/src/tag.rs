//! 字段标签
//!
//! 标签为 varint `(field_number << 3) | wire_type`。

use crate::error::{Result, WireError};
use crate::varint::{encode_varint, encoded_len_varint};
use crate::wire_type::WireType;
use bytes::BufMut;

/// 最大合法字段编号 (2^29 - 1)
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// 解码得到的字段标签
///
/// `wire_bits` 保留原始的低 3 位，未知字段跳过时需要区分未实现的类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    /// 字段编号，0 表示 "没有更多字段"
    pub field_number: u32,
    /// 原始 wire type 位
    pub wire_bits: u8,
}

impl Tag {
    /// 从原始 varint 拆分标签
    pub fn from_raw(raw: u64) -> Result<Self> {
        let field_number = u32::try_from(raw >> 3).map_err(|_| WireError::InvalidTag(raw))?;
        Ok(Self {
            field_number,
            wire_bits: (raw & 0x07) as u8,
        })
    }

    /// 是否为结束标记
    pub fn is_end(&self) -> bool {
        self.field_number == 0
    }

    /// 解析 wire type
    pub fn wire_type(&self) -> Result<WireType> {
        WireType::try_from(self.wire_bits)
    }
}

/// 写入字段标签
pub fn encode_tag(field_number: u32, wire_type: WireType, buf: &mut impl BufMut) {
    encode_varint(
        (u64::from(field_number) << 3) | u64::from(wire_type.as_u8()),
        buf,
    );
}

/// 计算字段标签的编码长度
pub const fn encoded_len_tag(field_number: u32) -> usize {
    encoded_len_varint((field_number as u64) << 3)
}
