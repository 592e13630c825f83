//! varint 与 zigzag 编解码
//!
//! varint 采用 base-128 小端分组，每字节低 7 位为负载，除最后一字节外高位均置 1。

use crate::error::{Result, WireError};
use bytes::{Buf, BufMut};

/// 64 位值的最大 varint 字节数
pub const MAX_VARINT_LEN: usize = 10;

/// 编码 varint
pub fn encode_varint(mut value: u64, buf: &mut impl BufMut) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// 解码 varint
///
/// 10 字节内未遇到结束字节，或第 10 字节携带超出 64 位的负载时返回
/// [`WireError::MalformedVarint`]；输入提前耗尽返回 [`WireError::UnexpectedEof`]。
pub fn decode_varint(buf: &mut impl Buf) -> Result<u64> {
    let mut value = 0u64;
    for index in 0..MAX_VARINT_LEN {
        if !buf.has_remaining() {
            return Err(WireError::UnexpectedEof {
                needed: 1,
                remaining: 0,
            });
        }
        let byte = buf.get_u8();
        // 第 10 字节只剩最高一位可用
        if index == MAX_VARINT_LEN - 1 && byte > 0x01 {
            return Err(WireError::MalformedVarint);
        }
        value |= u64::from(byte & 0x7f) << (index * 7);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(WireError::MalformedVarint)
}

/// 计算 varint 编码后的字节数
pub const fn encoded_len_varint(value: u64) -> usize {
    ((64 - (value | 1).leading_zeros()) as usize + 6) / 7
}

/// 32 位 zigzag 编码
pub const fn encode_zigzag32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// 32 位 zigzag 解码
pub const fn decode_zigzag32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

/// 64 位 zigzag 编码
pub const fn encode_zigzag64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// 64 位 zigzag 解码
pub const fn decode_zigzag64(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}
