//! 带边界的输入游标
//!
//! 嵌套消息解码时临时收窄上界，解码结束后恢复，保证嵌套解码既不越过自身
//! 长度区间，也不会把剩余字节留给后续字段。

use crate::error::{Result, WireError};
use crate::tag::Tag;
use crate::varint::decode_varint;
use crate::wire_type::WireType;
use bytes::Buf;

/// 输入游标
///
/// 实现了 [`Buf`]，`remaining()` 只统计当前上界以内的字节。
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
    limit: usize,
}

impl<'a> WireReader<'a> {
    /// 创建覆盖整个输入的游标
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            limit: buf.len(),
        }
    }

    /// 当前读取位置
    pub fn position(&self) -> usize {
        self.pos
    }

    /// 当前上界
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// 当前边界内是否已读完
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.limit
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.limit - self.pos;
        if needed > remaining {
            return Err(WireError::UnexpectedEof { needed, remaining });
        }
        Ok(())
    }

    /// 读取 varint
    pub fn read_varint(&mut self) -> Result<u64> {
        decode_varint(self)
    }

    /// 读取 4 字节小端定长值
    pub fn read_fixed32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.get_u32_le())
    }

    /// 读取 8 字节小端定长值
    pub fn read_fixed64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(self.get_u64_le())
    }

    /// 读取长度前缀，并确认负载在当前边界内
    pub fn read_length(&mut self) -> Result<usize> {
        let raw = self.read_varint()?;
        let remaining = self.limit - self.pos;
        match usize::try_from(raw) {
            Ok(len) if len <= remaining => Ok(len),
            _ => Err(WireError::UnexpectedEof {
                needed: usize::try_from(raw).unwrap_or(usize::MAX),
                remaining,
            }),
        }
    }

    /// 读取指定长度的原始字节
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// 读取长度前缀负载
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8]> {
        let len = self.read_length()?;
        self.read_slice(len)
    }

    /// 读取字段标签
    pub fn read_tag(&mut self) -> Result<Tag> {
        Tag::from_raw(self.read_varint()?)
    }

    /// 按 wire type 位跳过一个未知字段
    pub fn skip_field(&mut self, wire_bits: u8) -> Result<()> {
        match WireType::try_from(wire_bits)? {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::Fixed64 => {
                self.read_slice(8)?;
            }
            WireType::LengthDelimited => {
                self.read_length_delimited()?;
            }
            WireType::Fixed32 => {
                self.read_slice(4)?;
            }
        }
        Ok(())
    }

    /// 把上界收窄到从当前位置起的 `len` 字节
    ///
    /// 返回原上界，必须交给 [`WireReader::pop_limit`] 恢复。
    pub fn push_limit(&mut self, len: usize) -> Result<usize> {
        self.ensure(len)?;
        let previous = self.limit;
        self.limit = self.pos + len;
        Ok(previous)
    }

    /// 跳到当前区间末尾并恢复原上界
    pub fn pop_limit(&mut self, previous: usize) {
        self.pos = self.limit;
        self.limit = previous;
    }
}

impl Buf for WireReader<'_> {
    fn remaining(&self) -> usize {
        self.limit - self.pos
    }

    fn chunk(&self) -> &[u8] {
        &self.buf[self.pos..self.limit]
    }

    fn advance(&mut self, cnt: usize) {
        assert!(cnt <= self.remaining(), "advance 超出当前边界");
        self.pos += cnt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_fixed() {
        let data = [0x01, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        let mut reader = WireReader::new(&data);
        assert_eq!(reader.read_fixed32().unwrap(), 1);
        assert_eq!(reader.read_fixed64().unwrap(), u64::MAX);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_read_fixed_truncated() {
        let data = [0x01, 0x02];
        let mut reader = WireReader::new(&data);
        assert_eq!(
            reader.read_fixed32(),
            Err(WireError::UnexpectedEof {
                needed: 4,
                remaining: 2
            })
        );
    }

    #[test]
    fn test_length_delimited() {
        let data = [0x02, b'o', b'k', 0x07];
        let mut reader = WireReader::new(&data);
        assert_eq!(reader.read_length_delimited().unwrap(), b"ok");
        assert_eq!(reader.read_varint().unwrap(), 7);
    }

    #[test]
    fn test_length_exceeds_input() {
        let data = [0x05, b'a'];
        let mut reader = WireReader::new(&data);
        assert!(matches!(
            reader.read_length_delimited(),
            Err(WireError::UnexpectedEof { needed: 5, .. })
        ));
    }

    #[test]
    fn test_push_pop_limit() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = WireReader::new(&data);
        let previous = reader.push_limit(2).unwrap();
        assert_eq!(reader.remaining(), 2);
        assert_eq!(reader.read_varint().unwrap(), 1);
        assert!(reader.read_slice(2).is_err());

        // 未读完的区间在恢复时被整体跳过
        reader.pop_limit(previous);
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.remaining(), 2);
        assert_eq!(reader.read_varint().unwrap(), 3);
    }

    #[test]
    fn test_push_limit_beyond_input() {
        let data = [0x01];
        let mut reader = WireReader::new(&data);
        assert!(reader.push_limit(2).is_err());
    }

    #[test]
    fn test_skip_all_wire_types() {
        let data = [
            0x96, 0x01, // varint 150
            0, 0, 0, 0, 0, 0, 0, 0, // fixed64
            0x02, 0xaa, 0xbb, // length delimited
            1, 2, 3, 4, // fixed32
        ];
        let mut reader = WireReader::new(&data);
        reader.skip_field(0).unwrap();
        reader.skip_field(1).unwrap();
        reader.skip_field(2).unwrap();
        reader.skip_field(5).unwrap();
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_skip_group_is_error() {
        let data = [0x00];
        let mut reader = WireReader::new(&data);
        assert_eq!(
            reader.skip_field(3),
            Err(WireError::UnimplementedWireType(3))
        );
        assert_eq!(
            reader.skip_field(4),
            Err(WireError::UnimplementedWireType(4))
        );
    }
}
