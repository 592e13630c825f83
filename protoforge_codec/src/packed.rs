//! repeated 字段编解码
//!
//! 编码按字段的 packed 设置选择形式；解码两种形式都接受，因为是否 packed
//! 由发送方决定，不一定与接收方 Schema 一致。

use crate::error::Result;
use crate::field::FieldCodec;
use crate::registry::RegistryInner;
use crate::value::{MessageValue, Value};
use bytes::{BufMut, BytesMut};
use protoforge_wire::{Tag, WireReader, WireType, encode_tag, encode_varint};

/// 编码 repeated 字段
///
/// packed：标签只写一次（LENGTH_DELIMITED），随后是所有元素的裸编码。
/// 非 packed：每个元素各自写标签和值。空序列不产生任何字节。
pub(crate) fn encode_repeated(
    field: &FieldCodec,
    registry: &RegistryInner,
    value: &Value,
    buf: &mut BytesMut,
    depth: u32,
) -> Result<()> {
    let Value::Repeated(items) = value else {
        return Err(field.mismatch(value));
    };
    if items.is_empty() {
        return Ok(());
    }

    if field.is_packed() {
        let mut payload = BytesMut::new();
        for item in items {
            field.write_value(registry, item, &mut payload, depth)?;
        }
        encode_tag(field.number(), WireType::LengthDelimited, buf);
        encode_varint(payload.len() as u64, buf);
        buf.put_slice(&payload);
    } else {
        for item in items {
            field.encode_tagged(registry, item, buf, depth)?;
        }
    }
    Ok(())
}

/// 解码 repeated 字段的一次出现，结果追加到消息中的同一序列
pub(crate) fn decode_repeated(
    field: &FieldCodec,
    registry: &RegistryInner,
    tag: Tag,
    reader: &mut WireReader<'_>,
    message: &mut MessageValue,
    depth: u32,
) -> Result<()> {
    let packed_run =
        field.kind().is_packable() && tag.wire_bits == WireType::LengthDelimited.as_u8();

    if packed_run {
        let len = reader.read_length()?;
        let previous = reader.push_limit(len)?;
        while !reader.is_exhausted() {
            let item = field.read_value(registry, reader, depth)?;
            message.push(field.name(), item);
        }
        reader.pop_limit(previous);
    } else {
        let item = field.decode_tagged(registry, tag, reader, depth)?;
        message.push(field.name(), item);
    }
    Ok(())
}
