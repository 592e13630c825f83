//! 字段编解码
//!
//! 每个字段在构造时确定类型和 wire type，编解码时按类型选择读写原语。

use crate::error::{CodecError, Result};
use crate::registry::RegistryInner;
use crate::value::{EnumValue, Value};
use bytes::{BufMut, Bytes, BytesMut};
use protoforge_schema::{FieldDef, Label, TypeRef};
use protoforge_wire::{
    ScalarType, Tag, WireError, WireReader, WireType, decode_zigzag32, decode_zigzag64,
    encode_tag, encode_varint, encode_zigzag32, encode_zigzag64,
};
use tracing::trace;

/// 单个字段的编解码器
#[derive(Debug, Clone)]
pub struct FieldCodec {
    message: String,
    name: String,
    type_name: String,
    number: u32,
    label: Label,
    kind: TypeRef,
    packed: bool,
}

impl FieldCodec {
    /// 由字段描述和已解析的类型构造
    ///
    /// packed 仅对可 packed 的 repeated 字段生效，未显式设为 false 即为 packed。
    pub fn new(message: &str, def: &FieldDef, kind: TypeRef) -> Self {
        let packed =
            def.label == Label::Repeated && kind.is_packable() && def.options.packed != Some(false);
        Self {
            message: message.to_string(),
            name: def.name.clone(),
            type_name: def.type_name.clone(),
            number: def.tag,
            label: def.label,
            kind,
            packed,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn kind(&self) -> TypeRef {
        self.kind
    }

    /// 声明的类型名
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// 字段的自然 wire type（与 packed 无关）
    pub fn wire_type(&self) -> WireType {
        self.kind.wire_type()
    }

    /// 编码时是否使用 packed 形式
    pub fn is_packed(&self) -> bool {
        self.packed
    }

    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated
    }

    pub fn is_required(&self) -> bool {
        self.label == Label::Required
    }

    pub(crate) fn mismatch(&self, value: &Value) -> CodecError {
        CodecError::TypeMismatch {
            message: self.message.clone(),
            field: self.name.clone(),
            expected: self.type_name.clone(),
            actual: value.type_label(),
        }
    }

    /// 写入标签和值
    pub(crate) fn encode_tagged(
        &self,
        registry: &RegistryInner,
        value: &Value,
        buf: &mut BytesMut,
        depth: u32,
    ) -> Result<()> {
        encode_tag(self.number, self.wire_type(), buf);
        self.write_value(registry, value, buf, depth)
    }

    /// 只写入值，不带标签
    pub(crate) fn write_value(
        &self,
        registry: &RegistryInner,
        value: &Value,
        buf: &mut BytesMut,
        depth: u32,
    ) -> Result<()> {
        match (self.kind, value) {
            (TypeRef::Scalar(scalar), value) => {
                if !write_scalar(scalar, value, buf) {
                    return Err(self.mismatch(value));
                }
            }
            (TypeRef::Enum(index), Value::Enum(enum_value)) => {
                let table = &registry.enums[index];
                let number = match enum_value {
                    EnumValue::Name(name) => {
                        table.encode(name).ok_or_else(|| CodecError::UnknownEnumName {
                            enum_name: table.name().to_string(),
                            name: name.clone(),
                        })?
                    }
                    EnumValue::Number(number) => {
                        if registry.config.strict_enums && table.decode(*number).is_none() {
                            return Err(CodecError::UnknownEnumNumber {
                                enum_name: table.name().to_string(),
                                number: *number,
                            });
                        }
                        *number
                    }
                };
                encode_varint(i64::from(number) as u64, buf);
            }
            (TypeRef::Message(index), Value::Message(message)) => {
                let mut nested = BytesMut::new();
                registry.messages[index].encode_into(registry, message, &mut nested, depth + 1)?;
                encode_varint(nested.len() as u64, buf);
                buf.put_slice(&nested);
            }
            (_, value) => return Err(self.mismatch(value)),
        }
        Ok(())
    }

    /// 校验标签的 wire type 后读取一个值
    pub(crate) fn decode_tagged(
        &self,
        registry: &RegistryInner,
        tag: Tag,
        reader: &mut WireReader<'_>,
        depth: u32,
    ) -> Result<Value> {
        let expected = self.wire_type();
        if tag.wire_bits != expected.as_u8() {
            return Err(CodecError::UnexpectedWireType {
                message: self.message.clone(),
                field: self.name.clone(),
                expected,
                actual: tag.wire_bits,
            });
        }
        self.read_value(registry, reader, depth)
    }

    /// 读取一个不带标签的值
    pub(crate) fn read_value(
        &self,
        registry: &RegistryInner,
        reader: &mut WireReader<'_>,
        depth: u32,
    ) -> Result<Value> {
        match self.kind {
            TypeRef::Scalar(scalar) => read_scalar(scalar, reader),
            TypeRef::Enum(index) => {
                let number = reader.read_varint()? as i32;
                let table = &registry.enums[index];
                match table.decode(number) {
                    Some(name) => Ok(Value::enum_name(name)),
                    None if registry.config.strict_enums => Err(CodecError::UnknownEnumNumber {
                        enum_name: table.name().to_string(),
                        number,
                    }),
                    None => {
                        trace!(enum_name = table.name(), number, "未知枚举值, 保留原始整数");
                        Ok(Value::enum_number(number))
                    }
                }
            }
            TypeRef::Message(index) => {
                let len = reader.read_length()?;
                let previous = reader.push_limit(len)?;
                let nested = registry.messages[index].decode_from(registry, reader, depth + 1);
                reader.pop_limit(previous);
                Ok(Value::Message(nested?))
            }
        }
    }
}

/// 写入标量值，变体与类型不匹配时返回 false
fn write_scalar(scalar: ScalarType, value: &Value, buf: &mut BytesMut) -> bool {
    match (scalar, value) {
        (ScalarType::Bool, Value::Bool(v)) => encode_varint(u64::from(*v), buf),
        // int32 按 64 位符号扩展，负数固定占 10 字节
        (ScalarType::Int32, Value::Int32(v)) => encode_varint(i64::from(*v) as u64, buf),
        (ScalarType::Int64, Value::Int64(v)) => encode_varint(*v as u64, buf),
        (ScalarType::UInt32, Value::UInt32(v)) => encode_varint(u64::from(*v), buf),
        (ScalarType::UInt64, Value::UInt64(v)) => encode_varint(*v, buf),
        (ScalarType::SInt32, Value::Int32(v)) => encode_varint(u64::from(encode_zigzag32(*v)), buf),
        (ScalarType::SInt64, Value::Int64(v)) => encode_varint(encode_zigzag64(*v), buf),
        (ScalarType::Fixed32, Value::UInt32(v)) => buf.put_u32_le(*v),
        (ScalarType::Fixed64, Value::UInt64(v)) => buf.put_u64_le(*v),
        (ScalarType::SFixed32, Value::Int32(v)) => buf.put_i32_le(*v),
        (ScalarType::SFixed64, Value::Int64(v)) => buf.put_i64_le(*v),
        (ScalarType::Float, Value::Float(v)) => buf.put_f32_le(*v),
        (ScalarType::Double, Value::Double(v)) => buf.put_f64_le(*v),
        (ScalarType::String, Value::String(v)) => {
            encode_varint(v.len() as u64, buf);
            buf.put_slice(v.as_bytes());
        }
        (ScalarType::Bytes, Value::Bytes(v)) => {
            encode_varint(v.len() as u64, buf);
            buf.put_slice(v);
        }
        _ => return false,
    }
    true
}

/// 读取标量值
fn read_scalar(scalar: ScalarType, reader: &mut WireReader<'_>) -> Result<Value> {
    let value = match scalar {
        ScalarType::Bool => Value::Bool(reader.read_varint()? != 0),
        ScalarType::Int32 => Value::Int32(reader.read_varint()? as i32),
        ScalarType::Int64 => Value::Int64(reader.read_varint()? as i64),
        ScalarType::UInt32 => Value::UInt32(reader.read_varint()? as u32),
        ScalarType::UInt64 => Value::UInt64(reader.read_varint()?),
        ScalarType::SInt32 => Value::Int32(decode_zigzag32(reader.read_varint()? as u32)),
        ScalarType::SInt64 => Value::Int64(decode_zigzag64(reader.read_varint()?)),
        ScalarType::Fixed32 => Value::UInt32(reader.read_fixed32()?),
        ScalarType::Fixed64 => Value::UInt64(reader.read_fixed64()?),
        ScalarType::SFixed32 => Value::Int32(reader.read_fixed32()? as i32),
        ScalarType::SFixed64 => Value::Int64(reader.read_fixed64()? as i64),
        ScalarType::Float => Value::Float(f32::from_bits(reader.read_fixed32()?)),
        ScalarType::Double => Value::Double(f64::from_bits(reader.read_fixed64()?)),
        ScalarType::String => {
            let raw = reader.read_length_delimited()?;
            let text = std::str::from_utf8(raw).map_err(|e| WireError::InvalidUtf8(e.to_string()))?;
            Value::String(text.to_string())
        }
        ScalarType::Bytes => Value::Bytes(Bytes::copy_from_slice(reader.read_length_delimited()?)),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(scalar: ScalarType, value: Value) -> Vec<u8> {
        let mut buf = BytesMut::new();
        assert!(write_scalar(scalar, &value, &mut buf));
        buf.to_vec()
    }

    fn round_trip(scalar: ScalarType, value: Value) {
        let bytes = write(scalar, value.clone());
        let mut reader = WireReader::new(&bytes);
        assert_eq!(read_scalar(scalar, &mut reader).unwrap(), value, "{}", scalar);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_scalar_round_trip_boundaries() {
        for v in [0, 1, -1, i32::MIN, i32::MAX] {
            round_trip(ScalarType::Int32, Value::Int32(v));
            round_trip(ScalarType::SInt32, Value::Int32(v));
            round_trip(ScalarType::SFixed32, Value::Int32(v));
        }
        for v in [0, 1, -1, i64::MIN, i64::MAX] {
            round_trip(ScalarType::Int64, Value::Int64(v));
            round_trip(ScalarType::SInt64, Value::Int64(v));
            round_trip(ScalarType::SFixed64, Value::Int64(v));
        }
        for v in [0, 1, u32::MAX] {
            round_trip(ScalarType::UInt32, Value::UInt32(v));
            round_trip(ScalarType::Fixed32, Value::UInt32(v));
        }
        for v in [0, 1, u64::MAX] {
            round_trip(ScalarType::UInt64, Value::UInt64(v));
            round_trip(ScalarType::Fixed64, Value::UInt64(v));
        }
        for v in [0.0, -1.5, f32::MAX, f32::MIN_POSITIVE] {
            round_trip(ScalarType::Float, Value::Float(v));
        }
        for v in [0.0, -1.5, f64::MAX, f64::MIN] {
            round_trip(ScalarType::Double, Value::Double(v));
        }
        round_trip(ScalarType::Bool, Value::Bool(true));
        round_trip(ScalarType::Bool, Value::Bool(false));
        round_trip(ScalarType::String, Value::String("你好, protobuf".to_string()));
        round_trip(ScalarType::String, Value::String(String::new()));
        round_trip(ScalarType::Bytes, Value::Bytes(Bytes::from_static(&[0, 0xff, 0x80])));
    }

    #[test]
    fn test_int32_negative_is_ten_bytes() {
        assert_eq!(write(ScalarType::Int32, Value::Int32(-1)).len(), 10);
        assert_eq!(write(ScalarType::SInt32, Value::Int32(-1)), vec![0x01]);
    }

    #[test]
    fn test_bool_reads_any_non_zero() {
        let bytes = [0x02];
        let mut reader = WireReader::new(&bytes);
        assert_eq!(read_scalar(ScalarType::Bool, &mut reader).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_uint32_masks_high_bits() {
        let mut buf = BytesMut::new();
        encode_varint(u64::from(u32::MAX) + 2, &mut buf);
        let mut reader = WireReader::new(&buf);
        assert_eq!(read_scalar(ScalarType::UInt32, &mut reader).unwrap(), Value::UInt32(1));
    }

    #[test]
    fn test_fixed_width_little_endian() {
        assert_eq!(write(ScalarType::Fixed32, Value::UInt32(1)), vec![1, 0, 0, 0]);
        assert_eq!(write(ScalarType::SFixed64, Value::Int64(-2)), vec![0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes = [0x02, 0xc3, 0x28];
        let mut reader = WireReader::new(&bytes);
        assert!(matches!(
            read_scalar(ScalarType::String, &mut reader),
            Err(CodecError::Wire(WireError::InvalidUtf8(_)))
        ));
    }

    #[test]
    fn test_variant_mismatch() {
        let mut buf = BytesMut::new();
        assert!(!write_scalar(ScalarType::Int32, &Value::Int64(1), &mut buf));
        assert!(!write_scalar(ScalarType::Fixed32, &Value::Int32(1), &mut buf));
        assert!(buf.is_empty());
    }
}
