//! 消息编解码器
//!
//! 编码是按声明顺序遍历字段的单次扫描；解码是一个简单的状态机：
//!
//! ```text
//! SCANNING_TAG --(字段编号 0)--> DONE
//!      |  ^
//!      |  +-- 已声明字段：按字段（含 packed）读取
//!      |  +-- 未知字段：按 wire type 跳过
//!      +--(输入耗尽)--> DONE
//! ```
//!
//! 结束后检查所有 required 字段是否出现。

use crate::error::{CodecError, Result};
use crate::field::FieldCodec;
use crate::packed;
use crate::registry::RegistryInner;
use crate::value::MessageValue;
use bytes::{BufMut, Bytes, BytesMut};
use protoforge_schema::{MessageDef, Schema, SchemaError};
use protoforge_wire::{WireReader, decode_varint, encode_varint, encoded_len_varint};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// 构造期解析好的消息布局
#[derive(Debug, Clone)]
pub(crate) struct MessageLayout {
    pub(crate) name: String,
    pub(crate) fields: Vec<FieldCodec>,
    by_number: HashMap<u32, usize>,
    required: Vec<usize>,
}

impl MessageLayout {
    pub(crate) fn new(schema: &Schema, def: &MessageDef) -> std::result::Result<Self, SchemaError> {
        let mut fields = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            let kind = schema.resolve_type(&field.type_name).ok_or_else(|| {
                SchemaError::UnresolvedType {
                    message: def.name.clone(),
                    field: field.name.clone(),
                    type_name: field.type_name.clone(),
                }
            })?;
            fields.push(FieldCodec::new(&def.name, field, kind));
        }

        let by_number = fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.number(), index))
            .collect();
        let required = fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.is_required())
            .map(|(index, _)| index)
            .collect();

        Ok(Self {
            name: def.name.clone(),
            fields,
            by_number,
            required,
        })
    }

    fn check_depth(registry: &RegistryInner, depth: u32) -> Result<()> {
        let limit = registry.config.recursion_limit;
        if depth > limit {
            return Err(CodecError::RecursionLimitExceeded(limit));
        }
        Ok(())
    }

    pub(crate) fn encode_into(
        &self,
        registry: &RegistryInner,
        value: &MessageValue,
        buf: &mut BytesMut,
        depth: u32,
    ) -> Result<()> {
        Self::check_depth(registry, depth)?;

        for field in &self.fields {
            let Some(field_value) = value.get(field.name()) else {
                continue;
            };
            if field.is_repeated() {
                packed::encode_repeated(field, registry, field_value, buf, depth)?;
            } else {
                field.encode_tagged(registry, field_value, buf, depth)?;
            }
        }
        Ok(())
    }

    pub(crate) fn decode_from(
        &self,
        registry: &RegistryInner,
        reader: &mut WireReader<'_>,
        depth: u32,
    ) -> Result<MessageValue> {
        Self::check_depth(registry, depth)?;

        let mut message = MessageValue::new();
        while !reader.is_exhausted() {
            let tag = reader.read_tag()?;
            if tag.is_end() {
                break;
            }

            match self.by_number.get(&tag.field_number) {
                Some(&index) => {
                    let field = &self.fields[index];
                    if field.is_repeated() {
                        packed::decode_repeated(field, registry, tag, reader, &mut message, depth)?;
                    } else {
                        let value = field.decode_tagged(registry, tag, reader, depth)?;
                        message.set(field.name(), value);
                    }
                }
                None => {
                    trace!(
                        message = %self.name,
                        field_number = tag.field_number,
                        wire_type = tag.wire_bits,
                        "跳过未知字段"
                    );
                    reader.skip_field(tag.wire_bits)?;
                }
            }
        }

        for &index in &self.required {
            let field = &self.fields[index];
            if !message.contains(field.name()) {
                return Err(CodecError::MissingRequiredField {
                    message: self.name.clone(),
                    field: field.name().to_string(),
                });
            }
        }
        Ok(message)
    }
}

/// 单个消息类型的编解码器
///
/// 持有整个注册表的共享引用，可跨线程复制和复用；每次调用独占自己的缓冲区。
#[derive(Debug, Clone)]
pub struct MessageCodec {
    registry: Arc<RegistryInner>,
    index: usize,
}

impl MessageCodec {
    pub(crate) fn new(registry: Arc<RegistryInner>, index: usize) -> Self {
        Self { registry, index }
    }

    fn layout(&self) -> &MessageLayout {
        &self.registry.messages[self.index]
    }

    /// 消息名称
    pub fn name(&self) -> &str {
        &self.layout().name
    }

    /// 按声明顺序的字段编解码器
    pub fn fields(&self) -> &[FieldCodec] {
        &self.layout().fields
    }

    /// 按名称查找字段
    pub fn field(&self, name: &str) -> Option<&FieldCodec> {
        self.fields().iter().find(|field| field.name() == name)
    }

    /// 注册表配置的单条消息大小上限
    pub fn max_message_size(&self) -> usize {
        self.registry.config.max_message_size
    }

    /// 编码消息
    pub fn encode(&self, value: &MessageValue) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        self.encode_to(value, &mut buf)?;
        Ok(buf.freeze())
    }

    /// 编码消息并追加到已有缓冲区
    pub fn encode_to(&self, value: &MessageValue, buf: &mut BytesMut) -> Result<()> {
        self.layout().encode_into(&self.registry, value, buf, 0)
    }

    /// 解码消息
    pub fn decode(&self, data: &[u8]) -> Result<MessageValue> {
        let mut reader = WireReader::new(data);
        self.layout().decode_from(&self.registry, &mut reader, 0)
    }

    /// 编码为带 varint 长度前缀的消息
    pub fn encode_length_delimited(&self, value: &MessageValue) -> Result<Bytes> {
        let body = self.encode(value)?;
        let mut buf = BytesMut::with_capacity(encoded_len_varint(body.len() as u64) + body.len());
        encode_varint(body.len() as u64, &mut buf);
        buf.put_slice(&body);
        Ok(buf.freeze())
    }

    /// 解码一条带长度前缀的消息
    ///
    /// 返回消息和消耗的字节数，便于连续读取消息流。
    pub fn decode_length_delimited(&self, data: &[u8]) -> Result<(MessageValue, usize)> {
        let mut reader = WireReader::new(data);
        let body = reader.read_length_delimited()?;
        let consumed = reader.position();
        Ok((self.decode(body)?, consumed))
    }

    /// 解码连续的长度前缀消息流
    pub fn decode_stream(&self, mut data: &[u8]) -> Result<Vec<MessageValue>> {
        let mut messages = Vec::new();
        while !data.is_empty() {
            let (message, consumed) = self.decode_length_delimited(data)?;
            messages.push(message);
            data = &data[consumed..];
        }
        Ok(messages)
    }

    /// 读取长度前缀但不消耗输入
    ///
    /// 返回 `(前缀字节数, 消息体长度)`；前缀不完整时返回 `None`。
    pub fn peek_length_prefix(data: &[u8]) -> Result<Option<(usize, u64)>> {
        let mut cursor = data;
        match decode_varint(&mut cursor) {
            Ok(len) => Ok(Some((data.len() - cursor.len(), len))),
            Err(protoforge_wire::WireError::UnexpectedEof { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
