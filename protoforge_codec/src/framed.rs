//! 长度前缀消息流编解码器
//!
//! 每条消息前带 varint 字节数，适配 `tokio_util::codec` 的 `Framed`/`FramedRead`。

use crate::error::CodecError;
use crate::message::MessageCodec;
use crate::value::MessageValue;
use bytes::{Buf, BufMut, BytesMut};
use protoforge_wire::{encode_varint, encoded_len_varint};
use tokio_util::codec::{Decoder, Encoder};

/// 长度前缀消息流编解码器
#[derive(Debug, Clone)]
pub struct DelimitedCodec {
    codec: MessageCodec,
    max_message_size: usize,
}

impl DelimitedCodec {
    /// 创建新的编解码器，大小上限取注册表配置
    pub fn new(codec: MessageCodec) -> Self {
        let max_message_size = codec.max_message_size();
        Self {
            codec,
            max_message_size,
        }
    }

    /// 覆盖单条消息的大小上限
    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    /// 获取消息编解码器引用
    pub fn codec(&self) -> &MessageCodec {
        &self.codec
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    fn check_size(&self, size: usize) -> Result<(), CodecError> {
        if size > self.max_message_size {
            return Err(CodecError::MessageTooLarge {
                size,
                max: self.max_message_size,
            });
        }
        Ok(())
    }
}

impl Encoder<MessageValue> for DelimitedCodec {
    type Error = CodecError;

    fn encode(&mut self, item: MessageValue, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let body = self.codec.encode(&item)?;
        self.check_size(body.len())?;

        dst.reserve(encoded_len_varint(body.len() as u64) + body.len());
        encode_varint(body.len() as u64, dst);
        dst.put_slice(&body);
        Ok(())
    }
}

impl Decoder for DelimitedCodec {
    type Item = MessageValue;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some((prefix_len, body_len)) = MessageCodec::peek_length_prefix(&src[..])? else {
            return Ok(None);
        };

        let body_len = usize::try_from(body_len).unwrap_or(usize::MAX);
        self.check_size(body_len)?;

        let Some(frame_len) = prefix_len.checked_add(body_len) else {
            return Err(CodecError::MessageTooLarge {
                size: body_len,
                max: self.max_message_size,
            });
        };
        if src.len() < frame_len {
            // 数据不完整，预留剩余空间
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        src.advance(prefix_len);
        let body = src.split_to(body_len);
        self.codec.decode(&body).map(Some)
    }
}
