//! 编解码注册表
//!
//! 由 Schema 一次性构造所有枚举表和消息布局，之后只读，可在线程间共享。

use crate::enum_table::EnumTable;
use crate::error::{CodecError, Result};
use crate::message::{MessageCodec, MessageLayout};
use protoforge_config::CodecConfig;
use protoforge_schema::Schema;
use protoforge_schema::types::local_name;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 注册表内部状态
///
/// 枚举和消息的下标与 Schema 中的声明顺序一致，`TypeRef` 直接按下标引用。
#[derive(Debug)]
pub(crate) struct RegistryInner {
    pub(crate) package: Option<String>,
    pub(crate) config: CodecConfig,
    pub(crate) enums: Vec<EnumTable>,
    pub(crate) messages: Vec<MessageLayout>,
    message_index: HashMap<String, usize>,
    enum_index: HashMap<String, usize>,
}

impl RegistryInner {
    fn local<'a>(&self, name: &'a str) -> &'a str {
        local_name(self.package.as_deref(), name)
    }
}

/// 编解码注册表
///
/// 持有所有枚举表和每个消息的编解码器，克隆开销很小。
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    inner: Arc<RegistryInner>,
}

impl CodecRegistry {
    /// 使用默认配置编译 Schema
    pub fn compile(schema: &Schema) -> Result<Self> {
        Self::compile_with_config(schema, CodecConfig::default())
    }

    /// 使用指定配置编译 Schema
    ///
    /// 先校验配置和 Schema，再构造所有枚举表和消息布局。
    pub fn compile_with_config(schema: &Schema, config: CodecConfig) -> Result<Self> {
        config.validate()?;
        schema.validate()?;

        let enums: Vec<EnumTable> = schema
            .enums
            .iter()
            .map(|def| EnumTable::new(def, config.strip_enum_prefix))
            .collect();

        let messages = schema
            .messages
            .iter()
            .map(|def| MessageLayout::new(schema, def))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let message_index = messages
            .iter()
            .enumerate()
            .map(|(index, layout)| (layout.name.clone(), index))
            .collect();
        let enum_index = enums
            .iter()
            .enumerate()
            .map(|(index, table)| (table.name().to_string(), index))
            .collect();

        debug!(
            package = schema.package.as_deref().unwrap_or(""),
            messages = messages.len(),
            enums = enums.len(),
            "编解码注册表已构造"
        );

        Ok(Self {
            inner: Arc::new(RegistryInner {
                package: schema.package.clone(),
                config,
                enums,
                messages,
                message_index,
                enum_index,
            }),
        })
    }

    /// 获取消息编解码器
    ///
    /// 名称可带前导 `.` 和命名空间前缀。
    pub fn message(&self, name: &str) -> Result<MessageCodec> {
        let local = self.inner.local(name);
        self.inner
            .message_index
            .get(local)
            .map(|&index| MessageCodec::new(Arc::clone(&self.inner), index))
            .ok_or_else(|| CodecError::UnknownMessage(name.to_string()))
    }

    /// 获取枚举表
    pub fn enum_table(&self, name: &str) -> Option<&EnumTable> {
        let local = self.inner.local(name);
        self.inner
            .enum_index
            .get(local)
            .map(|&index| &self.inner.enums[index])
    }

    /// 检查消息是否已注册
    pub fn contains_message(&self, name: &str) -> bool {
        self.inner.message_index.contains_key(self.inner.local(name))
    }

    /// 按声明顺序列出消息名称
    pub fn message_names(&self) -> Vec<&str> {
        self.inner
            .messages
            .iter()
            .map(|layout| layout.name.as_str())
            .collect()
    }

    /// 按声明顺序列出枚举名称
    pub fn enum_names(&self) -> Vec<&str> {
        self.inner.enums.iter().map(EnumTable::name).collect()
    }

    /// 已注册消息数量
    pub fn message_count(&self) -> usize {
        self.inner.messages.len()
    }

    /// 已注册枚举数量
    pub fn enum_count(&self) -> usize {
        self.inner.enums.len()
    }

    pub fn config(&self) -> &CodecConfig {
        &self.inner.config
    }

    pub fn package(&self) -> Option<&str> {
        self.inner.package.as_deref()
    }
}
