//! 枚举表
//!
//! 每个枚举构造一次双向映射，之后只读。

use protoforge_schema::EnumDef;
use std::collections::HashMap;
use tracing::debug;

/// 枚举名称 ↔ 整数映射
#[derive(Debug, Clone)]
pub struct EnumTable {
    name: String,
    encode: HashMap<String, i32>,
    decode: HashMap<i32, String>,
}

impl EnumTable {
    /// 由枚举定义构造
    ///
    /// `strip_prefix` 为 true 时去掉值名称中的 `<EnumName>_` 前缀。
    /// 同一整数对应多个名称时，解码方向保留最后一个。
    pub fn new(def: &EnumDef, strip_prefix: bool) -> Self {
        let mut encode = HashMap::with_capacity(def.values.len());
        let mut decode = HashMap::with_capacity(def.values.len());

        for value in &def.values {
            let name = if strip_prefix {
                strip_enum_prefix(&def.name, &value.name)
            } else {
                value.name.as_str()
            };

            encode.insert(name.to_string(), value.number);
            if let Some(previous) = decode.insert(value.number, name.to_string()) {
                debug!(
                    enum_name = %def.name,
                    number = value.number,
                    previous = %previous,
                    current = name,
                    "枚举数值重复，解码使用后出现的名称"
                );
            }
        }

        Self {
            name: def.name.clone(),
            encode,
            decode,
        }
    }

    /// 枚举名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 名称 → 整数
    pub fn encode(&self, name: &str) -> Option<i32> {
        self.encode.get(name).copied()
    }

    /// 整数 → 名称
    pub fn decode(&self, number: i32) -> Option<&str> {
        self.decode.get(&number).map(String::as_str)
    }

    /// 编码映射
    pub fn encode_map(&self) -> &HashMap<String, i32> {
        &self.encode
    }

    /// 解码映射
    pub fn decode_map(&self) -> &HashMap<i32, String> {
        &self.decode
    }

    /// 名称数量
    pub fn len(&self) -> usize {
        self.encode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encode.is_empty()
    }
}

/// 去掉 `<EnumName>_` 前缀，去掉后为空时保留原名
pub fn strip_enum_prefix<'a>(enum_name: &str, value_name: &'a str) -> &'a str {
    value_name
        .strip_prefix(enum_name)
        .and_then(|rest| rest.strip_prefix('_'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(value_name)
}
