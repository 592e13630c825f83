//! 编解码配置管理
//!
//! 提供编解码器的运行参数，支持 TOML 文件和环境变量覆盖。

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析配置文件失败: {0}")]
    Parse(String),

    /// 验证错误
    #[error("配置验证失败: {0}")]
    Validation(String),

    /// 环境变量错误
    #[error("环境变量解析失败: {0}")]
    EnvVar(String),
}

/// 配置 Result 类型
pub type Result<T> = std::result::Result<T, ConfigError>;

/// 递归深度上限的最大允许值
pub const MAX_RECURSION_LIMIT: u32 = 10_000;

/// 编解码配置
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// 嵌套消息的最大递归深度
    #[serde(default = "default_recursion_limit")]
    pub recursion_limit: u32,

    /// 长度前缀消息流中单条消息的最大字节数
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,

    /// 解码遇到未定义的枚举整数时是否报错
    #[serde(default)]
    pub strict_enums: bool,

    /// 是否去掉枚举值名称中的 `<EnumName>_` 前缀
    #[serde(default = "default_strip_enum_prefix")]
    pub strip_enum_prefix: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            recursion_limit: default_recursion_limit(),
            max_message_size: default_max_message_size(),
            strict_enums: false,
            strip_enum_prefix: default_strip_enum_prefix(),
        }
    }
}

impl CodecConfig {
    /// 从 TOML 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 从环境变量加载配置并覆盖
    ///
    /// 支持的环境变量：
    /// - PROTOFORGE_RECURSION_LIMIT: 最大递归深度
    /// - PROTOFORGE_MAX_MESSAGE_SIZE: 消息流中单条消息的最大字节数
    /// - PROTOFORGE_STRICT_ENUMS: 严格枚举模式 (true/false)
    /// - PROTOFORGE_STRIP_ENUM_PREFIX: 去除枚举名前缀 (true/false)
    pub fn load_with_env_override(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// 使用任意查找函数覆盖配置
    ///
    /// `lookup` 以环境变量名为键，返回 `None` 表示不覆盖该项。
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(limit) = lookup("PROTOFORGE_RECURSION_LIMIT") {
            self.recursion_limit = limit.parse().map_err(|_| {
                ConfigError::EnvVar("PROTOFORGE_RECURSION_LIMIT 必须是有效的 u32 数字".to_string())
            })?;
        }

        if let Some(size) = lookup("PROTOFORGE_MAX_MESSAGE_SIZE") {
            self.max_message_size = size.parse().map_err(|_| {
                ConfigError::EnvVar("PROTOFORGE_MAX_MESSAGE_SIZE 必须是有效的 usize 数字".to_string())
            })?;
        }

        if let Some(strict) = lookup("PROTOFORGE_STRICT_ENUMS") {
            self.strict_enums = strict.parse().map_err(|_| {
                ConfigError::EnvVar("PROTOFORGE_STRICT_ENUMS 必须是 true 或 false".to_string())
            })?;
        }

        if let Some(strip) = lookup("PROTOFORGE_STRIP_ENUM_PREFIX") {
            self.strip_enum_prefix = strip.parse().map_err(|_| {
                ConfigError::EnvVar("PROTOFORGE_STRIP_ENUM_PREFIX 必须是 true 或 false".to_string())
            })?;
        }

        Ok(self)
    }

    /// 从文件加载并应用环境变量覆盖
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_file(path)?.load_with_env_override()
    }

    /// 验证配置是否有效
    pub fn validate(&self) -> Result<()> {
        if self.recursion_limit == 0 {
            return Err(ConfigError::Validation("递归深度上限不能为 0".to_string()));
        }
        if self.recursion_limit > MAX_RECURSION_LIMIT {
            return Err(ConfigError::Validation(format!(
                "递归深度上限过大 (必须 <= {})",
                MAX_RECURSION_LIMIT
            )));
        }
        if self.max_message_size == 0 {
            return Err(ConfigError::Validation("最大消息大小不能为 0".to_string()));
        }
        Ok(())
    }

    /// 获取配置摘要信息
    pub fn summary(&self) -> String {
        format!(
            "protoforge 编解码配置:\n  递归深度上限: {}\n  最大消息大小: {} 字节\n  严格枚举: {}\n  去除枚举前缀: {}",
            self.recursion_limit, self.max_message_size, self.strict_enums, self.strip_enum_prefix
        )
    }
}

// 默认值函数
fn default_recursion_limit() -> u32 {
    100
}

fn default_max_message_size() -> usize {
    16 * 1024 * 1024
}

fn default_strip_enum_prefix() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert_eq!(config.recursion_limit, 100);
        assert_eq!(config.max_message_size, 16 * 1024 * 1024);
        assert!(!config.strict_enums);
        assert!(config.strip_enum_prefix);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = CodecConfig::from_toml_str("strict_enums = true\nrecursion_limit = 8\n").unwrap();
        assert!(config.strict_enums);
        assert_eq!(config.recursion_limit, 8);
        assert!(config.strip_enum_prefix);
    }

    #[test]
    fn test_from_toml_invalid() {
        let result = CodecConfig::from_toml_str("recursion_limit = \"deep\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validate_zero_recursion_limit() {
        let config = CodecConfig {
            recursion_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_too_deep_recursion_limit() {
        let config = CodecConfig {
            recursion_limit: MAX_RECURSION_LIMIT + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_message_size() {
        let config = CodecConfig {
            max_message_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_override_recursion_limit() {
        let config = CodecConfig::default()
            .apply_overrides(lookup_from(&[("PROTOFORGE_RECURSION_LIMIT", "32")]))
            .unwrap();
        assert_eq!(config.recursion_limit, 32);
    }

    #[test]
    fn test_override_flags() {
        let config = CodecConfig::default()
            .apply_overrides(lookup_from(&[
                ("PROTOFORGE_STRICT_ENUMS", "true"),
                ("PROTOFORGE_STRIP_ENUM_PREFIX", "false"),
                ("PROTOFORGE_MAX_MESSAGE_SIZE", "1024"),
            ]))
            .unwrap();
        assert!(config.strict_enums);
        assert!(!config.strip_enum_prefix);
        assert_eq!(config.max_message_size, 1024);
    }

    #[test]
    fn test_override_invalid_value() {
        let result = CodecConfig::default()
            .apply_overrides(lookup_from(&[("PROTOFORGE_STRICT_ENUMS", "maybe")]));
        assert!(matches!(result, Err(ConfigError::EnvVar(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let result = CodecConfig::from_file("/nonexistent/protoforge.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_summary() {
        let summary = CodecConfig::default().summary();
        assert!(summary.contains("protoforge 编解码配置"));
        assert!(summary.contains("100"));
    }
}
