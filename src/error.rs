//! 错误类型定义
//!
//! 汇总各子 crate 的错误，并按来源归类。

use protoforge_codec::CodecError;
use protoforge_config::ConfigError;
use protoforge_schema::SchemaError;
use protoforge_wire::WireError;
use std::io;

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 配置无效
    Config,
    /// Schema 无效
    Schema,
    /// 值与 Schema 不一致，无法编码
    Encode,
    /// 输入字节无法按 Schema 解码
    Decode,
    /// 文件或流读写失败
    Io,
}

/// protoforge 统一错误枚举
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Schema 错误
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// 编解码错误
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// 线格式错误
    #[error(transparent)]
    Wire(#[from] WireError),

    /// IO 错误
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// 获取错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(ConfigError::Io(_)) | Error::Schema(SchemaError::Io(_)) | Error::Io(_) => {
                ErrorKind::Io
            }
            Error::Config(_) => ErrorKind::Config,
            Error::Schema(_) => ErrorKind::Schema,
            Error::Wire(_) => ErrorKind::Decode,
            Error::Codec(err) => codec_kind(err),
        }
    }
}

fn codec_kind(err: &CodecError) -> ErrorKind {
    match err {
        CodecError::Config(ConfigError::Io(_))
        | CodecError::Schema(SchemaError::Io(_))
        | CodecError::Io(_) => ErrorKind::Io,
        CodecError::Config(_) => ErrorKind::Config,
        CodecError::Schema(_) => ErrorKind::Schema,
        CodecError::TypeMismatch { .. } | CodecError::UnknownEnumName { .. } => ErrorKind::Encode,
        // 递归、枚举数值和大小限制在编码和解码两侧都会触发，归到解码
        CodecError::Wire(_)
        | CodecError::MissingRequiredField { .. }
        | CodecError::UnexpectedWireType { .. }
        | CodecError::UnknownEnumNumber { .. }
        | CodecError::RecursionLimitExceeded(_)
        | CodecError::MessageTooLarge { .. } => ErrorKind::Decode,
        CodecError::UnknownMessage(_) => ErrorKind::Schema,
    }
}

/// protoforge Result 类型别名
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_is_transparent() {
        let err: Error = WireError::MalformedVarint.into();
        assert_eq!(err.to_string(), WireError::MalformedVarint.to_string());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "文件未找到");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_codec_error_kinds() {
        let missing: Error = CodecError::MissingRequiredField {
            message: "Person".into(),
            field: "id".into(),
        }
        .into();
        assert_eq!(missing.kind(), ErrorKind::Decode);

        let unknown_name: Error = CodecError::UnknownEnumName {
            enum_name: "Color".into(),
            name: "PINK".into(),
        }
        .into();
        assert_eq!(unknown_name.kind(), ErrorKind::Encode);

        let nested_io: Error = CodecError::Schema(SchemaError::Io(io::Error::other("x"))).into();
        assert_eq!(nested_io.kind(), ErrorKind::Io);

        let config: Error = ConfigError::Validation("递归深度上限不能为 0".into()).into();
        assert_eq!(config.kind(), ErrorKind::Config);
    }
}
