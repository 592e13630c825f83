//! Wire type 与标量类型
//!
//! 标量类型到 wire type 的映射是固定的纯函数，与是否 packed 无关。

use crate::error::WireError;
use std::fmt;

/// Protobuf wire type
///
/// 只包含实际会产生的四种类型，3/4（已废弃的 group）不在此列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    /// varint 编码
    Varint = 0,
    /// 8 字节定长
    Fixed64 = 1,
    /// varint 长度前缀 + 负载
    LengthDelimited = 2,
    /// 4 字节定长
    Fixed32 = 5,
}

impl WireType {
    /// 获取 wire type 的数值
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for WireType {
    type Error = WireError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            5 => Ok(WireType::Fixed32),
            other => Err(WireError::UnimplementedWireType(other)),
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WireType::Varint => "VARINT",
            WireType::Fixed64 => "FIXED64",
            WireType::LengthDelimited => "LENGTH_DELIMITED",
            WireType::Fixed32 => "FIXED32",
        };
        f.write_str(name)
    }
}

/// Protobuf 标量类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarType {
    /// 全部标量类型
    pub const ALL: [ScalarType; 15] = [
        ScalarType::Double,
        ScalarType::Float,
        ScalarType::Int32,
        ScalarType::Int64,
        ScalarType::UInt32,
        ScalarType::UInt64,
        ScalarType::SInt32,
        ScalarType::SInt64,
        ScalarType::Fixed32,
        ScalarType::Fixed64,
        ScalarType::SFixed32,
        ScalarType::SFixed64,
        ScalarType::Bool,
        ScalarType::String,
        ScalarType::Bytes,
    ];

    /// 从 `.proto` 关键字解析标量类型
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.keyword() == keyword)
    }

    /// 获取 `.proto` 关键字
    pub const fn keyword(self) -> &'static str {
        match self {
            ScalarType::Double => "double",
            ScalarType::Float => "float",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::UInt32 => "uint32",
            ScalarType::UInt64 => "uint64",
            ScalarType::SInt32 => "sint32",
            ScalarType::SInt64 => "sint64",
            ScalarType::Fixed32 => "fixed32",
            ScalarType::Fixed64 => "fixed64",
            ScalarType::SFixed32 => "sfixed32",
            ScalarType::SFixed64 => "sfixed64",
            ScalarType::Bool => "bool",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
        }
    }

    /// 获取该类型的 wire type
    pub const fn wire_type(self) -> WireType {
        match self {
            ScalarType::Bool
            | ScalarType::Int32
            | ScalarType::Int64
            | ScalarType::UInt32
            | ScalarType::UInt64
            | ScalarType::SInt32
            | ScalarType::SInt64 => WireType::Varint,
            ScalarType::Double | ScalarType::Fixed64 | ScalarType::SFixed64 => WireType::Fixed64,
            ScalarType::Float | ScalarType::Fixed32 | ScalarType::SFixed32 => WireType::Fixed32,
            ScalarType::String | ScalarType::Bytes => WireType::LengthDelimited,
        }
    }

    /// 是否可以使用 packed 编码
    pub const fn is_packable(self) -> bool {
        !matches!(self, ScalarType::String | ScalarType::Bytes)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_type_mapping() {
        for ty in [
            ScalarType::Bool,
            ScalarType::Int32,
            ScalarType::Int64,
            ScalarType::UInt32,
            ScalarType::UInt64,
            ScalarType::SInt32,
            ScalarType::SInt64,
        ] {
            assert_eq!(ty.wire_type(), WireType::Varint, "{}", ty);
        }
        for ty in [ScalarType::Double, ScalarType::Fixed64, ScalarType::SFixed64] {
            assert_eq!(ty.wire_type(), WireType::Fixed64, "{}", ty);
        }
        for ty in [ScalarType::Float, ScalarType::Fixed32, ScalarType::SFixed32] {
            assert_eq!(ty.wire_type(), WireType::Fixed32, "{}", ty);
        }
        assert_eq!(ScalarType::String.wire_type(), WireType::LengthDelimited);
        assert_eq!(ScalarType::Bytes.wire_type(), WireType::LengthDelimited);
    }

    #[test]
    fn test_keyword_round_trip() {
        for ty in ScalarType::ALL {
            assert_eq!(ScalarType::from_keyword(ty.keyword()), Some(ty));
        }
        assert_eq!(ScalarType::from_keyword("Person"), None);
        assert_eq!(ScalarType::from_keyword("Int32"), None);
    }

    #[test]
    fn test_packable() {
        assert!(ScalarType::Int32.is_packable());
        assert!(ScalarType::Double.is_packable());
        assert!(ScalarType::Bool.is_packable());
        assert!(!ScalarType::String.is_packable());
        assert!(!ScalarType::Bytes.is_packable());
    }

    #[test]
    fn test_wire_type_from_bits() {
        assert_eq!(WireType::try_from(0), Ok(WireType::Varint));
        assert_eq!(WireType::try_from(1), Ok(WireType::Fixed64));
        assert_eq!(WireType::try_from(2), Ok(WireType::LengthDelimited));
        assert_eq!(WireType::try_from(5), Ok(WireType::Fixed32));
        assert_eq!(
            WireType::try_from(3),
            Err(WireError::UnimplementedWireType(3))
        );
        assert_eq!(
            WireType::try_from(7),
            Err(WireError::UnimplementedWireType(7))
        );
    }

    #[test]
    fn test_wire_type_display() {
        assert_eq!(WireType::LengthDelimited.to_string(), "LENGTH_DELIMITED");
        assert_eq!(WireType::Fixed32.as_u8(), 5);
    }
}
