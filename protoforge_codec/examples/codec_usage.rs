//! 编解码示例
//!
//! 演示如何从 TOML 描述构造 Schema、编译注册表，并完成一次编码和解码。

use protoforge_codec::prelude::*;
use protoforge_config::CodecConfig;
use protoforge_schema::Schema;

const SCHEMA: &str = r#"
package = "demo"

[[enums]]
name = "PhoneType"
values = [
    { name = "PhoneType_MOBILE", number = 0 },
    { name = "PhoneType_HOME", number = 1 },
    { name = "PhoneType_WORK", number = 2 },
]

[[messages]]
name = "PhoneNumber"

[[messages.fields]]
name = "number"
type = "string"
tag = 1
label = "required"

[[messages.fields]]
name = "type"
type = "PhoneType"
tag = 2

[[messages]]
name = "Person"

[[messages.fields]]
name = "id"
type = "int32"
tag = 1
label = "required"

[[messages.fields]]
name = "name"
type = "string"
tag = 2

[[messages.fields]]
name = "lucky_numbers"
type = "sint32"
tag = 3
label = "repeated"

[[messages.fields]]
name = "phones"
type = "PhoneNumber"
tag = 4
label = "repeated"
"#;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== protoforge 编解码示例 ===\n");

    let schema = Schema::from_toml_str(SCHEMA)?;
    let config = CodecConfig::default().load_with_env_override()?;
    println!("{}\n", config.summary());

    let registry = CodecRegistry::compile_with_config(&schema, config)?;
    println!(
        "✓ 注册表构造完成: {} 个消息, {} 个枚举",
        registry.message_count(),
        registry.enum_count()
    );

    let person = registry.message("Person")?;
    for field in person.fields() {
        println!(
            "   字段 {:<14} 编号 {:<2} 类型 {:<12} packed={}",
            field.name(),
            field.number(),
            field.type_name(),
            field.is_packed()
        );
    }

    let value = MessageValue::new()
        .with("id", 42)
        .with("name", "Ada")
        .with("lucky_numbers", Value::repeated([-1, 7, 13]))
        .with(
            "phones",
            Value::repeated([
                MessageValue::new()
                    .with("number", "555-0100")
                    .with("type", Value::enum_name("WORK")),
                MessageValue::new().with("number", "555-0199"),
            ]),
        );

    let encoded = person.encode(&value)?;
    println!("\n📤 编码结果 ({} 字节): {:02x?}", encoded.len(), &encoded[..]);

    let decoded = person.decode(&encoded)?;
    println!("📥 解码结果:");
    for (name, field) in decoded.iter() {
        println!("   {} = {:?}", name, field);
    }
    assert_eq!(decoded, value);

    let framed = person.encode_length_delimited(&value)?;
    let (_, consumed) = person.decode_length_delimited(&framed)?;
    println!("\n✓ 长度前缀形式共 {} 字节", consumed);

    Ok(())
}
