//! 配置加载示例
//!
//! 演示如何从 TOML 加载编解码配置并使用环境变量覆盖

use protoforge_config::CodecConfig;

const CONFIG: &str = r#"
recursion_limit = 32
max_message_size = 65536
strict_enums = true
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== protoforge 配置加载示例 ===\n");

    // 示例 1: 使用默认配置
    println!("1. 使用默认配置:");
    let config = CodecConfig::default();
    println!("   递归深度上限: {}", config.recursion_limit);
    println!("   最大消息大小: {}", config.max_message_size);
    println!();

    // 示例 2: 从 TOML 加载，未给出的项取默认值
    println!("2. 从 TOML 加载配置:");
    match CodecConfig::from_toml_str(CONFIG) {
        Ok(config) => {
            println!("   ✓ 配置加载成功");
            println!("   严格枚举: {}", config.strict_enums);
            println!("   去除枚举前缀: {}", config.strip_enum_prefix);
        }
        Err(e) => {
            println!("   ✗ 配置加载失败: {}", e);
        }
    }
    println!();

    // 示例 3: 环境变量覆盖
    println!("3. 环境变量覆盖 (PROTOFORGE_*):");
    let config = CodecConfig::from_toml_str(CONFIG)?.load_with_env_override()?;
    println!("{}", config.summary());
    println!();

    // 示例 4: 无效配置
    println!("4. 无效配置示例:");
    let invalid_config = CodecConfig {
        recursion_limit: 0,
        ..Default::default()
    };
    match invalid_config.validate() {
        Ok(_) => println!("   ✓ 配置有效"),
        Err(e) => println!("   ✗ 配置无效: {}", e),
    }

    Ok(())
}
