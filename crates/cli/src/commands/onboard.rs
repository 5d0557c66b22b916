//! `shellwright onboard` — First-time setup.

use shellwright_config::AppConfig;
use shellwright_core::Error;
use std::io::{BufRead, Write};

/// Trimmed key from one line of input, `None` when blank.
fn read_key(input: &mut impl BufRead) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let key = line.trim();
    Ok((!key.is_empty()).then(|| key.to_string()))
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    println!("🔧 shellwright — First-Time Setup");
    println!("=================================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    let mut config = AppConfig::load_from(&config_path).map_err(Error::from)?;

    if config.credential().is_some() {
        println!("  API key already present in {}", config_path.display());
    } else {
        config.apply_env(|name| std::env::var(name).ok());
        if config.credential().is_some() {
            println!("  Using API key from the environment");
        } else {
            println!("  Get an OpenRouter key at: https://openrouter.ai/keys");
            print!("  Please enter your OpenRouter API key: ");
            std::io::stdout().flush()?;

            let key = read_key(&mut std::io::stdin().lock())?;
            let Some(key) = key else {
                return Err("No API key entered; nothing saved.".into());
            };
            config.api_key = Some(key);
        }
    }

    config.save_to(&config_path)?;
    println!("✅ Saved config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Review settings with: shellwright config show");
    println!("   2. Start chatting: shellwright chat");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_trimmed() {
        let mut input = "  sk-or-v1-abc \n".as_bytes();
        assert_eq!(read_key(&mut input).unwrap().as_deref(), Some("sk-or-v1-abc"));
    }

    #[test]
    fn blank_input_is_no_key() {
        let mut input = "   \n".as_bytes();
        assert!(read_key(&mut input).unwrap().is_none());
        let mut empty = "".as_bytes();
        assert!(read_key(&mut empty).unwrap().is_none());
    }
}
