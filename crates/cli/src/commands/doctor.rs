//! `shellwright doctor` — Diagnose configuration and connectivity.

use shellwright_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 shellwright doctor — System Diagnostics");
    println!("=========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file — defaults in use (run `shellwright onboard`)");
    }

    let config = match super::load_config() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. See above for details.");
            return Ok(());
        }
    };

    println!("     Endpoint: {}", config.api_url);
    println!("     Model:    {}", config.model);

    if let Some(dir) = &config.workspace_dir {
        if dir.is_dir() {
            println!("  ✅ Workspace directory exists: {}", dir.display());
        } else {
            println!("  ❌ Workspace directory missing: {}", dir.display());
            issues += 1;
        }
    }

    match shellwright_providers::build_from_config(&config) {
        Ok(provider) => {
            println!("  ✅ API key configured");
            match provider.health_check().await {
                Ok(true) => println!("  ✅ Provider '{}' reachable", provider.name()),
                Ok(false) => {
                    println!("  ❌ Provider '{}' rejected the health check", provider.name());
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ⚠️  {e} — set OPENROUTER_API_KEY or run `shellwright onboard`");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
