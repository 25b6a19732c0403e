//! `newsdeck doctor`: Check configuration and credentials.

use newsdeck_config::{AppConfig, ProviderConfig};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 newsdeck Doctor: Configuration Check");
    println!("========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file: using defaults (run `newsdeck onboard`)");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. See above for details.");
            return Ok(());
        }
    };

    let mut usable_text = 0;
    for (slot, provider) in [("primary", &config.text.primary), ("secondary", &config.text.secondary)] {
        if report_provider(slot, provider) {
            usable_text += 1;
        }
    }
    if usable_text == 0 {
        println!("  ⚠️  No text provider usable: decks will use extractive copy only");
        issues += 1;
    }

    if config.images.credential().is_some() {
        println!("  ✅ Image generation enabled ({}, {})", config.images.model, config.images.size);
    } else if !config.images.enabled {
        println!("  ➖ Image generation disabled");
    } else {
        println!("  ⚠️  No usable image key (needs a real `sk-` key): empty slots reuse article images");
        issues += 1;
    }

    println!("  ✅ Default deck size: {} cards", config.deck.size().count());

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

fn report_provider(slot: &str, provider: &ProviderConfig) -> bool {
    let kind = provider.kind.as_str();
    if !provider.enabled {
        println!("  ➖ text.{slot} ({kind}) disabled");
        false
    } else if provider.is_usable() {
        println!("  ✅ text.{slot} ({kind}) ready: models: {}", provider.models.join(", "));
        true
    } else {
        println!(
            "  ⚠️  text.{slot} ({kind}) has no API key: set {}",
            provider.kind.key_env_vars().join(" or ")
        );
        false
    }
}
