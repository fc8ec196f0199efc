//! `aocook doctor` — Diagnose setup problems.

use aocook_config::AppConfig;
use aocook_knowledge::KnowledgeBase;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("AO Cook Doctor — Setup Diagnostics");
    println!("==================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  [ok]   Config file found: {}", config_path.display());
    } else {
        println!("  [warn] No config file; using defaults (run `aocook onboard`)");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  [ok]   Config valid");
            config
        }
        Err(e) => {
            println!("  [fail] Config invalid: {e}");
            println!("\n  1 issue found.\n");
            return Err("configuration is invalid".into());
        }
    };

    if config.has_api_key() {
        println!("  [ok]   API key configured");
    } else {
        println!("  [fail] No API key; set OPENAI_API_KEY or api_key in config.toml");
        issues += 1;
    }

    let docs = &config.knowledge.path;
    match KnowledgeBase::load(docs) {
        Ok(kb) => {
            println!("  [ok]   Knowledge base loaded: {}", docs.display());
            for (grouping, leaves) in kb.stats() {
                println!("           {grouping:<12} {leaves} entries");
            }
        }
        Err(e) => {
            println!("  [fail] {e}");
            issues += 1;
        }
    }

    println!("\n  Model:   {}", config.assistant.model);
    println!("  Gateway: {}:{}", config.gateway.host, config.gateway.port);

    if issues == 0 {
        println!("\n  All checks passed.\n");
    } else {
        println!("\n  {issues} issue(s) found.\n");
    }

    Ok(())
}
