//! `aocook tool` — Run one documentation tool the way the assistant would.

use aocook_core::tool::ToolCall;

pub async fn run(name: &str, args: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let registry = aocook_tools::default_registry(&config.knowledge.path);

    let arguments: serde_json::Value =
        serde_json::from_str(args).map_err(|e| format!("--args is not valid JSON: {e}"))?;

    let call = ToolCall {
        id: "cli".into(),
        name: name.to_string(),
        arguments,
    };
    let result = registry.execute(&call).await.map_err(|e| {
        format!("{e} (available: {})", registry.names().join(", "))
    })?;

    let payload = result.data.unwrap_or(serde_json::Value::Null);
    println!("{}", serde_json::to_string_pretty(&payload)?);
    if !result.success {
        return Err(format!("{name} reported an error").into());
    }

    Ok(())
}
