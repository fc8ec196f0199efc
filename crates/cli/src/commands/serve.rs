//! `aocook serve` — Start the HTTP gateway and chat UI.

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    if !config.knowledge.path.exists() {
        tracing::warn!(
            path = %config.knowledge.path.display(),
            "Knowledge base not found; tools will report documentation as unavailable"
        );
    }

    println!("AO Cook Gateway");
    println!("   Chat UI:   http://{}:{}/", config.gateway.host, config.gateway.port);
    println!("   Docs:      {}", config.knowledge.path.display());
    println!("   Model:     {}", config.assistant.model);

    aocook_gateway::start(config).await?;

    Ok(())
}
