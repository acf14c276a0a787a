use tool_gate::{Gateway, GatewayConfig, SecurityConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let root = std::env::var("TOOL_GATE_ROOT").unwrap_or_else(|_| ".".to_string());

    eprintln!("tool-gate v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Root: {}", root);

    let gateway = Gateway::new(GatewayConfig::rooted_at(root), SecurityConfig::default());

    // Audit display: the active policy and throttle state as JSON.
    let status = gateway.status().await;
    println!("{}", serde_json::to_string_pretty(&status)?);

    Ok(())
}
