use anyhow::Result;
use callscope_config::Config;
use callscope_engine::Analyzer;
use std::sync::Arc;

pub async fn handle(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let analyzer = Arc::new(Analyzer::from_config(config)?);

    println!("Starting callscope server on {}:{}", host, port);
    println!("  Log file: {}", analyzer.log().path().display());
    callscope_server::serve(analyzer, &host, port).await?;

    Ok(())
}
