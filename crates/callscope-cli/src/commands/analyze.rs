use anyhow::{Context, Result};
use callscope_config::Config;
use callscope_engine::Analyzer;
use std::io::Read;
use std::path::PathBuf;

pub async fn handle(config: &Config, text: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let transcript = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read transcript from {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read transcript from stdin")?;
            buf
        }
    };

    let analyzer = Analyzer::from_config(config)?;
    let result = analyzer.analyze(&transcript).await?;

    println!("✓ Analysis saved to {}", analyzer.log().path().display());
    println!();
    println!("Transcript:");
    println!("  {}", result.transcript);
    println!("Summary:");
    println!("  {}", result.summary);
    println!("Sentiment: {}", result.sentiment);
    println!("Timestamp: {}", result.timestamp);

    Ok(())
}
