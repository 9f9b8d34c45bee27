use anyhow::Result;
use callscope_config::Config;
use callscope_storage::AnalysisLog;

pub async fn handle(config: &Config, limit: Option<usize>) -> Result<()> {
    let log = AnalysisLog::new(config.storage.log_path.clone());
    let records = log.read_all().await?;

    if records.is_empty() {
        println!("No analyses found.");
        return Ok(());
    }

    let skip = limit.map_or(0, |n| records.len().saturating_sub(n));

    println!("Analyses ({} total):", records.len());
    for record in records.iter().skip(skip) {
        println!();
        println!("  [{}] {}", record.timestamp, record.sentiment);
        println!("    Summary: {}", record.summary);
        println!("    Transcript: {}", preview(&record.transcript, 120));
    }

    Ok(())
}

/// First `max` characters on one line
fn preview(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &flat[..idx]),
        None => flat,
    }
}
