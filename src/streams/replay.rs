//! File replay feed
//!
//! Two formats:
//! - `.csv`: bars only, header `timestamp,open,high,low,close`, RFC 3339
//!   timestamps
//! - anything else: JSON lines tagged by `type`, mixing bars and fills in
//!   the order they happened

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::execution::order::FillEvent;
use crate::types::Bar;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MarketEvent {
    Bar(Bar),
    Fill(FillEvent),
}

pub fn load_events(path: &Path) -> Result<Vec<MarketEvent>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let events = if is_csv {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        parse_csv_bars(file)
            .with_context(|| format!("Invalid bar file {}", path.display()))?
            .into_iter()
            .map(MarketEvent::Bar)
            .collect()
    } else {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        parse_event_lines(&text)
            .with_context(|| format!("Invalid event log {}", path.display()))?
    };

    info!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Parse bars from CSV. Row numbers in errors count the header as line 1.
pub fn parse_csv_bars<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();

    for (i, record) in rdr.deserialize::<Bar>().enumerate() {
        let bar = record.with_context(|| format!("line {}", i + 2))?;
        bars.push(bar);
    }
    Ok(bars)
}

/// Parse one JSON event per line. Blank lines and `#` comments are skipped.
pub fn parse_event_lines(text: &str) -> Result<Vec<MarketEvent>> {
    let mut events = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: MarketEvent =
            serde_json::from_str(line).with_context(|| format!("line {}", i + 1))?;
        events.push(event);
    }
    Ok(events)
}
