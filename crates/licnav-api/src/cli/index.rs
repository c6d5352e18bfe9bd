//! `licnav index`: rebuild every enabled jurisdiction's vector collection.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::state::AppState;

#[derive(Debug, serde::Serialize)]
struct IndexRow {
    code: String,
    indexed: usize,
    error: Option<String>,
}

pub async fn rebuild(state: &AppState, json: bool) -> Result<()> {
    let guides: Vec<_> = state.registry().all().collect();

    let progress = if json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(guides.len() as u64)
    };
    if let Ok(bar_style) = ProgressStyle::default_bar().template("  {bar:30.cyan} {pos}/{len} {msg}") {
        progress.set_style(bar_style);
    }

    let mut rows = Vec::with_capacity(guides.len());
    for guide in guides {
        progress.set_message(guide.code().to_string());
        let row = match guide.index().await {
            Ok(indexed) => IndexRow {
                code: guide.code().to_string(),
                indexed,
                error: None,
            },
            Err(e) => {
                tracing::warn!(code = guide.code(), error = %e, "indexing failed");
                IndexRow {
                    code: guide.code().to_string(),
                    indexed: 0,
                    error: Some(e.to_string()),
                }
            }
        };
        rows.push(row);
        progress.inc(1);
    }
    progress.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Jurisdiction").fg(Color::White),
        Cell::new("Records indexed").fg(Color::White),
        Cell::new("Result").fg(Color::White),
    ]);
    for row in &rows {
        let result = match &row.error {
            None => Cell::new("✓ ok").fg(Color::Green),
            Some(e) => Cell::new(format!("✗ {e}")).fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(&row.code).fg(Color::Cyan),
            Cell::new(row.indexed),
            result,
        ]);
    }

    println!();
    println!("{table}");
    if rows.iter().any(|r| r.error.is_some()) {
        println!(
            "  {} Failed jurisdictions keep answering from keyword search.",
            style("!").yellow().bold()
        );
    }
    println!();
    Ok(())
}
