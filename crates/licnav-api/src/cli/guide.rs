//! One-shot guidance commands: ask, search, similar, steps, categories, resources.

use std::time::Instant;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use licnav_core::chat::history::ConversationHistory;
use licnav_types::error::NavigatorError;

use crate::cli::chat::renderer::ChatRenderer;
use crate::state::AppState;

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Answer one question without keeping history.
///
/// ```bash
/// licnav ask "food truck in Miami, Florida"
/// licnav ask "payday lending" --state DE --json
/// ```
pub async fn ask(state: &AppState, query: &str, state_hint: Option<&str>, json: bool) -> Result<()> {
    let question = match state_hint {
        Some(code) => {
            let registry = state.registry();
            let named = licnav_core::detect::jurisdiction::detect_jurisdiction(
                query,
                registry.profiles(),
            )
            .is_some();
            match registry.get(code) {
                Some(guide) if !named => format!("{query} in {}", guide.name()),
                _ => query.to_string(),
            }
        }
        None => query.to_string(),
    };

    let progress = (!json).then(|| spinner("researching licenses..."));
    let start = Instant::now();
    let result = state
        .navigator
        .ask(&question, &ConversationHistory::new())
        .await;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    let answer = match result {
        Ok(answer) => answer,
        Err(NavigatorError::EmptyQuery) => anyhow::bail!("Please describe your business."),
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }

    let renderer = ChatRenderer::new();
    println!();
    println!("{}", renderer.render(&answer.markdown));
    renderer.print_footer(&answer, start.elapsed().as_millis() as u64);
    println!();
    Ok(())
}

/// Similarity search over one jurisdiction's records.
pub async fn search(
    state: &AppState,
    query: &str,
    state_code: Option<&str>,
    top_k: Option<usize>,
    json: bool,
) -> Result<()> {
    let guide = state.guide(state_code)?;
    let k = top_k.unwrap_or(state.config.retrieval.top_k).max(1);

    if json {
        let result = guide.lookup(query, k).await;
        let out = serde_json::json!({
            "jurisdiction": guide.code(),
            "query": query,
            "method": result.method,
            "hits": result.hits,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let text = guide.search_licenses(query, k).await;
    println!();
    println!("{}", ChatRenderer::new().render(&text));
    Ok(())
}

/// Licenses similar to `license_type`, excluding the type itself.
pub async fn similar(
    state: &AppState,
    license_type: &str,
    state_code: Option<&str>,
    top_k: Option<usize>,
    json: bool,
) -> Result<()> {
    let guide = state.guide(state_code)?;
    let k = top_k.unwrap_or(state.config.retrieval.similar_top_k).max(1);

    if json {
        let result = guide.find_similar(license_type, k).await;
        let out = serde_json::json!({
            "jurisdiction": guide.code(),
            "license_type": license_type,
            "method": result.method,
            "hits": result.hits,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let text = guide.similar_licenses(license_type, k).await;
    println!();
    println!("{}", ChatRenderer::new().render(&text));
    Ok(())
}

pub fn steps(state: &AppState, state_code: Option<&str>, json: bool) -> Result<()> {
    let guide = state.guide(state_code)?;
    let profile = guide.profile();

    if json {
        let out = serde_json::json!({
            "jurisdiction": guide.code(),
            "steps": profile.steps,
            "total_cost": profile.steps_total_cost,
            "total_timeline": profile.steps_total_timeline,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("{}", ChatRenderer::new().render(&guide.business_steps()));
    Ok(())
}

pub fn categories(state: &AppState, state_code: Option<&str>, json: bool) -> Result<()> {
    let guide = state.guide(state_code)?;
    let categories = guide.license_categories();

    if json {
        let out = serde_json::json!({
            "jurisdiction": guide.code(),
            "categories": categories,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if categories.is_empty() {
        println!();
        println!(
            "  {} No license categories recorded for {}.",
            style("i").blue().bold(),
            guide.name()
        );
        println!();
        return Ok(());
    }

    let records = &guide.profile().records;
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Category").fg(Color::White),
        Cell::new("Records").fg(Color::White),
    ]);
    for category in &categories {
        let count = records.iter().filter(|r| &r.category == category).count();
        table.add_row(vec![
            Cell::new(category).fg(Color::Cyan),
            Cell::new(count).fg(Color::White),
        ]);
    }

    println!();
    println!("  {} license categories", style(guide.name()).bold());
    println!("{table}");
    println!();
    Ok(())
}

pub fn resources(
    state: &AppState,
    state_code: Option<&str>,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let guide = state.guide(state_code)?;

    if json {
        let links: Vec<_> = guide
            .profile()
            .resources
            .iter()
            .filter(|r| category.is_none_or(|c| r.category.eq_ignore_ascii_case(c)))
            .collect();
        let out = serde_json::json!({
            "jurisdiction": guide.code(),
            "category": category,
            "resources": links,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("{}", ChatRenderer::new().render(&guide.resources(category)));
    Ok(())
}
