//! Jurisdiction management: list, enable, disable, add.
//!
//! These commands only touch `config.toml` and the custom profile directory,
//! so they run without loading the embedding model or the LLM provider.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use licnav_infra::config::{load_app_config, save_app_config};
use licnav_infra::jurisdiction::{ProfileStore, builtin_profiles};
use licnav_types::error::ConfigError;
use licnav_types::jurisdiction::JurisdictionProfile;

#[derive(Debug, serde::Serialize)]
struct StateRow {
    code: String,
    name: String,
    source: &'static str,
    enabled: bool,
    records: usize,
}

/// Built-in and custom profiles keyed by code. Custom profiles win.
fn known_profiles(data_dir: &Path) -> Result<BTreeMap<String, (JurisdictionProfile, &'static str)>> {
    let mut known = BTreeMap::new();
    for profile in builtin_profiles()? {
        known.insert(profile.code.clone(), (profile, "built-in"));
    }
    for profile in ProfileStore::new(data_dir.to_path_buf()).list_custom()? {
        known.insert(profile.code.clone(), (profile, "custom"));
    }
    Ok(known)
}

pub async fn list(data_dir: &Path, json: bool) -> Result<()> {
    let config = load_app_config(data_dir).await;
    let rows: Vec<StateRow> = known_profiles(data_dir)?
        .into_values()
        .filter(|(profile, _)| !profile.is_generic())
        .map(|(profile, source)| StateRow {
            enabled: config.is_state_enabled(&profile.code),
            records: profile.records.len(),
            code: profile.code,
            name: profile.name,
            source,
        })
        .collect();

    if json {
        let out = serde_json::json!({
            "default_state": config.default_state,
            "states": rows,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Code").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Source").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Records").fg(Color::White),
    ]);

    for row in &rows {
        let status = if row.enabled {
            Cell::new("● enabled").fg(Color::Green)
        } else {
            Cell::new("○ disabled").fg(Color::DarkGrey)
        };
        let code = if row.code.eq_ignore_ascii_case(&config.default_state) {
            format!("{} *", row.code)
        } else {
            row.code.clone()
        };
        table.add_row(vec![
            Cell::new(code).fg(Color::Cyan),
            Cell::new(&row.name),
            Cell::new(row.source).fg(Color::DarkGrey),
            status,
            Cell::new(row.records),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} default state, questions naming no state use the generic guide otherwise",
        style("*").bold()
    );
    println!();
    Ok(())
}

pub async fn enable(data_dir: &Path, code: &str, json: bool) -> Result<()> {
    let code = code.trim().to_ascii_uppercase();
    if !known_profiles(data_dir)?.contains_key(&code) || code == "GENERIC" {
        return Err(ConfigError::UnknownState(code).into());
    }

    let mut config = load_app_config(data_dir).await;
    let changed = config.enable_state(&code);
    if changed {
        save_app_config(data_dir, &config).await?;
    }
    report(&code, "enabled", changed, json)
}

pub async fn disable(data_dir: &Path, code: &str, json: bool) -> Result<()> {
    let code = code.trim().to_ascii_uppercase();
    let mut config = load_app_config(data_dir).await;
    let changed = config.disable_state(&code);
    if changed {
        save_app_config(data_dir, &config).await?;
    }
    report(&code, "disabled", changed, json)
}

/// Scaffold `{data_dir}/jurisdictions/{code}.toml` and enable it.
pub async fn add(data_dir: &Path, code: &str, name: &str, json: bool) -> Result<()> {
    let store = ProfileStore::new(data_dir.to_path_buf());
    let path = store.scaffold(code, name)?;
    let code = code.trim().to_ascii_uppercase();

    let mut config = load_app_config(data_dir).await;
    if config.enable_state(&code) {
        save_app_config(data_dir, &config).await?;
    }

    if json {
        let out = serde_json::json!({
            "code": code,
            "name": name,
            "path": path.display().to_string(),
            "enabled": true,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Created {} ({})",
        style("✓").green().bold(),
        style(name).cyan(),
        code
    );
    println!("  Add license records to: {}", style(path.display()).yellow());
    println!();
    Ok(())
}

fn report(code: &str, action: &str, changed: bool, json: bool) -> Result<()> {
    if json {
        let out = serde_json::json!({ "code": code, "status": action, "changed": changed });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if changed {
        println!("  {} {code} {action}", style("✓").green().bold());
    } else {
        println!("  {} {code} already {action}", style("i").blue().bold());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn enable_unknown_state_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = enable(dir.path(), "ZZ", true).await.unwrap_err();
        assert!(err.to_string().contains("ZZ"));
    }

    #[tokio::test]
    async fn disable_then_enable_persists() {
        let dir = tempfile::tempdir().unwrap();
        disable(dir.path(), "fl", true).await.unwrap();
        assert_eq!(load_app_config(dir.path()).await.enabled_states, vec!["DE"]);

        enable(dir.path(), "FL", true).await.unwrap();
        assert_eq!(
            load_app_config(dir.path()).await.enabled_states,
            vec!["DE", "FL"]
        );
    }

    #[tokio::test]
    async fn add_scaffolds_and_enables() {
        let dir = tempfile::tempdir().unwrap();
        add(dir.path(), "tx", "Texas", true).await.unwrap();

        assert!(dir.path().join("jurisdictions/tx.toml").exists());
        let config = load_app_config(dir.path()).await;
        assert!(config.is_state_enabled("TX"));

        let known = known_profiles(dir.path()).unwrap();
        assert_eq!(known["TX"].1, "custom");
    }
}
