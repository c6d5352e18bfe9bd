//! `licnav config show|path`.

use std::path::Path;

use anyhow::Result;
use console::style;

use licnav_infra::config::{config_path, load_app_config};

/// Print the effective configuration, defaults filled in.
pub async fn show(data_dir: &Path, json: bool) -> Result<()> {
    let config = load_app_config(data_dir).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let path = config_path(data_dir);
    let origin = if path.exists() { "" } else { " (not created, defaults)" };
    println!(
        "{}",
        style(format!("# {}{origin}", path.display())).dim()
    );
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub fn path(data_dir: &Path, json: bool) -> Result<()> {
    let path = config_path(data_dir);
    if json {
        let out = serde_json::json!({
            "data_dir": data_dir.display().to_string(),
            "config": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", path.display());
    }
    Ok(())
}
