//! Persistent report storage: `~/.petcheck/reports/`
//!
//! Every `petcheck run` is saved regardless of `--output` mode unless
//! `save_reports = false` or `--no-save`. Directory layout: `{host}_{timestamp}/`

use std::path::{Path, PathBuf};

use chrono::Utc;
use petcheck_core::{Config, RunReport};

/// Save `report` under the configured report directory.
///
/// Returns the report directory path on success.
pub fn save_report(config: &Config, report: &RunReport) -> Result<PathBuf, std::io::Error> {
    let base = match &config.report_dir {
        Some(dir) => dir.clone(),
        None => report_base_dir()?,
    };
    save_report_in(&base, config, report)
}

/// Write `config.toml` and `summary.json` into a fresh run directory below `base`.
pub fn save_report_in(
    base: &Path,
    config: &Config,
    report: &RunReport,
) -> Result<PathBuf, std::io::Error> {
    let report_dir = unique_dir(base, &build_dir_name(config.host()));
    std::fs::create_dir_all(&report_dir)?;

    let config_toml =
        toml::to_string_pretty(config).map_err(|e| std::io::Error::other(e.to_string()))?;
    std::fs::write(report_dir.join("config.toml"), config_toml)?;

    let summary = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
    std::fs::write(report_dir.join("summary.json"), summary)?;

    Ok(report_dir)
}

fn report_base_dir() -> Result<PathBuf, std::io::Error> {
    let home = std::env::var("HOME")
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::NotFound, "HOME not set"))?;
    Ok(PathBuf::from(home).join(".petcheck").join("reports"))
}

/// `{host}_{timestamp}` e.g. `petstore.swagger.io_20261019T093000`
fn build_dir_name(host: &str) -> String {
    let host = if host.is_empty() { "unknown" } else { host };
    format!("{host}_{}", Utc::now().format("%Y%m%dT%H%M%S"))
}

/// Two runs in the same second get `_2`, `_3`, ... suffixes.
fn unique_dir(base: &Path, name: &str) -> PathBuf {
    let first = base.join(name);
    if !first.exists() {
        return first;
    }
    (2..)
        .map(|n| base.join(format!("{name}_{n}")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}
