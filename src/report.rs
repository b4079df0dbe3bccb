use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::Style;
use serde::Serialize;

use crate::check::{Group, RunReport};
use crate::cms_config::DuplicateScope;

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub timestamp: String,
    pub base_url: String,
    pub duplicate_scope: DuplicateScope,
    pub checks_run: usize,
    pub checks_passed: usize,
    pub success: bool,
    pub groups: Vec<JsonGroup>,
}

#[derive(Debug, Serialize)]
pub struct JsonGroup {
    pub group: Group,
    pub checks_run: usize,
    pub checks_passed: usize,
    pub checks: Vec<JsonCheck>,
}

#[derive(Debug, Serialize)]
pub struct JsonCheck {
    pub name: String,
    pub passed: bool,
    pub outcome: &'static str,
    pub payload: serde_json::Value,
}

impl JsonReport {
    pub fn from_run(report: &RunReport) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            base_url: report.base_url.as_str().to_string(),
            duplicate_scope: report.duplicate_scope,
            checks_run: report.total_run(),
            checks_passed: report.total_passed(),
            success: report.all_passed(),
            groups: report
                .groups
                .iter()
                .map(|g| JsonGroup {
                    group: g.group,
                    checks_run: g.run,
                    checks_passed: g.passed,
                    checks: g
                        .results
                        .iter()
                        .map(|r| JsonCheck {
                            name: r.name.clone(),
                            passed: r.passed(),
                            outcome: r.outcome.kind(),
                            payload: r.outcome.legacy_payload(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

pub fn print_summary(report: &RunReport) {
    let green = Style::new().green().bold();
    let red = Style::new().red().bold();

    println!();
    println!("Test Results:");
    println!("{}", "-".repeat(60));

    for group in &report.groups {
        for r in &group.results {
            if r.passed() {
                println!("{} {}::{}", green.apply_to("[PASS]"), group.group, r.name);
            } else {
                println!("{} {}::{}", red.apply_to("[FAIL]"), group.group, r.name);
                if let Some(first_line) = r.outcome.failure_detail().lines().next() {
                    println!("       {first_line}");
                }
            }
        }
        println!("  {} tests passed: {}/{}", group.group, group.passed, group.run);
    }

    println!("{}", "-".repeat(60));
    let totals = format!(
        "Tests passed: {}/{}",
        report.total_passed(),
        report.total_run()
    );
    if report.all_passed() {
        println!("{}", green.apply_to(totals));
    } else {
        println!("{}", red.apply_to(totals));
    }
    println!();
}

/// Write the run as pretty-printed JSON.
pub fn write_json(report: &RunReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport::from_run(report))
        .context("Failed to serialize report to JSON")?;
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;
    Ok(())
}
