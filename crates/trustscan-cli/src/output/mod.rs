//! Console rendering and JSON file output.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use trustscan::TrustReport;

/// How one evaluation was obtained.
#[derive(Debug, Clone, Serialize)]
pub struct QueryMeta {
    /// Target hostname
    pub host: String,
    /// Target port
    pub port: u16,
    /// Resolved peer socket address
    pub peer_address: String,
    /// Negotiated protocol label
    pub protocol: String,
    /// Whether SNI was sent
    pub use_sni: bool,
}

/// One discovered root's evaluation, tagged with its query metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    #[serde(rename = "_query")]
    pub query: QueryMeta,
    #[serde(flatten)]
    pub report: TrustReport,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    generator: String,
    targets: &'a [String],
    execution_date: DateTime<Utc>,
    execution_duration_seconds: f64,
    evaluations: &'a [Evaluation],
}

/// Render one target's evaluations to the console.
pub fn render_target(evaluations: &[Evaluation]) {
    let Some(first) = evaluations.first() else {
        return;
    };
    println!();
    println!(
        "  {} {} ({}, {})",
        "Target".bright_cyan(),
        format!("{}:{}", first.query.host, first.query.port).bright_white(),
        first.query.peer_address.dimmed(),
        first.query.protocol.dimmed()
    );

    for evaluation in evaluations {
        render_report(&evaluation.report);
    }
}

fn render_report(report: &TrustReport) {
    println!();
    let verdict = if report.is_trusted {
        "TRUSTED".bright_green()
    } else {
        "NOT TRUSTED".bright_red()
    };
    println!(
        "  {} {} {}",
        verdict,
        report
            .common_name
            .as_deref()
            .unwrap_or("(unknown root)")
            .bright_white(),
        report.key_id.as_str().dimmed()
    );
    if let Some(not_after) = report.not_after {
        println!("  {}", date_diff(not_after).dimmed());
    }

    let mut current_group = "";
    for store in &report.stores {
        if store.group != current_group {
            current_group = &store.group;
            println!();
            println!("  {}", group_heading(current_group).bright_cyan());
        }
        let mark = if store.trusted {
            "✓".bright_green()
        } else {
            "✗".bright_red()
        };
        println!(
            "    {} {:<32} {}",
            mark,
            store.name,
            store.description.dimmed()
        );
    }
    println!();
}

fn group_heading(group: &str) -> &'static str {
    match group {
        "source" => "Sources",
        "platform" => "Platforms",
        "browser" => "Browsers",
        "language" => "Languages",
        _ => "Other",
    }
}

/// Human phrasing for a validity end relative to now.
pub fn date_diff(not_after: DateTime<Utc>) -> String {
    let days = (not_after - Utc::now()).num_days();
    match days {
        i64::MIN..=-2 => format!("Expired {} days ago", -days),
        -1 => "Expired yesterday".to_string(),
        0 => "Expires today".to_string(),
        1 => "Expires tomorrow".to_string(),
        2..=365 => format!("Expires in {days} days"),
        // Years round to nearest, so 18 months reads as 2 years.
        _ => format!("Expires in {days} days ({} years)", (days + 182) / 365),
    }
}

/// Write the full run as a pretty-printed JSON document.
pub fn write_json_file(
    path: &Path,
    targets: &[String],
    execution_date: DateTime<Utc>,
    elapsed: Duration,
    evaluations: &[Evaluation],
) -> Result<()> {
    let document = JsonDocument {
        generator: format!("trustscan {}", env!("CARGO_PKG_VERSION")),
        targets,
        execution_date,
        execution_duration_seconds: elapsed.as_secs_f64(),
        evaluations,
    };
    std::fs::write(path, serde_json::to_string_pretty(&document)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    #[test]
    fn date_diff_phrasing() {
        let past = Utc::now().checked_sub_days(Days::new(10)).unwrap();
        assert_eq!(date_diff(past), "Expired 10 days ago");

        let soon = Utc::now().checked_add_days(Days::new(31)).unwrap();
        assert_eq!(date_diff(soon), "Expires in 30 days");

        let far = Utc::now().checked_add_days(Days::new(800)).unwrap();
        assert_eq!(date_diff(far), "Expires in 799 days (2 years)");
    }

    #[test]
    fn date_diff_edge_days() {
        let yesterday = Utc::now().checked_sub_days(Days::new(1)).unwrap();
        assert_eq!(date_diff(yesterday), "Expired yesterday");

        let today = Utc::now() + chrono::Duration::hours(1);
        assert_eq!(date_diff(today), "Expires today");

        let tomorrow = Utc::now() + chrono::Duration::hours(36);
        assert_eq!(date_diff(tomorrow), "Expires tomorrow");
    }

    #[test]
    fn date_diff_rounds_years_to_nearest() {
        // 18 months out rounds up to 2 years rather than truncating to 1.
        let mid = Utc::now().checked_add_days(Days::new(550)).unwrap();
        assert_eq!(date_diff(mid), "Expires in 549 days (2 years)");
    }

    #[test]
    fn json_document_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let targets = vec!["example.com:443".to_string()];
        write_json_file(&path, &targets, Utc::now(), Duration::from_millis(1500), &[])
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(doc["generator"].as_str().unwrap().starts_with("trustscan "));
        assert_eq!(doc["targets"][0], "example.com:443");
        assert!(doc["execution_date"].is_string());
        assert!((doc["execution_duration_seconds"].as_f64().unwrap() - 1.5).abs() < 0.01);
        assert!(doc["evaluations"].as_array().unwrap().is_empty());
    }
}
