//! Output formatting for the cleanup report
//!
//! The report goes to stdout; log lines go to stderr.

use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::cleanup::CleanupReport;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }
}

/// What happened to one candidate node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeOutcome {
    Deleted,
    Failed,
    WouldDelete,
}

impl std::fmt::Display for NodeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeOutcome::Deleted => write!(f, "deleted"),
            NodeOutcome::Failed => write!(f, "failed"),
            NodeOutcome::WouldDelete => write!(f, "would delete"),
        }
    }
}

/// Report row for a candidate node
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct NodeRow {
    #[tabled(rename = "NODE")]
    pub node: String,
    #[tabled(rename = "OUTCOME")]
    pub outcome: NodeOutcome,
    #[tabled(rename = "DETAIL")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

/// Machine-readable report
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub dry_run: bool,
    pub success: bool,
    pub nodes: Vec<NodeRow>,
}

/// One row per candidate, in candidate order
pub fn report_rows(report: &CleanupReport) -> Vec<NodeRow> {
    report
        .candidates
        .iter()
        .filter_map(|name| {
            if report.dry_run {
                return Some(NodeRow {
                    node: name.clone(),
                    outcome: NodeOutcome::WouldDelete,
                    detail: String::new(),
                });
            }

            if report.deleted.contains(name) {
                return Some(NodeRow {
                    node: name.clone(),
                    outcome: NodeOutcome::Deleted,
                    detail: String::new(),
                });
            }

            report
                .failed
                .iter()
                .find(|(failed, _)| failed == name)
                .map(|(_, error)| NodeRow {
                    node: name.clone(),
                    outcome: NodeOutcome::Failed,
                    detail: error.to_string(),
                })
        })
        .collect()
}

pub fn summarize(report: &CleanupReport) -> ReportSummary {
    ReportSummary {
        dry_run: report.dry_run,
        success: report.is_success(),
        nodes: report_rows(report),
    }
}

/// Render the report in the specified format
pub fn render_report(report: &CleanupReport, format: OutputFormat) -> anyhow::Result<String> {
    let rendered = match format {
        OutputFormat::Table => render_table(report),
        OutputFormat::Json => serde_json::to_string_pretty(&summarize(report))?,
        OutputFormat::Yaml => serde_yaml::to_string(&summarize(report))?,
    };
    Ok(rendered)
}

fn render_table(report: &CleanupReport) -> String {
    let rows = report_rows(report);
    if rows.is_empty() {
        return format!("{}", "No NotReady nodes found".green());
    }

    let summary = if report.dry_run {
        format!("Dry run: {} node(s) would be deleted", rows.len())
            .yellow()
            .to_string()
    } else if report.is_success() {
        format!("{} Deleted {} node(s)", "✓".green().bold(), report.deleted.len())
    } else {
        format!(
            "{} Deleted {} node(s), {} failed",
            "✗".red().bold(),
            report.deleted.len(),
            report.failed.len()
        )
        .red()
        .to_string()
    };

    format!("{}\n{}", Table::new(rows), summary)
}

/// Print the report to stdout
pub fn print_report(report: &CleanupReport, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_report(report, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::K8sError;

    fn mixed_report() -> CleanupReport {
        CleanupReport {
            dry_run: false,
            candidates: vec!["n1".to_string(), "n2".to_string()],
            deleted: vec!["n1".to_string()],
            failed: vec![(
                "n2".to_string(),
                K8sError::Forbidden("nodes \"n2\" is forbidden".to_string()),
            )],
        }
    }

    #[test]
    fn test_output_format_from_name() {
        assert_eq!(OutputFormat::from_name("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_name("yml"), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::from_name("table"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_name("xml"), None);
    }

    #[test]
    fn test_rows_for_mixed_outcome() {
        let rows = report_rows(&mixed_report());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].outcome, NodeOutcome::Deleted);
        assert_eq!(rows[1].outcome, NodeOutcome::Failed);
        assert!(rows[1].detail.contains("forbidden"));
    }

    #[test]
    fn test_rows_for_dry_run() {
        let report = CleanupReport {
            dry_run: true,
            candidates: vec!["n1".to_string()],
            ..Default::default()
        };
        let rows = report_rows(&report);
        assert_eq!(rows[0].outcome, NodeOutcome::WouldDelete);
        assert_eq!(rows[0].outcome.to_string(), "would delete");
    }

    #[test]
    fn test_json_report() {
        let json = render_report(&mixed_report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["nodes"][0]["node"], "n1");
        assert_eq!(value["nodes"][0]["outcome"], "deleted");
        assert!(value["nodes"][0].get("detail").is_none());
        assert_eq!(value["nodes"][1]["outcome"], "failed");
    }

    #[test]
    fn test_yaml_report() {
        let yaml = render_report(&mixed_report(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("dry_run: false"));
        assert!(yaml.contains("outcome: failed"));
    }

    #[test]
    fn test_table_report_lists_nodes() {
        let table = render_report(&mixed_report(), OutputFormat::Table).unwrap();
        assert!(table.contains("NODE"));
        assert!(table.contains("n1"));
        assert!(table.contains("n2"));
    }

    #[test]
    fn test_table_report_empty() {
        let table = render_report(&CleanupReport::default(), OutputFormat::Table).unwrap();
        assert!(table.contains("No NotReady nodes found"));
    }
}
