//! Output formatting for the CLI.

use ownreview_assigner::CheckReport;
use ownreview_domain::OwnerDeclaration;

use crate::cli::CliFormat;
use crate::error::Result;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human readable text
    Text,
    /// JSON
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => OutputFormat::Text,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format a check report together with the final reviewer list.
    pub fn format_report(&self, report: &CheckReport, reviewers: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "report": serde_json::to_value(report)?,
                    "reviewers": reviewers,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Text => {
                let mut out = report.summary();
                out.push_str("\n\nProposal reviewers: ");
                if reviewers.is_empty() {
                    out.push_str("(none)");
                } else {
                    out.push_str(&reviewers.join(", "));
                }
                Ok(out)
            }
        }
    }

    /// Format declared owners per path.
    pub fn format_owners(&self, owners: &[(String, Vec<OwnerDeclaration>)]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = owners
                    .iter()
                    .map(|(path, decls)| {
                        let tokens: Vec<&str> = decls.iter().map(|d| d.as_str()).collect();
                        (path.clone(), serde_json::json!(tokens))
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&map)?)
            }
            OutputFormat::Text => Ok(owners
                .iter()
                .map(|(path, decls)| {
                    if decls.is_empty() {
                        format!("{}: (no owners)", path)
                    } else {
                        let tokens: Vec<&str> = decls.iter().map(|d| d.as_str()).collect();
                        format!("{}: {}", path, tokens.join(" "))
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }
}
