//! Validate command - surface input issues without running the calculation

use crate::cmd::CaseInput;
use crate::core::warnings::Warning;
use crate::tax::rates;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    #[command(flatten)]
    input: CaseInput,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(flatten)]
    warning: Warning,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput<'a> {
    case_id: &'a str,
    tax_year: i32,
    issue_count: usize,
    issues: &'a [ValidationIssue],
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let case = self.input.load()?;
        let pack = self
            .input
            .with_provider(|provider| Ok(provider.rule_pack(case.tax_year)?.clone()))?;

        let issues: Vec<ValidationIssue> = case
            .validate()
            .into_iter()
            .chain(rates::rate_code_mismatches(&case, &pack))
            .map(|warning| ValidationIssue {
                message: warning.to_string(),
                warning,
            })
            .collect();

        if self.json {
            let output = ValidationOutput {
                case_id: &case.id,
                tax_year: case.tax_year,
                issue_count: issues.len(),
                issues: &issues,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&case.id, &issues)?;
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(case_id: &str, issues: &[ValidationIssue]) -> anyhow::Result<()> {
    println!();
    println!("VALIDATION RESULTS ({})", case_id);
    println!();

    if issues.is_empty() {
        println!("\u{2713} No issues found.");
        return Ok(());
    }

    println!("\u{26A0} {} issue(s) found:", issues.len());
    println!();
    for (i, issue) in issues.iter().enumerate() {
        let kind = serde_json::to_value(&issue.warning)?;
        let kind = kind.get("type").and_then(|t| t.as_str()).unwrap_or("Warning");
        println!("  {}. [{}] {}", i + 1, kind, issue.message);
    }
    println!();
    Ok(())
}
