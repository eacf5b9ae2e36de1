//! Log command - print the audit trail of a calculation

use crate::cmd::CaseInput;
use clap::Args;

#[derive(Args, Debug)]
pub struct LogCommand {
    #[command(flatten)]
    input: CaseInput,

    /// Only steps whose identifier starts with this prefix (e.g. CALC-RET)
    #[arg(short, long)]
    step: Option<String>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl LogCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let result = self.input.calculate()?;
        let entries: Vec<_> = result
            .calculation_log
            .iter()
            .filter(|e| self.step.as_deref().map_or(true, |p| e.step.starts_with(p)))
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        for entry in entries {
            println!("{:<24} {}", entry.step, entry.description);
            for (key, value) in &entry.values {
                println!("    {:<24} {}", key, value);
            }
        }
        Ok(())
    }
}
