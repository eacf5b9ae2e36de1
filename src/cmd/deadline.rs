//! Deadline command - filing due dates for a transfer

use crate::tax::deadline::{self, FilingKind};
use chrono::NaiveDate;
use clap::Args;

#[derive(Args, Debug)]
pub struct DeadlineCommand {
    /// Transfer date (YYYY-MM-DD)
    #[arg(short, long)]
    transfer_date: NaiveDate,

    /// Kind of asset transferred
    #[arg(short, long, value_enum, default_value_t = FilingKind::RealEstate)]
    kind: FilingKind,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl DeadlineCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let Some(deadlines) = deadline::deadlines(self.kind, self.transfer_date) else {
            anyhow::bail!("no due date for transfer on {}", self.transfer_date);
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&deadlines)?);
        } else {
            println!("Transfer date:      {}", deadlines.transfer_date);
            println!("Preliminary return: {}", deadlines.preliminary);
            println!("Final return:       {}", deadlines.final_return);
        }
        Ok(())
    }
}
