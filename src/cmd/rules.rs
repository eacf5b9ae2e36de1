//! Rules command - print a built-in rule pack as JSON

use crate::rules::{BuiltinRulePacks, RulePackProvider};
use clap::Args;

#[derive(Args, Debug)]
pub struct RulesCommand {
    /// Tax year (defaults to the latest built-in year)
    #[arg(short, long)]
    year: Option<i32>,

    /// List the tax years with built-in rules
    #[arg(long)]
    list: bool,
}

impl RulesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let packs = BuiltinRulePacks::new();
        if self.list {
            for year in packs.years() {
                println!("{}", year);
            }
            return Ok(());
        }

        let year = match self.year.or_else(|| packs.latest_year()) {
            Some(year) => year,
            None => anyhow::bail!("no built-in rule packs"),
        };
        let pack = packs.rule_pack(year)?;
        println!("{}", serde_json::to_string_pretty(pack)?);
        Ok(())
    }
}
