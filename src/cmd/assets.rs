//! Assets command - per-asset detail: cost provenance, holding and rates

use crate::cmd::CaseInput;
use crate::core::result::AssetResult;
use crate::rules::RateKind;
use clap::Args;
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct AssetsCommand {
    #[command(flatten)]
    input: CaseInput,

    /// Show only this asset
    #[arg(short, long)]
    asset: Option<String>,
}

impl AssetsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let result = self.input.calculate()?;
        let selected = select(&result.asset_results, self.asset.as_deref());

        if selected.is_empty() {
            println!("No assets found matching filters");
            return Ok(());
        }

        let rows = selected.iter().map(|r| DetailRow::from(*r));
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
            .to_string();
        println!("{}", table);

        for line in cost_step_lines(&selected) {
            println!("{}", line);
        }
        Ok(())
    }
}

fn select<'a>(results: &'a [AssetResult], asset: Option<&str>) -> Vec<&'a AssetResult> {
    results
        .iter()
        .filter(|r| asset.map_or(true, |id| r.asset_id == id))
        .collect()
}

/// Cost-basis overrides after the stated price, one line per stage.
fn cost_step_lines(selected: &[&AssetResult]) -> Vec<String> {
    selected
        .iter()
        .flat_map(|r| {
            r.cost_basis
                .iter()
                .skip(1)
                .map(move |step| format!("  {}: {} → {}", r.asset_id, step.label, step.acquire_price))
        })
        .collect()
}

#[derive(Debug, Tabled)]
struct DetailRow {
    #[tabled(rename = "Asset")]
    asset_id: String,
    #[tabled(rename = "Type")]
    asset_type: String,
    #[tabled(rename = "Cost Basis")]
    cost_source: String,
    #[tabled(rename = "Held")]
    holding: String,
    #[tabled(rename = "Resided")]
    residence: String,
    #[tabled(rename = "High-Value Ratio")]
    high_value_ratio: String,
    #[tabled(rename = "LT Rate")]
    lt_rate: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Bucket")]
    bucket: String,
    #[tabled(rename = "One House")]
    one_house: String,
}

impl From<&AssetResult> for DetailRow {
    fn from(r: &AssetResult) -> Self {
        let holding = r.holding.map_or("-".to_string(), |h| {
            format!("{}y {}m ({:?})", h.years, h.months % 12, h.basis)
        });
        let rate = match (r.rate.rate_type, r.rate.rate_value) {
            (RateKind::Flat, Some(v)) => format!("{} {}%", r.rate.rate_code, v.normalize()),
            _ => format!("{} progressive", r.rate.rate_code),
        };
        let rate = if r.rate.additional_rate > Decimal::ZERO {
            format!("{} +{}%p", rate, r.rate.additional_rate.normalize())
        } else {
            rate
        };
        let one_house = match &r.one_house {
            None => "-".to_string(),
            Some(v) if v.eligible => "eligible".to_string(),
            Some(v) => v
                .ineligible_reason
                .clone()
                .unwrap_or_else(|| "requirements not met".to_string()),
        };
        DetailRow {
            asset_id: r.asset_id.clone(),
            asset_type: r
                .asset_type_code
                .clone()
                .map_or(r.kind.to_string(), |code| format!("{} {}", r.kind, code)),
            cost_source: r
                .cost_basis
                .last()
                .map_or("-".to_string(), |s| s.label.clone()),
            holding,
            residence: r.residence_years.to_string(),
            high_value_ratio: r.high_value_ratio.normalize().to_string(),
            lt_rate: format!("{}%", r.lt_deduction_rate.normalize()),
            rate,
            bucket: r.deduction_bucket.to_string(),
            one_house,
        }
    }
}
