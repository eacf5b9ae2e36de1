//! Calculate command - run the engine and print the return

use crate::cmd::CaseInput;
use crate::core::money::format_won;
use crate::core::result::{AssetResult, CalculationResult, MainResult};
use clap::Args;
use std::io;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalculateCommand {
    #[command(flatten)]
    input: CaseInput,

    /// Output the full result as JSON
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output per-asset rows as CSV
    #[arg(long)]
    csv: bool,
}

impl CalculateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let result = self.input.calculate()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        } else if self.csv {
            write_csv(&result.asset_results)
        } else {
            print_result(&result);
            Ok(())
        }
    }
}

/// Row for the per-asset table and CSV output
#[derive(Debug, Clone, Tabled, serde::Serialize)]
pub struct AssetRow {
    #[tabled(rename = "Asset")]
    asset_id: String,

    #[tabled(rename = "Kind")]
    kind: String,

    #[tabled(rename = "Rate")]
    rate_code: String,

    #[tabled(rename = "Transfer")]
    transfer_price: String,

    #[tabled(rename = "Acquire")]
    acquire_price: String,

    #[tabled(rename = "Expense")]
    necessary_expense: String,

    #[tabled(rename = "Gain")]
    transfer_gain: String,

    #[tabled(rename = "LT Ded.")]
    lt_deduction: String,

    #[tabled(rename = "Gain Income")]
    gain_income: String,

    #[tabled(rename = "Basic Ded.")]
    basic_deduction: String,

    #[tabled(rename = "Tax Base")]
    tax_base: String,

    #[tabled(rename = "Tax (B)")]
    asset_tax: String,
}

impl From<&AssetResult> for AssetRow {
    fn from(r: &AssetResult) -> Self {
        AssetRow {
            asset_id: r.asset_id.clone(),
            kind: r.kind.to_string(),
            rate_code: r.rate.rate_code.clone(),
            transfer_price: r.transfer_price.to_string(),
            acquire_price: r.acquire_price.to_string(),
            necessary_expense: r.necessary_expense.to_string(),
            transfer_gain: r.transfer_gain_total.to_string(),
            lt_deduction: r.taxable_lt_deduction.to_string(),
            gain_income: r.gain_income.to_string(),
            basic_deduction: r.basic_deduction.to_string(),
            tax_base: r.tax_base.to_string(),
            asset_tax: r.asset_tax.to_string(),
        }
    }
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "Line")]
    line: &'static str,
    #[tabled(rename = "Item")]
    item: &'static str,
    #[tabled(rename = "Amount")]
    amount: String,
}

fn line(line: &'static str, item: &'static str, amount: String) -> LineRow {
    LineRow { line, item, amount }
}

fn form_lines(main: &MainResult) -> Vec<LineRow> {
    vec![
        line("④", "Gain income total", format_won(main.gain_income_total)),
        line("⑤", "Previously reported gain income", format_won(main.prev_reported_gain_income)),
        line("⑥", "Income relief", format_won(main.income_deduction_base)),
        line("⑦", "Basic deduction", format_won(main.basic_deduction)),
        line("⑧", "Tax base", format_won(main.tax_base)),
        line("⑨", "Rate", main.rate_label.clone()),
        line("", "Method A (progressive)", format_won(main.tax_a)),
        line("", "Method B (per asset)", format_won(main.tax_b)),
        line("⑩", "Calculated tax", format_won(main.tax_before_credits)),
        line("⑪", "Tax relief", format_won(main.tax_relief)),
        line("⑫", "Foreign tax credit", format_won(main.foreign_tax_credit)),
        line("⑬", "Withholding credit", format_won(main.withholding_credit)),
        line("⑭", "Pension credit", format_won(main.pension_credit)),
        line("⑮", "E-filing credit", format_won(main.e_filing_credit)),
        line("⑯", "Penalty", format_won(main.penalty.total)),
        line("⑰", "Previously paid", format_won(main.prev_tax_paid)),
        line("⑱", "Tax due", format_won(main.tax_due)),
        line("", "Rural special tax", format_won(main.rural_special_tax.tax_amount)),
        line("", "Total due", format_won(main.total_tax_due)),
    ]
}

fn print_result(result: &CalculationResult) {
    println!();
    println!(
        "CAPITAL GAINS TAX RETURN {} (case {}, {} rules)",
        result.tax_year, result.case_id, result.rule_pack_year
    );
    println!();

    let table = Table::new(form_lines(&result.main_result))
        .with(Style::rounded())
        .with(Modify::new(Columns::last()).with(Alignment::right()))
        .to_string();
    println!("{}", table);

    if !result.asset_results.is_empty() {
        println!();
        println!("ASSETS");
        println!();
        let rows: Vec<AssetRow> = result.asset_results.iter().map(AssetRow::from).collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }

    print_messages("WARNINGS", &result.warnings);
    print_messages("ERRORS", &result.errors);
}

fn print_messages(title: &str, messages: &[String]) {
    if messages.is_empty() {
        return;
    }
    println!();
    println!("{} ({})", title, messages.len());
    for m in messages {
        println!("  \u{26A0} {}", m);
    }
}

fn write_csv(results: &[AssetResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for r in results {
        wtr.serialize(AssetRow::from(r))?;
    }
    wtr.flush()?;
    Ok(())
}
