//! Schema command - print expected input formats

use crate::core::case::{DerivativeRow, TaxCase};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the filing case
    JsonSchema,
    /// CSV header row for derivative schedule rows
    DerivativeCsvHeader,
    /// Derivative CSV column descriptions
    DerivativeCsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::DerivativeCsvHeader => self.print_csv_header(),
            SchemaFormat::DerivativeCsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(TaxCase);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        let columns: Vec<&str> = DerivativeRow::form_fields().iter().map(|f| f.name).collect();
        println!("{}", columns.join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("Derivative Schedule CSV Format");
        println!("==============================");
        println!();
        for field in DerivativeRow::form_fields() {
            let req = if field.required { "required" } else { "optional" };
            println!(
                "{:24} {:4} ({:8})  {}",
                field.name, field.line, req, field.description
            );
        }
        println!();
        println!("rateCode is 80 (5% transitional) or 81 (10%)");
        Ok(())
    }
}
