pub mod assets;
pub mod calculate;
pub mod deadline;
pub mod log;
pub mod rules;
pub mod schema;
pub mod validate;

use crate::core::case::{DerivativeRow, DerivativeSet, TaxCase};
use crate::core::result::CalculationResult;
use crate::rules::{BuiltinRulePacks, FallbackToLatest, FileRulePack, RulePackProvider};
use crate::tax;
use anyhow::Context;
use clap::Args;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Case input shared by the commands that run the engine.
#[derive(Args, Debug)]
pub struct CaseInput {
    /// JSON file containing the filing case ("-" for stdin)
    #[arg(short, long)]
    case: PathBuf,

    /// CSV file with derivative schedule rows, appended to the case
    #[arg(short, long)]
    derivatives: Option<PathBuf>,

    /// JSON rule pack to use instead of the built-in rules
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Compute with the latest rules when the tax year has none
    #[arg(long)]
    allow_year_fallback: bool,
}

impl CaseInput {
    pub fn load(&self) -> anyhow::Result<TaxCase> {
        let mut case = read_case(&self.case)?;
        if let Some(path) = &self.derivatives {
            let rows = read_derivative_rows(path)?;
            case.derivatives
                .get_or_insert_with(DerivativeSet::default)
                .rows
                .extend(rows);
        }
        Ok(case)
    }

    /// Run `f` with the rule pack provider selected by the options.
    pub fn with_provider<T>(
        &self,
        f: impl FnOnce(&dyn RulePackProvider) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let builtin;
        let file;
        let base: &dyn RulePackProvider = match &self.rules {
            Some(path) => {
                file = FileRulePack::load(path)?;
                &file
            }
            None => {
                builtin = BuiltinRulePacks::new();
                &builtin
            }
        };
        if self.allow_year_fallback {
            f(&FallbackToLatest(base))
        } else {
            f(base)
        }
    }

    pub fn calculate(&self) -> anyhow::Result<CalculationResult> {
        let case = self.load()?;
        self.with_provider(|provider| Ok(tax::calculate(&case, provider)?))
    }
}

/// Read a filing case (JSON) from a file, or stdin with "-"
pub fn read_case(path: &Path) -> anyhow::Result<TaxCase> {
    if path.as_os_str() == "-" {
        read_case_from_stdin()
    } else {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        TaxCase::from_json(BufReader::new(file))
            .with_context(|| format!("parsing case {}", path.display()))
    }
}

fn read_case_from_stdin() -> anyhow::Result<TaxCase> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    Ok(TaxCase::from_json(io::Cursor::new(buffer))?)
}

/// Read derivative schedule rows from CSV; the header uses the JSON field names.
pub fn read_derivative_rows(path: &Path) -> anyhow::Result<Vec<DerivativeRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut rows = Vec::new();
    for (i, record) in reader.deserialize().enumerate() {
        let row: DerivativeRow =
            record.with_context(|| format!("{}: row {}", path.display(), i + 1))?;
        rows.push(row);
    }
    Ok(rows)
}
