mod cmd;
mod core;
mod rules;
mod tax;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "kcgt", version, about = "Korean Capital Gains Tax Calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate the return for a filing case
    Calculate(cmd::calculate::CalculateCommand),
    /// Per-asset detail: cost basis, holding period and rates
    Assets(cmd::assets::AssetsCommand),
    /// Print the audit log of a calculation
    Log(cmd::log::LogCommand),
    /// Check a filing case for input issues
    Validate(cmd::validate::ValidateCommand),
    /// Print expected input formats
    Schema(cmd::schema::SchemaCommand),
    /// Print built-in rule packs
    Rules(cmd::rules::RulesCommand),
    /// Filing due dates for a transfer
    Deadline(cmd::deadline::DeadlineCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Calculate(c) => c.exec(),
        Command::Assets(c) => c.exec(),
        Command::Log(c) => c.exec(),
        Command::Validate(c) => c.exec(),
        Command::Schema(c) => c.exec(),
        Command::Rules(c) => c.exec(),
        Command::Deadline(c) => c.exec(),
    }
}
