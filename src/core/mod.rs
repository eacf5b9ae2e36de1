pub mod case;
pub mod dates;
pub mod error;
pub mod log;
pub mod money;
pub mod result;
pub mod warnings;

// Flat public surface for the types every layer touches.
pub use case::TaxCase;
pub use error::{ComputationError, EngineError};
pub use log::CalculationLog;
pub use money::{format_won, round_to_won, Won};
pub use result::{AssetResult, CalculationResult};
pub use warnings::Warning;
