pub mod acquisition;
pub mod compute;
pub mod deadline;
pub mod deduction;
pub mod derivatives;
pub mod engine;
pub mod holding;
pub mod lt_deduction;
pub mod one_house;
pub mod penalty;
pub mod rates;
pub mod real_estate;
pub mod relief;
pub mod rural;
pub mod securities;

#[cfg(test)]
mod fixtures;

pub use engine::{calculate, calculate_at};
pub use holding::{HoldingPeriod, HoldingPurpose};
