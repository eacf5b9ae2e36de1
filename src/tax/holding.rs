//! Holding-period start dates. The start depends on why the period is asked
//! for: inheritance and carryover gifts move it differently per purpose.

use crate::core::case::{CarryoverExclusion, RealEstateAsset};
use crate::core::dates::{holding_months, holding_years, ShortTermBand};
use crate::core::money::Won;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldingPurpose {
    LongTermDeduction,
    RateApplication,
    OneHouseExemption,
}

/// Which date the period is counted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StartBasis {
    Acquisition,
    InheritanceDate,
    DecedentAcquisition,
    DonorAcquisition,
}

impl fmt::Display for StartBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartBasis::Acquisition => write!(f, "from acquisition"),
            StartBasis::InheritanceDate => write!(f, "from inheritance date"),
            StartBasis::DecedentAcquisition => write!(f, "from decedent's acquisition"),
            StartBasis::DonorAcquisition => write!(f, "from donor's acquisition"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingPeriod {
    pub start: NaiveDate,
    pub basis: StartBasis,
    pub years: u32,
    pub months: u32,
}

impl HoldingPeriod {
    fn new(start: NaiveDate, basis: StartBasis, end: NaiveDate) -> Self {
        HoldingPeriod {
            start,
            basis,
            years: holding_years(start, end),
            months: holding_months(start, end),
        }
    }

    pub fn band(&self) -> ShortTermBand {
        ShortTermBand::from_months(self.months)
    }
}

/// Resolve the holding period of `asset` for `purpose`, counted to the
/// transfer date.
pub fn resolve(
    asset: &RealEstateAsset,
    purpose: HoldingPurpose,
    high_value_threshold: Won,
) -> HoldingPeriod {
    let mut start = (asset.acquire_date, StartBasis::Acquisition);

    if let Some(inheritance) = asset.inheritance() {
        let inherited = inheritance
            .inheritance_date
            .map(|d| (d, StartBasis::InheritanceDate));
        let decedent = inheritance
            .decedent_acquire_date
            .map(|d| (d, StartBasis::DecedentAcquisition));

        let chosen = match purpose {
            HoldingPurpose::LongTermDeduction if inheritance.business_succession => {
                decedent.or(inherited)
            }
            HoldingPurpose::LongTermDeduction => inherited,
            HoldingPurpose::RateApplication => decedent.or(inherited),
            HoldingPurpose::OneHouseExemption if inheritance.same_household => {
                decedent.or(inherited)
            }
            HoldingPurpose::OneHouseExemption => inherited,
        };
        if let Some(chosen) = chosen {
            start = chosen;
        }
    }

    if purpose == HoldingPurpose::LongTermDeduction {
        let donor_date = asset
            .carryover()
            .filter(|c| c.exclusion_reason == CarryoverExclusion::None)
            .filter(|_| !asset.exempt_low_value_house(high_value_threshold))
            .and_then(|c| c.donor_acquire_date);
        if let Some(date) = donor_date {
            start = (date, StartBasis::DonorAcquisition);
        }
    }

    HoldingPeriod::new(start.0, start.1, asset.transfer_date)
}
