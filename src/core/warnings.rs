use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Soft rule violations. They are reported next to the result and never
/// change a computed amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    DuplicateAssetId {
        asset_id: String,
    },
    AcquiredAfterTransfer {
        asset_id: String,
    },
    InheritanceDateMissing {
        asset_id: String,
    },
    GiftDateMissing {
        asset_id: String,
    },
    GiftAfterTransfer {
        asset_id: String,
    },
    DebtExceedsAssessedValue {
        asset_id: String,
    },
    OriginalAcquisitionAfterAcquireDate {
        asset_id: String,
    },
    UnknownReliefAsset {
        relief_id: String,
        asset_id: String,
    },
    /// One-house exemption asserted on an asset that cannot qualify.
    OneHouseIneligibleAsset {
        asset_id: String,
        reason: String,
    },
    HoldingShortfall {
        asset_id: String,
        years: u32,
    },
    ResidenceShortfall {
        asset_id: String,
        years: u32,
    },
    /// Rate code not in the rule pack, taxed progressively.
    UnknownRateCode {
        asset_id: String,
        code: String,
    },
    RateCodeSubstituted {
        asset_id: String,
        from: String,
        to: String,
        band: String,
    },
    /// Declared rate code differs from the one implied by the asset facts.
    RateCodeMismatch {
        asset_id: String,
        declared: String,
        suggested: String,
    },
    RulePackFallback {
        requested: i32,
        served: i32,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DuplicateAssetId { asset_id } => {
                write!(f, "asset id {} is used more than once", asset_id)
            }
            Warning::AcquiredAfterTransfer { asset_id } => {
                write!(f, "asset {}: acquisition date is after transfer date", asset_id)
            }
            Warning::InheritanceDateMissing { asset_id } => write!(
                f,
                "asset {}: inheritance facts enabled without an inheritance date",
                asset_id
            ),
            Warning::GiftDateMissing { asset_id } => write!(
                f,
                "asset {}: carryover taxation enabled without a gift date, not applied",
                asset_id
            ),
            Warning::GiftAfterTransfer { asset_id } => {
                write!(f, "asset {}: gift date is after transfer date", asset_id)
            }
            Warning::DebtExceedsAssessedValue { asset_id } => write!(
                f,
                "asset {}: assumed debt exceeds the assessed gift value",
                asset_id
            ),
            Warning::OriginalAcquisitionAfterAcquireDate { asset_id } => write!(
                f,
                "asset {}: originating acquisition is dated after the acquisition",
                asset_id
            ),
            Warning::UnknownReliefAsset {
                relief_id,
                asset_id,
            } => write!(
                f,
                "relief {} refers to unknown asset {}",
                relief_id, asset_id
            ),
            Warning::OneHouseIneligibleAsset { asset_id, reason } => write!(
                f,
                "asset {}: one-house exemption cannot apply ({})",
                asset_id, reason
            ),
            Warning::HoldingShortfall { asset_id, years } => write!(
                f,
                "asset {}: one-house holding requirement not met ({} years, no exemption reason)",
                asset_id, years
            ),
            Warning::ResidenceShortfall { asset_id, years } => write!(
                f,
                "asset {}: one-house residence requirement not met ({} years, no exemption reason)",
                asset_id, years
            ),
            Warning::UnknownRateCode { asset_id, code } => write!(
                f,
                "asset {}: rate code {} is not in the rule pack, progressive rates used",
                asset_id, code
            ),
            Warning::RateCodeSubstituted {
                asset_id,
                from,
                to,
                band,
            } => write!(
                f,
                "asset {}: rate code {} replaced by {} (held {})",
                asset_id, from, to, band
            ),
            Warning::RateCodeMismatch {
                asset_id,
                declared,
                suggested,
            } => write!(
                f,
                "asset {}: declared rate code {} but facts suggest {}",
                asset_id, declared, suggested
            ),
            Warning::RulePackFallback { requested, served } => write!(
                f,
                "no rules for tax year {}, computed with {} rules",
                requested, served
            ),
        }
    }
}
