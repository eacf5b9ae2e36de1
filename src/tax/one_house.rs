//! Primary-residence (one household, one house) exemption eligibility.

use crate::core::case::{
    HoldingExemptReason, RealEstateAsset, ResidenceExemptReason, TemporaryExemptReason,
};
use crate::core::money::Won;
use crate::core::warnings::Warning;
use crate::tax::holding::{self, HoldingPurpose};
use serde::Serialize;

const MIN_HOLDING_YEARS: u32 = 2;
const MIN_RESIDENCE_YEARS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OneHouseVerdict {
    pub eligible: bool,
    pub holding_years: u32,
    pub residence_years: u32,
    pub holding_met: bool,
    /// Residence only counts for houses acquired inside an adjusted area.
    pub residence_required: bool,
    pub residence_met: bool,
    pub temporary_exempt_reason: TemporaryExemptReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ineligible_reason: Option<String>,
}

impl OneHouseVerdict {
    fn ineligible(reason: &str) -> Self {
        OneHouseVerdict {
            eligible: false,
            holding_years: 0,
            residence_years: 0,
            holding_met: false,
            residence_required: false,
            residence_met: false,
            temporary_exempt_reason: TemporaryExemptReason::None,
            ineligible_reason: Some(reason.to_string()),
        }
    }
}

/// Check the exemption requirements. Shortfalls are reported as warnings and
/// never change any amount.
pub fn evaluate(
    asset: &RealEstateAsset,
    high_value_threshold: Won,
    warnings: &mut Vec<Warning>,
) -> OneHouseVerdict {
    let blocker = if !asset.is_housing() {
        Some("not a housing asset")
    } else if asset.user_flags.unregistered {
        Some("unregistered transfer")
    } else {
        None
    };
    if let Some(reason) = blocker {
        warnings.push(Warning::OneHouseIneligibleAsset {
            asset_id: asset.id.clone(),
            reason: reason.to_string(),
        });
        return OneHouseVerdict::ineligible(reason);
    }

    let detail = asset.one_house_detail();
    let holding_years = match detail {
        Some(d) => d.actual_holding_years + d.inherited_holding_years,
        None => {
            holding::resolve(asset, HoldingPurpose::OneHouseExemption, high_value_threshold).years
        }
    };
    let residence_years = match detail {
        Some(d) => d.actual_residence_years + d.inherited_residence_years,
        None => asset.total_residence_years(),
    };

    let holding_reason = detail.map_or(HoldingExemptReason::None, |d| d.holding_exempt_reason);
    let residence_reason =
        detail.map_or(ResidenceExemptReason::None, |d| d.residence_exempt_reason);

    let holding_met =
        holding_reason != HoldingExemptReason::None || holding_years >= MIN_HOLDING_YEARS;
    let residence_required = match asset.adjusted_area() {
        Some(area) => area.acquired_in_adjusted_area,
        None => asset.user_flags.adjusted_area,
    };
    let residence_met = !residence_required
        || residence_reason != ResidenceExemptReason::None
        || residence_years >= MIN_RESIDENCE_YEARS;

    if !holding_met {
        warnings.push(Warning::HoldingShortfall {
            asset_id: asset.id.clone(),
            years: holding_years,
        });
    }
    if !residence_met {
        warnings.push(Warning::ResidenceShortfall {
            asset_id: asset.id.clone(),
            years: residence_years,
        });
    }

    let verdict = OneHouseVerdict {
        eligible: holding_met && residence_met,
        holding_years,
        residence_years,
        holding_met,
        residence_required,
        residence_met,
        temporary_exempt_reason: detail
            .map_or(TemporaryExemptReason::None, |d| d.temporary_exempt_reason),
        ineligible_reason: None,
    };
    log::debug!("one-house verdict for {}: {:?}", asset.id, verdict);
    verdict
}
