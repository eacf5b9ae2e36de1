//! Basic deduction: a small annual allowance per asset bucket, capped again
//! across all buckets, handed out in transfer-date order.

use crate::core::case::{AssetType, Security};
use crate::core::log::CalculationLog;
use crate::core::money::Won;
use crate::core::result::{AssetResult, DeductionBucket};
use crate::rules::BasicDeductionLimits;
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::BTreeMap;

pub fn real_estate_bucket(asset_type: AssetType) -> DeductionBucket {
    match asset_type {
        AssetType::SpecificStock | AssetType::RealEstateRichStock => DeductionBucket::Stock,
        AssetType::Goodwill
        | AssetType::FacilityUseRight
        | AssetType::RelocationRight
        | AssetType::TrustBeneficialRight => DeductionBucket::Other,
        AssetType::Land
        | AssetType::Housing
        | AssetType::GeneralBuilding
        | AssetType::OtherBuilding
        | AssetType::SurfaceRight
        | AssetType::LeaseholdRight
        | AssetType::RegisteredLease
        | AssetType::RightToAcquire
        | AssetType::MembershipRight
        | AssetType::PreSaleRight => DeductionBucket::Domestic,
    }
}

pub fn security_bucket(security: &Security) -> DeductionBucket {
    if security.is_foreign() {
        DeductionBucket::Foreign
    } else {
        DeductionBucket::Stock
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Every bucket, zero when nothing was allocated.
    pub by_bucket: BTreeMap<DeductionBucket, Won>,
    pub total: Won,
}

/// Allocate the deduction into `results`, setting each asset's
/// `basic_deduction` and `tax_base`. Unregistered assets get nothing.
pub fn allocate(
    results: &mut [AssetResult],
    limits: &BasicDeductionLimits,
    log: &mut CalculationLog,
) -> Allocation {
    for r in results.iter_mut() {
        r.basic_deduction = Decimal::ZERO;
        r.tax_base = r.gain_income;
    }

    let mut by_bucket = BTreeMap::new();
    let mut total = Decimal::ZERO;

    for bucket in DeductionBucket::ALL {
        let mut members: Vec<usize> = results
            .iter()
            .enumerate()
            .filter(|(_, r)| r.deduction_bucket == bucket && !r.unregistered)
            .map(|(i, _)| i)
            .collect();
        members.sort_by_key(|&i| {
            let r = &results[i];
            (r.transfer_date, r.kind, r.input_index)
        });

        let mut bucket_remaining = limits.per_bucket;
        let mut bucket_total = Decimal::ZERO;
        for i in members {
            if bucket_remaining <= Decimal::ZERO || total >= limits.annual_total {
                break;
            }
            let available = bucket_remaining.min(limits.annual_total - total);
            let r = &mut results[i];
            let allocated = r.gain_income.min(available).max(Decimal::ZERO);
            r.basic_deduction = allocated;
            r.tax_base = (r.gain_income - allocated).max(Decimal::ZERO);

            bucket_remaining -= allocated;
            bucket_total += allocated;
            total += allocated;
        }
        by_bucket.insert(bucket, bucket_total);
    }

    let mut values: Vec<(String, serde_json::Value)> = by_bucket
        .iter()
        .map(|(bucket, amount)| (format!("{:?}", bucket).to_uppercase(), json!(amount)))
        .collect();
    values.push(("total".to_string(), json!(total)));
    log.record("CALC-DED-001", "basic deduction by bucket", values);

    Allocation { by_bucket, total }
}
