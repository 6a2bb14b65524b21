use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Derived fee figures for a whole document.
///
/// Invariant: `total = service_fee + govt_fee = per_person_total *
/// beneficiary_count` exactly. Per-service fees are summed once into the
/// per-person components and the sums are multiplied by the count; nothing
/// is multiplied per line, so no rounding drift is introduced twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTotals {
    /// Business fee across all beneficiaries
    pub service_fee: Decimal,

    /// Government fee across all beneficiaries
    pub govt_fee: Decimal,

    /// service_fee + govt_fee
    pub total: Decimal,

    /// Combined fee for one beneficiary
    pub per_person_total: Decimal,

    pub beneficiary_count: u32,
}

impl FeeTotals {
    pub fn zero() -> Self {
        Self {
            service_fee: Decimal::ZERO,
            govt_fee: Decimal::ZERO,
            total: Decimal::ZERO,
            per_person_total: Decimal::ZERO,
            beneficiary_count: 1,
        }
    }
}
