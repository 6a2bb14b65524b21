// Fee calculator: pure totals over the selected services.
//
// Each fee component is summed once across the selection to get the
// per-person figures, then the accumulated sums are multiplied by the
// beneficiary count. Multiplying per line and summing afterwards would round
// twice; this order keeps total = per_person_total * count exact.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::core::{AppError, Result};
use crate::modules::catalog::models::Service;
use crate::modules::documents::models::FeeTotals;

pub struct FeeCalculator;

impl FeeCalculator {
    /// Match the requested service ids against what the catalog returned,
    /// preserving request order. An id the catalog does not know is a
    /// validation error rather than a silent zero-fee line.
    pub fn resolve_services(
        requested_ids: &[String],
        catalog_services: Vec<Service>,
    ) -> Result<Vec<Service>> {
        if requested_ids.is_empty() {
            return Err(AppError::validation(
                "At least one service must be selected",
            ));
        }

        let by_id: HashMap<String, Service> = catalog_services
            .into_iter()
            .filter_map(|s| s.id.clone().map(|id| (id, s)))
            .collect();

        requested_ids
            .iter()
            .map(|id| {
                by_id
                    .get(id)
                    .cloned()
                    .ok_or_else(|| AppError::validation(format!("Unknown service id: {}", id)))
            })
            .collect()
    }

    /// Compute document totals for the selected services and beneficiary
    /// count. Pure and deterministic; an empty bulk list still yields a
    /// count of 1 so totals don't collapse to zero.
    pub fn compute_totals(services: &[Service], beneficiary_count: u32) -> FeeTotals {
        let count = beneficiary_count.max(1);
        let multiplier = Decimal::from(count);

        let mut service_fee_per_person = Decimal::ZERO;
        let mut govt_fee_per_person = Decimal::ZERO;

        for service in services {
            service_fee_per_person += service.service_fee;
            govt_fee_per_person += service.govt_fee;
        }

        let per_person_total = service_fee_per_person + govt_fee_per_person;

        FeeTotals {
            service_fee: service_fee_per_person * multiplier,
            govt_fee: govt_fee_per_person * multiplier,
            total: per_person_total * multiplier,
            per_person_total,
            beneficiary_count: count,
        }
    }
}
