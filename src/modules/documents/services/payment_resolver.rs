// Payment resolver: settlement status, amount received, and change.
//
// Credit is always deferred: the document stays Pending and nothing is
// received up front. For the paid methods an omitted tender amount means
// exact payment. A tender short of the total does not partially pay the
// document; it demotes the sale to credit with the shortfall outstanding,
// keeping whatever cash was handed over on record and returning no change.

use rust_decimal::Decimal;

use crate::modules::documents::models::{DocumentStatus, PaymentMethod, PaymentOutcome};

pub struct PaymentResolver;

impl PaymentResolver {
    /// Resolve the settlement of a document total against the selected
    /// payment method and the amount tendered.
    pub fn resolve(
        total: Decimal,
        method: PaymentMethod,
        amount_tendered: Option<Decimal>,
    ) -> PaymentOutcome {
        if method == PaymentMethod::Credit {
            return PaymentOutcome {
                status: DocumentStatus::Pending,
                method: PaymentMethod::Credit,
                amount_received: Decimal::ZERO,
                change: Decimal::ZERO,
            };
        }

        let amount_received = match amount_tendered {
            Some(tendered) if tendered > Decimal::ZERO => tendered,
            _ => total,
        };

        if amount_received < total {
            // Cash shortfall converts the sale to credit
            return PaymentOutcome {
                status: DocumentStatus::Pending,
                method: PaymentMethod::Credit,
                amount_received,
                change: Decimal::ZERO,
            };
        }

        PaymentOutcome {
            status: DocumentStatus::Paid,
            method,
            amount_received,
            change: amount_received - total,
        }
    }

    /// Quotations bypass settlement entirely and carry a fixed outcome
    pub fn quotation_outcome() -> PaymentOutcome {
        PaymentOutcome {
            status: DocumentStatus::Quotation,
            method: PaymentMethod::Credit,
            amount_received: Decimal::ZERO,
            change: Decimal::ZERO,
        }
    }
}
