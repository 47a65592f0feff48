pub mod composer;
pub mod discounts;
pub mod fees;
pub mod rates;
pub mod seating;

use crate::models::booking::{BookingSelection, MembershipDuration, SeatId, TimeSlot, Venue};
use chrono::{DateTime, Utc};
use std::fmt;

pub use composer::{compute_price, PriceBreakdown};
pub use discounts::DiscountTable;
pub use rates::RateTable;
pub use seating::{SeatPlan, SeatTier};

#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    RateUnavailable {
        venue: Venue,
        duration: MembershipDuration,
        slot: TimeSlot,
    },
    UnknownSeat {
        venue: Venue,
        seat: SeatId,
    },
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::RateUnavailable {
                venue,
                duration,
                slot,
            } => write!(
                f,
                "no rate published for {} / {:?} / {}",
                venue, duration, slot
            ),
            PricingError::UnknownSeat { venue, seat } => {
                write!(f, "seat {} does not exist in {}", seat, venue)
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// Immutable pricing configuration: rate table, discount table and floor
/// plans. Built once at startup and shared through `web::Data`; handlers and
/// the booking validator read it, nothing mutates it.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub rates: RateTable,
    pub discounts: DiscountTable,
    pub seating: SeatPlan,
}

impl PricingConfig {
    /// Production tables.
    pub fn standard() -> Self {
        PricingConfig {
            rates: RateTable::standard(),
            discounts: DiscountTable::standard(),
            seating: SeatPlan::standard(),
        }
    }

    pub fn compute_price(
        &self,
        selection: &BookingSelection,
        now: DateTime<Utc>,
    ) -> Result<PriceBreakdown, PricingError> {
        composer::compute_price(self, selection, now)
    }
}
