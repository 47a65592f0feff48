use crate::models::booking::BookingSelection;
use crate::pricing::seating::SeatTier;
use crate::pricing::{fees, PricingConfig, PricingError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full price breakdown for one booking selection, in the shape the payment
/// screen renders. Amounts are integer currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_price: i64,
    pub seat_tier: SeatTier,
    pub seat_tier_surcharge: i64,
    pub price_with_seat_tier: i64,
    pub discount_percentage: u32,
    pub discount_amount: i64,
    pub registration_fee: i64,
    pub final_amount: i64,
}

/// `percent` of `value`, rounded half up to the nearest integer unit.
fn percent_of(value: i64, percent: i64) -> i64 {
    (value * percent + 50) / 100
}

/// Compose the price for a selection. Pure: everything time-dependent comes
/// in through the selection and `now`. Assumes the selection already passed
/// the booking validator; the lookups still fail loudly rather than price an
/// unknown combination at zero.
pub fn compute_price(
    config: &PricingConfig,
    selection: &BookingSelection,
    now: DateTime<Utc>,
) -> Result<PriceBreakdown, PricingError> {
    let base_price = config.rates.base_price(
        selection.membership_type,
        selection.membership_duration,
        selection.time_slot,
    )?;

    let seat_tier = config
        .seating
        .tier(selection.membership_type, selection.preferred_seat)?;
    let seat_tier_surcharge = percent_of(base_price, seat_tier.surcharge_percent());
    let price_with_seat_tier = base_price + seat_tier_surcharge;

    let discount_percentage = config.discounts.combined_percent(
        selection.membership_type,
        selection.membership_duration,
        selection.time_slot,
        selection.is_female,
    );
    let discount_amount = percent_of(price_with_seat_tier, discount_percentage as i64);

    let registration_fee = fees::registration_fee(
        selection.registration_date,
        selection.last_package_date,
        now,
    );

    let final_amount = price_with_seat_tier - discount_amount + registration_fee;

    Ok(PriceBreakdown {
        base_price,
        seat_tier,
        seat_tier_surcharge,
        price_with_seat_tier,
        discount_percentage,
        discount_amount,
        registration_fee,
        final_amount,
    })
}
