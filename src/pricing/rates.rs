use crate::models::booking::{MembershipDuration, TimeSlot, Venue};
use crate::pricing::PricingError;
use std::collections::HashMap;

/// Monthly rate for GardenHall: flat per-month price, GardenBatch only.
pub const GARDEN_MONTHLY_RATE: i64 = 399;

/// Published price list for the two study halls. GardenHall is not in the
/// table; its price is computed per month. A combination missing here is
/// simply not sold, and lookup reports that instead of pricing it at zero.
#[derive(Debug, Clone)]
pub struct RateTable {
    rates: HashMap<(Venue, MembershipDuration, TimeSlot), i64>,
}

impl RateTable {
    pub fn standard() -> Self {
        use MembershipDuration::*;

        let mut table = RateTable {
            rates: HashMap::new(),
        };

        // StandardHall: night / day / full-day
        table.add_slab(Venue::StandardHall, OneDay, 79, 99, 149);
        table.add_slab(Venue::StandardHall, EightDays, 299, 399, 599);
        table.add_slab(Venue::StandardHall, FifteenDays, 599, 699, 999);
        table.add_slab(Venue::StandardHall, OneMonth, 799, 999, 1499);
        table.add_slab(Venue::StandardHall, TwoMonths, 1599, 1999, 2999);
        table.add_slab(Venue::StandardHall, ThreeMonths, 2299, 2799, 4499);
        table.add_slab(Venue::StandardHall, FourMonths, 2999, 3799, 5999);
        table.add_slab(Venue::StandardHall, FiveMonths, 3499, 4499, 6999);
        table.add_slab(Venue::StandardHall, SixMonths, 3999, 4999, 7499);
        table.add_slab(Venue::StandardHall, SevenMonths, 4999, 5999, 8999);
        table.add_slab(Venue::StandardHall, EightMonths, 5199, 6499, 9999);
        table.add_slab(Venue::StandardHall, NineMonths, 5599, 6999, 10999);
        table.add_slab(Venue::StandardHall, TenMonths, 5999, 7499, 11499);
        table.add_slab(Venue::StandardHall, ElevenMonths, 6499, 7999, 12499);
        table.add_slab(Venue::StandardHall, TwelveMonths, 6999, 8499, 12999);

        // PremiumHall
        table.add_slab(Venue::PremiumHall, OneDay, 149, 199, 299);
        table.add_slab(Venue::PremiumHall, EightDays, 349, 499, 699);
        table.add_slab(Venue::PremiumHall, FifteenDays, 849, 1199, 1799);
        table.add_slab(Venue::PremiumHall, OneMonth, 1399, 1999, 2999);
        table.add_slab(Venue::PremiumHall, TwoMonths, 2799, 3999, 5999);
        table.add_slab(Venue::PremiumHall, ThreeMonths, 3499, 4999, 7499);
        table.add_slab(Venue::PremiumHall, FourMonths, 4999, 6999, 9999);
        table.add_slab(Venue::PremiumHall, FiveMonths, 5999, 7999, 11499);
        table.add_slab(Venue::PremiumHall, SixMonths, 6499, 8999, 12999);
        table.add_slab(Venue::PremiumHall, SevenMonths, 7499, 10499, 14999);
        table.add_slab(Venue::PremiumHall, EightMonths, 7499, 10999, 15999);
        table.add_slab(Venue::PremiumHall, NineMonths, 7999, 11499, 16999);
        table.add_slab(Venue::PremiumHall, TenMonths, 8499, 11999, 17499);
        table.add_slab(Venue::PremiumHall, ElevenMonths, 8999, 12499, 17999);
        table.add_slab(Venue::PremiumHall, TwelveMonths, 9499, 12999, 18999);

        table
    }

    fn add_slab(
        &mut self,
        venue: Venue,
        duration: MembershipDuration,
        night: i64,
        day: i64,
        full_day: i64,
    ) {
        self.rates
            .insert((venue, duration, TimeSlot::NightBatch), night);
        self.rates.insert((venue, duration, TimeSlot::DayBatch), day);
        self.rates
            .insert((venue, duration, TimeSlot::FullDayBatch), full_day);
    }

    /// Base price before any seat tier or discount. GardenHall prices are
    /// derived (flat monthly rate), everything else is a table lookup.
    pub fn base_price(
        &self,
        venue: Venue,
        duration: MembershipDuration,
        slot: TimeSlot,
    ) -> Result<i64, PricingError> {
        if venue == Venue::GardenHall {
            if slot != TimeSlot::GardenBatch {
                return Err(PricingError::RateUnavailable {
                    venue,
                    duration,
                    slot,
                });
            }
            let months = duration.months().ok_or(PricingError::RateUnavailable {
                venue,
                duration,
                slot,
            })?;
            return Ok(GARDEN_MONTHLY_RATE * months as i64);
        }

        self.rates
            .get(&(venue, duration, slot))
            .copied()
            .ok_or(PricingError::RateUnavailable {
                venue,
                duration,
                slot,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_hall_day_batch_one_month() {
        let table = RateTable::standard();
        let price = table
            .base_price(
                Venue::StandardHall,
                MembershipDuration::OneMonth,
                TimeSlot::DayBatch,
            )
            .unwrap();
        assert_eq!(price, 999);
    }

    #[test]
    fn premium_hall_full_day_twelve_months() {
        let table = RateTable::standard();
        let price = table
            .base_price(
                Venue::PremiumHall,
                MembershipDuration::TwelveMonths,
                TimeSlot::FullDayBatch,
            )
            .unwrap();
        assert_eq!(price, 18999);
    }

    #[test]
    fn garden_price_scales_with_months() {
        let table = RateTable::standard();
        assert_eq!(
            table
                .base_price(
                    Venue::GardenHall,
                    MembershipDuration::ThreeMonths,
                    TimeSlot::GardenBatch,
                )
                .unwrap(),
            1197
        );
        assert_eq!(
            table
                .base_price(
                    Venue::GardenHall,
                    MembershipDuration::TwelveMonths,
                    TimeSlot::GardenBatch,
                )
                .unwrap(),
            4788
        );
    }

    #[test]
    fn garden_rejects_day_buckets_and_foreign_slots() {
        let table = RateTable::standard();
        assert!(table
            .base_price(
                Venue::GardenHall,
                MembershipDuration::FifteenDays,
                TimeSlot::GardenBatch,
            )
            .is_err());
        assert!(table
            .base_price(
                Venue::GardenHall,
                MembershipDuration::ThreeMonths,
                TimeSlot::DayBatch,
            )
            .is_err());
    }

    #[test]
    fn halls_reject_garden_batch() {
        let table = RateTable::standard();
        assert!(table
            .base_price(
                Venue::StandardHall,
                MembershipDuration::OneMonth,
                TimeSlot::GardenBatch,
            )
            .is_err());
        assert!(table
            .base_price(
                Venue::PremiumHall,
                MembershipDuration::OneMonth,
                TimeSlot::GardenBatch,
            )
            .is_err());
    }

    #[test]
    fn every_hall_duration_slot_combination_is_priced() {
        let table = RateTable::standard();
        for venue in [Venue::StandardHall, Venue::PremiumHall] {
            for duration in MembershipDuration::ALL {
                for slot in [TimeSlot::NightBatch, TimeSlot::DayBatch, TimeSlot::FullDayBatch] {
                    assert!(
                        table.base_price(venue, duration, slot).is_ok(),
                        "missing rate for {} {:?} {}",
                        venue,
                        duration,
                        slot
                    );
                }
            }
        }
    }
}
