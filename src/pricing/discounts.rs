use crate::models::booking::{MembershipDuration, TimeSlot, Venue};
use std::collections::HashMap;

/// Extra discount for female members on memberships of three months or more.
pub const FEMALE_DISCOUNT_PERCENT: u32 = 10;
const FEMALE_DISCOUNT_MIN_MONTHS: u32 = 3;

/// Duration discounts for the two study halls, keyed like the rate grid.
/// The table is sparse: a missing entry means no promotion is running for
/// that combination and the discount is zero, unlike rates where a miss is
/// an error.
#[derive(Debug, Clone)]
pub struct DiscountTable {
    percents: HashMap<(Venue, MembershipDuration, TimeSlot), u32>,
}

impl DiscountTable {
    pub fn standard() -> Self {
        use MembershipDuration::*;

        let mut table = DiscountTable {
            percents: HashMap::new(),
        };

        for venue in [Venue::StandardHall, Venue::PremiumHall] {
            table.add_promotion(venue, ThreeMonths, 5);
            table.add_promotion(venue, SixMonths, 6);
            table.add_promotion(venue, NineMonths, 7);
            table.add_promotion(venue, TenMonths, 8);
            table.add_promotion(venue, ElevenMonths, 10);
            table.add_promotion(venue, TwelveMonths, 15);
        }

        table
    }

    /// The published promotions hold the same percentage across every slot
    /// the halls sell.
    fn add_promotion(&mut self, venue: Venue, duration: MembershipDuration, percent: u32) {
        for slot in [TimeSlot::NightBatch, TimeSlot::DayBatch, TimeSlot::FullDayBatch] {
            self.percents.insert((venue, duration, slot), percent);
        }
    }

    /// Duration discount percentage, 0 when no promotion covers the
    /// combination.
    pub fn duration_percent(
        &self,
        venue: Venue,
        duration: MembershipDuration,
        slot: TimeSlot,
    ) -> u32 {
        self.percents
            .get(&(venue, duration, slot))
            .copied()
            .unwrap_or(0)
    }

    /// Duration discount plus the female bonus where it applies, capped at
    /// 100 so the composed discount can never exceed the full price.
    pub fn combined_percent(
        &self,
        venue: Venue,
        duration: MembershipDuration,
        slot: TimeSlot,
        is_female: bool,
    ) -> u32 {
        let mut percent = self.duration_percent(venue, duration, slot);
        if is_female && duration.months().map_or(false, |m| m >= FEMALE_DISCOUNT_MIN_MONTHS) {
            percent += FEMALE_DISCOUNT_PERCENT;
        }
        percent.min(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_discounts_for_halls() {
        let table = DiscountTable::standard();
        assert_eq!(
            table.duration_percent(
                Venue::StandardHall,
                MembershipDuration::ThreeMonths,
                TimeSlot::DayBatch
            ),
            5
        );
        assert_eq!(
            table.duration_percent(
                Venue::PremiumHall,
                MembershipDuration::SixMonths,
                TimeSlot::NightBatch
            ),
            6
        );
        assert_eq!(
            table.duration_percent(
                Venue::StandardHall,
                MembershipDuration::TwelveMonths,
                TimeSlot::FullDayBatch
            ),
            15
        );
    }

    #[test]
    fn the_same_promotion_covers_every_slot() {
        let table = DiscountTable::standard();
        for slot in [TimeSlot::NightBatch, TimeSlot::DayBatch, TimeSlot::FullDayBatch] {
            assert_eq!(
                table.duration_percent(Venue::PremiumHall, MembershipDuration::ElevenMonths, slot),
                10
            );
        }
    }

    #[test]
    fn undiscounted_combinations_are_zero() {
        let table = DiscountTable::standard();
        assert_eq!(
            table.duration_percent(
                Venue::StandardHall,
                MembershipDuration::OneMonth,
                TimeSlot::DayBatch
            ),
            0
        );
        assert_eq!(
            table.duration_percent(
                Venue::StandardHall,
                MembershipDuration::EightDays,
                TimeSlot::NightBatch
            ),
            0
        );
        // GardenHall runs no duration promotions
        assert_eq!(
            table.duration_percent(
                Venue::GardenHall,
                MembershipDuration::TwelveMonths,
                TimeSlot::GardenBatch
            ),
            0
        );
    }

    #[test]
    fn female_bonus_needs_three_months() {
        let table = DiscountTable::standard();
        assert_eq!(
            table.combined_percent(
                Venue::StandardHall,
                MembershipDuration::SixMonths,
                TimeSlot::NightBatch,
                true
            ),
            16
        );
        assert_eq!(
            table.combined_percent(
                Venue::StandardHall,
                MembershipDuration::TwoMonths,
                TimeSlot::DayBatch,
                true
            ),
            0
        );
        assert_eq!(
            table.combined_percent(
                Venue::StandardHall,
                MembershipDuration::FifteenDays,
                TimeSlot::DayBatch,
                true
            ),
            0
        );
        // garden: no duration discount but the female bonus still applies
        assert_eq!(
            table.combined_percent(
                Venue::GardenHall,
                MembershipDuration::ThreeMonths,
                TimeSlot::GardenBatch,
                true
            ),
            10
        );
    }

    #[test]
    fn combined_discount_is_capped() {
        let table = DiscountTable::standard();
        let percent = table.combined_percent(
            Venue::PremiumHall,
            MembershipDuration::TwelveMonths,
            TimeSlot::FullDayBatch,
            true,
        );
        assert_eq!(percent, 25);
        assert!(percent <= 100);
    }
}
