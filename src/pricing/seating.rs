use crate::models::booking::{SeatId, SeatSection, Venue};
use crate::pricing::PricingError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Premium seat tiers carry a surcharge over the base rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatTier {
    Standard,
    Silver,
    Gold,
}

impl SeatTier {
    /// Surcharge applied to the base price, as a whole percentage.
    pub fn surcharge_percent(&self) -> i64 {
        match self {
            SeatTier::Standard => 0,
            SeatTier::Silver => 25,
            SeatTier::Gold => 50,
        }
    }
}

impl fmt::Display for SeatTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatTier::Standard => write!(f, "standard"),
            SeatTier::Silver => write!(f, "silver"),
            SeatTier::Gold => write!(f, "gold"),
        }
    }
}

/// Floor layout for every venue: which seats exist in which row, which of
/// them are silver or gold, and which are reserved for female members.
/// StandardHall and GardenHall share one physical layout; PremiumHall has
/// its own three sections.
#[derive(Debug, Clone)]
pub struct SeatPlan {
    rows: HashMap<(Venue, SeatSection), HashSet<u16>>,
    tiers: HashMap<(Venue, u16), SeatTier>,
    female_only: HashMap<Venue, HashSet<u16>>,
}

impl SeatPlan {
    pub fn standard() -> Self {
        let mut plan = SeatPlan {
            rows: HashMap::new(),
            tiers: HashMap::new(),
            female_only: HashMap::new(),
        };

        // StandardHall and GardenHall: rows A-E, 49 seats. Row seats are not
        // contiguous because the back half of each row mirrors the front.
        for venue in [Venue::StandardHall, Venue::GardenHall] {
            plan.add_row(venue, SeatSection::A, &[1, 2, 3, 4, 5, 46, 47, 48, 49]);
            plan.add_row(venue, SeatSection::B, &[6, 7, 8, 9, 10, 11, 42, 43, 44, 45]);
            plan.add_row(venue, SeatSection::C, &[12, 13, 14, 15, 16, 17, 38, 39, 40, 41]);
            plan.add_row(venue, SeatSection::D, &[18, 19, 20, 21, 22, 23, 34, 35, 36, 37]);
            plan.add_row(
                venue,
                SeatSection::E,
                &[24, 25, 26, 27, 28, 29, 30, 31, 32, 33],
            );

            plan.tiers.insert((venue, 5), SeatTier::Gold);
            for n in [24, 25, 26, 27, 28, 29, 32, 33] {
                plan.tiers.insert((venue, n), SeatTier::Silver);
            }
        }

        // The garden side keeps seats 30-49 for female members.
        plan.female_only
            .insert(Venue::GardenHall, (30..=49).collect());

        // PremiumHall: sections A-C, seats 50-73. Section A is the
        // female-only cabin.
        plan.add_row(
            Venue::PremiumHall,
            SeatSection::A,
            &[50, 51, 52, 53, 54, 55, 56, 57, 58, 59],
        );
        plan.add_row(
            Venue::PremiumHall,
            SeatSection::B,
            &[60, 61, 62, 63, 64, 65, 66],
        );
        plan.add_row(
            Venue::PremiumHall,
            SeatSection::C,
            &[67, 68, 69, 70, 71, 72, 73],
        );

        for n in [54, 55, 56, 63, 64, 65] {
            plan.tiers.insert((Venue::PremiumHall, n), SeatTier::Silver);
        }
        plan.tiers.insert((Venue::PremiumHall, 69), SeatTier::Gold);

        plan.female_only
            .insert(Venue::PremiumHall, (50..=59).collect());

        plan
    }

    fn add_row(&mut self, venue: Venue, section: SeatSection, numbers: &[u16]) {
        self.rows
            .insert((venue, section), numbers.iter().copied().collect());
    }

    /// Whether the seat exists in the venue's layout, in the row the client
    /// claimed it is in.
    pub fn contains(&self, venue: Venue, seat: SeatId) -> bool {
        self.rows
            .get(&(venue, seat.section))
            .map_or(false, |numbers| numbers.contains(&seat.number))
    }

    /// Tier of a seat in a venue. Seats outside the layout are an error, not
    /// a silent `Standard`.
    pub fn tier(&self, venue: Venue, seat: SeatId) -> Result<SeatTier, PricingError> {
        if !self.contains(venue, seat) {
            return Err(PricingError::UnknownSeat { venue, seat });
        }
        Ok(self
            .tiers
            .get(&(venue, seat.number))
            .copied()
            .unwrap_or(SeatTier::Standard))
    }

    /// Seats set aside for female members: the garden side of GardenHall and
    /// the Premium A cabin.
    pub fn is_female_only(&self, venue: Venue, seat: SeatId) -> bool {
        self.female_only
            .get(&venue)
            .map_or(false, |numbers| numbers.contains(&seat.number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(s: &str) -> SeatId {
        s.parse().unwrap()
    }

    #[test]
    fn layout_membership() {
        let plan = SeatPlan::standard();
        assert!(plan.contains(Venue::StandardHall, seat("A5")));
        assert!(plan.contains(Venue::StandardHall, seat("E33")));
        assert!(plan.contains(Venue::PremiumHall, seat("C73")));
        // wrong row for the number
        assert!(!plan.contains(Venue::StandardHall, seat("B5")));
        // premium numbers do not exist in the study hall
        assert!(!plan.contains(Venue::StandardHall, seat("A54")));
        // hall numbers do not exist in premium
        assert!(!plan.contains(Venue::PremiumHall, seat("A5")));
    }

    #[test]
    fn hall_tiers() {
        let plan = SeatPlan::standard();
        assert_eq!(
            plan.tier(Venue::StandardHall, seat("A5")).unwrap(),
            SeatTier::Gold
        );
        assert_eq!(
            plan.tier(Venue::StandardHall, seat("E24")).unwrap(),
            SeatTier::Silver
        );
        assert_eq!(
            plan.tier(Venue::StandardHall, seat("E30")).unwrap(),
            SeatTier::Standard
        );
        // garden shares the hall layout and tiers
        assert_eq!(
            plan.tier(Venue::GardenHall, seat("E33")).unwrap(),
            SeatTier::Silver
        );
    }

    #[test]
    fn premium_tiers() {
        let plan = SeatPlan::standard();
        assert_eq!(
            plan.tier(Venue::PremiumHall, seat("A54")).unwrap(),
            SeatTier::Silver
        );
        assert_eq!(
            plan.tier(Venue::PremiumHall, seat("B64")).unwrap(),
            SeatTier::Silver
        );
        assert_eq!(
            plan.tier(Venue::PremiumHall, seat("C69")).unwrap(),
            SeatTier::Gold
        );
        assert_eq!(
            plan.tier(Venue::PremiumHall, seat("B60")).unwrap(),
            SeatTier::Standard
        );
    }

    #[test]
    fn unknown_seat_is_an_error() {
        let plan = SeatPlan::standard();
        assert!(matches!(
            plan.tier(Venue::StandardHall, seat("A50")),
            Err(PricingError::UnknownSeat { .. })
        ));
    }

    #[test]
    fn female_only_zones() {
        let plan = SeatPlan::standard();
        assert!(plan.is_female_only(Venue::GardenHall, seat("E30")));
        assert!(plan.is_female_only(Venue::GardenHall, seat("A49")));
        assert!(!plan.is_female_only(Venue::GardenHall, seat("E29")));
        assert!(plan.is_female_only(Venue::PremiumHall, seat("A50")));
        assert!(!plan.is_female_only(Venue::PremiumHall, seat("B60")));
        // the study hall has no female side at all
        assert!(!plan.is_female_only(Venue::StandardHall, seat("E30")));
    }
}
