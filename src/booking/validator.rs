use crate::models::booking::{BookingSelection, MembershipDuration, SeatId, TimeSlot, Venue};
use crate::pricing::PricingConfig;
use chrono::NaiveDate;
use std::fmt;

/// How far ahead a membership may start, in days from today.
pub const MAX_START_AHEAD_DAYS: u64 = 30;

/// A rejected booking selection, keyed to the request field that caused it
/// so clients can highlight the right control.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    DurationNotOffered {
        venue: Venue,
        duration: MembershipDuration,
    },
    SlotNotOffered {
        venue: Venue,
        slot: TimeSlot,
    },
    StartDateOutOfRange {
        start: NaiveDate,
        earliest: NaiveDate,
        latest: NaiveDate,
    },
    SeatNotInVenue {
        venue: Venue,
        seat: SeatId,
    },
    VenueNotPermitted {
        venue: Venue,
    },
    SeatReservedForFemales {
        venue: Venue,
        seat: SeatId,
    },
}

impl ValidationError {
    /// Request field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::DurationNotOffered { .. } => "membershipDuration",
            ValidationError::SlotNotOffered { .. } => "timeSlot",
            ValidationError::StartDateOutOfRange { .. } => "membershipStartDate",
            ValidationError::SeatNotInVenue { .. } => "preferredSeat",
            ValidationError::VenueNotPermitted { .. } => "membershipType",
            ValidationError::SeatReservedForFemales { .. } => "preferredSeat",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DurationNotOffered { venue, duration } => {
                write!(f, "{:?} memberships are not offered in {}", duration, venue)
            }
            ValidationError::SlotNotOffered { venue, slot } => {
                write!(f, "{} does not run in {}", slot, venue)
            }
            ValidationError::StartDateOutOfRange {
                start,
                earliest,
                latest,
            } => write!(
                f,
                "start date {} must be between {} and {}",
                start, earliest, latest
            ),
            ValidationError::SeatNotInVenue { venue, seat } => {
                write!(f, "seat {} does not exist in {}", seat, venue)
            }
            ValidationError::VenueNotPermitted { venue } => {
                write!(f, "{} is reserved for male members", venue)
            }
            ValidationError::SeatReservedForFemales { venue, seat } => {
                write!(f, "seat {} in {} is reserved for female members", seat, venue)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a booking selection against the venue's offering, the seating plan
/// and the gender rules. Pure; `today` anchors the start-date window. The
/// first failing rule is reported.
pub fn validate_selection(
    config: &PricingConfig,
    selection: &BookingSelection,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    let venue = selection.membership_type;
    let duration = selection.membership_duration;
    let slot = selection.time_slot;
    let seat = selection.preferred_seat;

    // GardenHall sells monthly memberships only
    if venue == Venue::GardenHall && !duration.is_monthly() {
        return Err(ValidationError::DurationNotOffered { venue, duration });
    }

    // the garden batch exists only in the garden, and is its only batch
    let slot_offered = match venue {
        Venue::GardenHall => slot == TimeSlot::GardenBatch,
        Venue::StandardHall | Venue::PremiumHall => slot != TimeSlot::GardenBatch,
    };
    if !slot_offered {
        return Err(ValidationError::SlotNotOffered { venue, slot });
    }

    let earliest = today;
    let latest = today + chrono::Days::new(MAX_START_AHEAD_DAYS);
    let start = selection.membership_start_date;
    if start < earliest || start > latest {
        return Err(ValidationError::StartDateOutOfRange {
            start,
            earliest,
            latest,
        });
    }

    if !config.seating.contains(venue, seat) {
        return Err(ValidationError::SeatNotInVenue { venue, seat });
    }

    if venue == Venue::StandardHall && selection.is_female {
        return Err(ValidationError::VenueNotPermitted { venue });
    }
    if !selection.is_female && config.seating.is_female_only(venue, seat) {
        return Err(ValidationError::SeatReservedForFemales { venue, seat });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn selection(
        venue: Venue,
        slot: TimeSlot,
        duration: MembershipDuration,
        seat: &str,
        is_female: bool,
    ) -> BookingSelection {
        BookingSelection {
            membership_type: venue,
            time_slot: slot,
            membership_duration: duration,
            membership_start_date: today() + chrono::Days::new(2),
            preferred_seat: seat.parse().unwrap(),
            is_female,
            registration_date: None,
            last_package_date: None,
        }
    }

    #[test]
    fn accepts_a_plain_hall_booking() {
        let config = PricingConfig::standard();
        let sel = selection(
            Venue::StandardHall,
            TimeSlot::DayBatch,
            MembershipDuration::OneMonth,
            "B6",
            false,
        );
        assert!(validate_selection(&config, &sel, today()).is_ok());
    }

    #[test]
    fn garden_is_monthly_only() {
        let config = PricingConfig::standard();
        let sel = selection(
            Venue::GardenHall,
            TimeSlot::GardenBatch,
            MembershipDuration::FifteenDays,
            "E30",
            true,
        );
        let err = validate_selection(&config, &sel, today()).unwrap_err();
        assert!(matches!(err, ValidationError::DurationNotOffered { .. }));
        assert_eq!(err.field(), "membershipDuration");
    }

    #[test]
    fn garden_batch_is_garden_only_and_mandatory() {
        let config = PricingConfig::standard();
        let in_hall = selection(
            Venue::StandardHall,
            TimeSlot::GardenBatch,
            MembershipDuration::OneMonth,
            "B6",
            false,
        );
        assert!(matches!(
            validate_selection(&config, &in_hall, today()),
            Err(ValidationError::SlotNotOffered { .. })
        ));

        let wrong_garden_slot = selection(
            Venue::GardenHall,
            TimeSlot::DayBatch,
            MembershipDuration::ThreeMonths,
            "E30",
            true,
        );
        assert!(matches!(
            validate_selection(&config, &wrong_garden_slot, today()),
            Err(ValidationError::SlotNotOffered { .. })
        ));
    }

    #[test]
    fn start_date_window_is_inclusive() {
        let config = PricingConfig::standard();
        let mut sel = selection(
            Venue::StandardHall,
            TimeSlot::DayBatch,
            MembershipDuration::OneMonth,
            "B6",
            false,
        );

        sel.membership_start_date = today();
        assert!(validate_selection(&config, &sel, today()).is_ok());

        sel.membership_start_date = today() + chrono::Days::new(30);
        assert!(validate_selection(&config, &sel, today()).is_ok());

        sel.membership_start_date = today() - chrono::Days::new(1);
        assert!(matches!(
            validate_selection(&config, &sel, today()),
            Err(ValidationError::StartDateOutOfRange { .. })
        ));

        sel.membership_start_date = today() + chrono::Days::new(31);
        assert!(matches!(
            validate_selection(&config, &sel, today()),
            Err(ValidationError::StartDateOutOfRange { .. })
        ));
    }

    #[test]
    fn seat_must_exist_in_the_venue() {
        let config = PricingConfig::standard();
        let sel = selection(
            Venue::PremiumHall,
            TimeSlot::DayBatch,
            MembershipDuration::OneMonth,
            "A5",
            true,
        );
        let err = validate_selection(&config, &sel, today()).unwrap_err();
        assert!(matches!(err, ValidationError::SeatNotInVenue { .. }));
        assert_eq!(err.field(), "preferredSeat");
    }

    #[test]
    fn standard_hall_rejects_female_members() {
        let config = PricingConfig::standard();
        let sel = selection(
            Venue::StandardHall,
            TimeSlot::DayBatch,
            MembershipDuration::OneMonth,
            "B6",
            true,
        );
        assert!(matches!(
            validate_selection(&config, &sel, today()),
            Err(ValidationError::VenueNotPermitted { .. })
        ));
    }

    #[test]
    fn garden_female_side_rejects_male_members() {
        let config = PricingConfig::standard();
        let male_on_female_side = selection(
            Venue::GardenHall,
            TimeSlot::GardenBatch,
            MembershipDuration::ThreeMonths,
            "E30",
            false,
        );
        assert!(matches!(
            validate_selection(&config, &male_on_female_side, today()),
            Err(ValidationError::SeatReservedForFemales { .. })
        ));

        let male_on_open_side = selection(
            Venue::GardenHall,
            TimeSlot::GardenBatch,
            MembershipDuration::ThreeMonths,
            "E29",
            false,
        );
        assert!(validate_selection(&config, &male_on_open_side, today()).is_ok());

        // a female member may sit anywhere in the garden
        let female_anywhere = selection(
            Venue::GardenHall,
            TimeSlot::GardenBatch,
            MembershipDuration::ThreeMonths,
            "E29",
            true,
        );
        assert!(validate_selection(&config, &female_anywhere, today()).is_ok());
    }

    #[test]
    fn premium_cabin_a_is_female_only() {
        let config = PricingConfig::standard();
        let male_in_cabin = selection(
            Venue::PremiumHall,
            TimeSlot::FullDayBatch,
            MembershipDuration::SixMonths,
            "A54",
            false,
        );
        assert!(matches!(
            validate_selection(&config, &male_in_cabin, today()),
            Err(ValidationError::SeatReservedForFemales { .. })
        ));

        let male_in_b = selection(
            Venue::PremiumHall,
            TimeSlot::FullDayBatch,
            MembershipDuration::SixMonths,
            "B60",
            false,
        );
        assert!(validate_selection(&config, &male_in_b, today()).is_ok());
    }
}
