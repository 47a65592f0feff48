use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three halls a membership can be booked in. Wire form matches the
/// `membershipType` strings the clients send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    StandardHall,
    PremiumHall,
    GardenHall,
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::StandardHall => write!(f, "StandardHall"),
            Venue::PremiumHall => write!(f, "PremiumHall"),
            Venue::GardenHall => write!(f, "GardenHall"),
        }
    }
}

/// Batch windows. GardenHall runs a single daylight batch; the two study
/// halls offer night, day and round-the-clock batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    NightBatch,
    DayBatch,
    FullDayBatch,
    GardenBatch,
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSlot::NightBatch => write!(f, "NightBatch"),
            TimeSlot::DayBatch => write!(f, "DayBatch"),
            TimeSlot::FullDayBatch => write!(f, "FullDayBatch"),
            TimeSlot::GardenBatch => write!(f, "GardenBatch"),
        }
    }
}

/// Closed set of bookable durations. The wire labels ("1 Day", "3 Months")
/// are kept for client compatibility; all arithmetic goes through `days()`
/// and `months()` instead of re-parsing the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MembershipDuration {
    #[serde(rename = "1 Day")]
    OneDay,
    #[serde(rename = "8 Days")]
    EightDays,
    #[serde(rename = "15 Days")]
    FifteenDays,
    #[serde(rename = "1 Month")]
    OneMonth,
    #[serde(rename = "2 Months")]
    TwoMonths,
    #[serde(rename = "3 Months")]
    ThreeMonths,
    #[serde(rename = "4 Months")]
    FourMonths,
    #[serde(rename = "5 Months")]
    FiveMonths,
    #[serde(rename = "6 Months")]
    SixMonths,
    #[serde(rename = "7 Months")]
    SevenMonths,
    #[serde(rename = "8 Months")]
    EightMonths,
    #[serde(rename = "9 Months")]
    NineMonths,
    #[serde(rename = "10 Months")]
    TenMonths,
    #[serde(rename = "11 Months")]
    ElevenMonths,
    #[serde(rename = "12 Months")]
    TwelveMonths,
}

impl MembershipDuration {
    pub const ALL: [MembershipDuration; 15] = [
        MembershipDuration::OneDay,
        MembershipDuration::EightDays,
        MembershipDuration::FifteenDays,
        MembershipDuration::OneMonth,
        MembershipDuration::TwoMonths,
        MembershipDuration::ThreeMonths,
        MembershipDuration::FourMonths,
        MembershipDuration::FiveMonths,
        MembershipDuration::SixMonths,
        MembershipDuration::SevenMonths,
        MembershipDuration::EightMonths,
        MembershipDuration::NineMonths,
        MembershipDuration::TenMonths,
        MembershipDuration::ElevenMonths,
        MembershipDuration::TwelveMonths,
    ];

    /// Day count for the day-bucket durations, `None` for monthly ones.
    pub fn days(&self) -> Option<u32> {
        match self {
            MembershipDuration::OneDay => Some(1),
            MembershipDuration::EightDays => Some(8),
            MembershipDuration::FifteenDays => Some(15),
            _ => None,
        }
    }

    /// Month count for the monthly durations, `None` for day buckets.
    pub fn months(&self) -> Option<u32> {
        match self {
            MembershipDuration::OneMonth => Some(1),
            MembershipDuration::TwoMonths => Some(2),
            MembershipDuration::ThreeMonths => Some(3),
            MembershipDuration::FourMonths => Some(4),
            MembershipDuration::FiveMonths => Some(5),
            MembershipDuration::SixMonths => Some(6),
            MembershipDuration::SevenMonths => Some(7),
            MembershipDuration::EightMonths => Some(8),
            MembershipDuration::NineMonths => Some(9),
            MembershipDuration::TenMonths => Some(10),
            MembershipDuration::ElevenMonths => Some(11),
            MembershipDuration::TwelveMonths => Some(12),
            _ => None,
        }
    }

    pub fn is_monthly(&self) -> bool {
        self.months().is_some()
    }

    /// Membership end date: exact day add for day buckets, calendar month
    /// add (clamped at month end) for monthly buckets.
    pub fn end_date(&self, start: NaiveDate) -> NaiveDate {
        if let Some(days) = self.days() {
            start + chrono::Days::new(days as u64)
        } else {
            let months = self.months().unwrap_or(1);
            start
                .checked_add_months(chrono::Months::new(months))
                .unwrap_or(start)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[serde(rename = "prefer-not-to-say")]
    PreferNotToSay,
}

impl Gender {
    pub fn is_female(&self) -> bool {
        matches!(self, Gender::Female)
    }
}

/// Row letter in the study halls (A to E) or section in PremiumHall (A to C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatSection {
    A,
    B,
    C,
    D,
    E,
}

impl SeatSection {
    fn from_char(c: char) -> Option<SeatSection> {
        match c.to_ascii_uppercase() {
            'A' => Some(SeatSection::A),
            'B' => Some(SeatSection::B),
            'C' => Some(SeatSection::C),
            'D' => Some(SeatSection::D),
            'E' => Some(SeatSection::E),
            _ => None,
        }
    }

    fn as_char(&self) -> char {
        match self {
            SeatSection::A => 'A',
            SeatSection::B => 'B',
            SeatSection::C => 'C',
            SeatSection::D => 'D',
            SeatSection::E => 'E',
        }
    }
}

/// Structured seat identifier, parsed once at the API boundary from strings
/// like "A54". Seat number 0 marks an aisle/placeholder cell in the floor
/// layouts and is rejected here, so a placeholder can never reach the tier
/// classifier or the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatId {
    pub section: SeatSection,
    pub number: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatIdParseError(pub String);

impl fmt::Display for SeatIdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid seat identifier: {}", self.0)
    }
}

impl std::error::Error for SeatIdParseError {}

impl FromStr for SeatId {
    type Err = SeatIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let section = chars
            .next()
            .and_then(SeatSection::from_char)
            .ok_or_else(|| SeatIdParseError(s.to_string()))?;

        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SeatIdParseError(s.to_string()));
        }
        let number: u16 = digits.parse().map_err(|_| SeatIdParseError(s.to_string()))?;
        if number == 0 {
            // 0 is the layout placeholder, never a bookable seat
            return Err(SeatIdParseError(s.to_string()));
        }

        Ok(SeatId { section, number })
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.section.as_char(), self.number)
    }
}

impl TryFrom<String> for SeatId {
    type Error = SeatIdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatId> for String {
    fn from(seat: SeatId) -> String {
        seat.to_string()
    }
}

/// One booking attempt: the member's chosen configuration plus the profile
/// context pricing depends on. Built per request and never persisted as-is;
/// the accepted selection is folded into the member's `bookingDetails`.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingSelection {
    pub membership_type: Venue,
    pub time_slot: TimeSlot,
    pub membership_duration: MembershipDuration,
    pub membership_start_date: NaiveDate,
    pub preferred_seat: SeatId,
    pub is_female: bool,
    pub registration_date: Option<DateTime<Utc>>,
    pub last_package_date: Option<DateTime<Utc>>,
}

/// Wire form of a booking submission (`bookingDetails` in the request body).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub membership_type: Venue,
    pub time_slot: TimeSlot,
    pub membership_duration: MembershipDuration,
    pub membership_start_date: NaiveDate,
    pub preferred_seat: SeatId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_id_parses_section_and_number() {
        let seat: SeatId = "A54".parse().unwrap();
        assert_eq!(seat.section, SeatSection::A);
        assert_eq!(seat.number, 54);
        assert_eq!(seat.to_string(), "A54");
    }

    #[test]
    fn seat_id_rejects_placeholders_and_garbage() {
        assert!("A0".parse::<SeatId>().is_err());
        assert!("".parse::<SeatId>().is_err());
        assert!("54".parse::<SeatId>().is_err());
        assert!("AA5".parse::<SeatId>().is_err());
        assert!("F12".parse::<SeatId>().is_err());
        assert!("B-3".parse::<SeatId>().is_err());
    }

    #[test]
    fn duration_labels_round_trip() {
        let json = serde_json::to_string(&MembershipDuration::ThreeMonths).unwrap();
        assert_eq!(json, "\"3 Months\"");
        let back: MembershipDuration = serde_json::from_str("\"15 Days\"").unwrap();
        assert_eq!(back, MembershipDuration::FifteenDays);
    }

    #[test]
    fn duration_counts() {
        assert_eq!(MembershipDuration::OneDay.days(), Some(1));
        assert_eq!(MembershipDuration::OneDay.months(), None);
        assert_eq!(MembershipDuration::TwelveMonths.months(), Some(12));
        assert!(MembershipDuration::SixMonths.is_monthly());
        assert!(!MembershipDuration::FifteenDays.is_monthly());
    }

    #[test]
    fn end_date_day_and_month_buckets() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert_eq!(
            MembershipDuration::EightDays.end_date(start),
            NaiveDate::from_ymd_opt(2025, 1, 18).unwrap()
        );
        assert_eq!(
            MembershipDuration::ThreeMonths.end_date(start),
            NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
        );
        // month add clamps at the end of a short month
        let eom = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(
            MembershipDuration::OneMonth.end_date(eom),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }
}
