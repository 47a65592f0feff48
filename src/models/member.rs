use chrono::{DateTime, Datelike, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::booking::Gender;
use crate::models::booking::{MembershipDuration, SeatId, TimeSlot, Venue};
use crate::pricing::composer::PriceBreakdown;
use crate::pricing::seating::SeatTier;

fn default_true() -> bool {
    true
}

/// Whole years completed between `dob` and `on`.
pub fn age_between(dob: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - dob.year();
    if (on.month(), on.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// A member document in `studyhall.members`. Field names stay camelCase in
/// Mongo because every client reads them as-is. Most fields are optional:
/// the record is created at the send-otp step with little more than an email
/// and fills up as the member moves through the signup wizard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub password: Option<String>, // Always hashed
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    // Assigned at registration: "@SH" + YYYYMM + 3-digit monthly sequence
    pub member_id: Option<String>,
    pub registration_month: Option<String>,
    pub registration_number: Option<i32>,
    // Verification state
    #[serde(default)]
    pub is_email_verified: bool,
    pub otp_code: Option<String>,
    pub otp_expires: Option<DateTime<Utc>>,
    // OAuth
    pub google_id: Option<String>,
    pub avatar: Option<String>,
    // Account state
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub registration_date: Option<DateTime<Utc>>,
    pub last_package_date: Option<DateTime<Utc>>,
    // Funnel flags
    #[serde(default)]
    pub profile_completed: bool,
    #[serde(default)]
    pub membership_completed: bool,
    #[serde(default)]
    pub booking_completed: bool,
    pub membership_details: Option<MembershipDetails>,
    pub booking_details: Option<BookingDetails>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Member {
    /// Minimal record created when a visitor first asks for an OTP.
    pub fn pending(email: &str, now: DateTime<Utc>) -> Self {
        Member {
            id: None,
            email: email.to_lowercase(),
            password: None,
            full_name: None,
            phone_number: None,
            gender: None,
            date_of_birth: None,
            member_id: None,
            registration_month: None,
            registration_number: None,
            is_email_verified: false,
            otp_code: None,
            otp_expires: None,
            google_id: None,
            avatar: None,
            is_active: true,
            last_login: None,
            registration_date: None,
            last_package_date: None,
            profile_completed: false,
            membership_completed: false,
            booking_completed: false,
            membership_details: None,
            booking_details: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn is_female(&self) -> bool {
        self.gender.map_or(false, |g| g.is_female())
    }

    /// Whole years completed at `on`.
    pub fn age_on(&self, on: NaiveDate) -> Option<i32> {
        self.date_of_birth.map(|dob| age_between(dob, on))
    }

    /// The member as clients may see it: everything except credentials and
    /// OTP state.
    pub fn public_profile(&self) -> serde_json::Value {
        json!({
            "id": self.id.map(|id| id.to_hex()),
            "email": self.email,
            "fullName": self.full_name,
            "phoneNumber": self.phone_number,
            "gender": self.gender,
            "dateOfBirth": self.date_of_birth,
            "memberId": self.member_id,
            "avatar": self.avatar,
            "isEmailVerified": self.is_email_verified,
            "isActive": self.is_active,
            "registrationDate": self.registration_date,
            "lastPackageDate": self.last_package_date,
            "profileCompleted": self.profile_completed,
            "membershipCompleted": self.membership_completed,
            "bookingCompleted": self.booking_completed,
            "membershipDetails": self.membership_details,
            "bookingDetails": self.booking_details,
        })
    }
}

/// Background details collected by the membership step of the wizard. All
/// answers are free text from the form; presence is enforced by the route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipDetails {
    pub visited_before: String,
    pub father_name: String,
    pub parent_contact_number: String,
    pub educational_background: String,
    pub current_occupation: String,
    pub current_address: String,
    pub job_title: String,
    pub exam_preparation: String,
    pub examination_date: String,
    pub study_room_duration: String,
    pub selfie_photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

/// The accepted booking, priced and waiting for (or holding) its payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub membership_type: Venue,
    pub time_slot: TimeSlot,
    pub membership_duration: MembershipDuration,
    pub membership_start_date: NaiveDate,
    pub membership_end_date: NaiveDate,
    pub preferred_seat: SeatId,
    pub seat_tier: SeatTier,
    pub price_breakdown: PriceBreakdown,
    pub total_amount: i64,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
}
