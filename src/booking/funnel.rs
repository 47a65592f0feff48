use crate::models::member::Member;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::fmt;

/// Stages of the signup wizard, in order. A member is always at exactly one
/// stage, derived from the persisted flags; routes gate on the predecessor
/// stage so nothing can be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FunnelStage {
    EmailPending,
    EmailVerified,
    ProfileComplete,
    MembershipComplete,
    BookingComplete,
    PaymentComplete,
}

impl FunnelStage {
    /// Derive the member's current stage. `booking_completed` is set only
    /// when the payment clears, so a priced booking awaiting payment sits at
    /// `BookingComplete`.
    pub fn of(member: &Member) -> FunnelStage {
        if member.booking_completed {
            FunnelStage::PaymentComplete
        } else if member.booking_details.is_some() {
            FunnelStage::BookingComplete
        } else if member.membership_completed {
            FunnelStage::MembershipComplete
        } else if member.profile_completed {
            FunnelStage::ProfileComplete
        } else if member.is_email_verified {
            FunnelStage::EmailVerified
        } else {
            FunnelStage::EmailPending
        }
    }

    /// Step the member has to finish to get past this stage, for error
    /// messages.
    fn step_name(&self) -> &'static str {
        match self {
            FunnelStage::EmailPending => "verify your email",
            FunnelStage::EmailVerified => "complete your profile",
            FunnelStage::ProfileComplete => "submit your membership details",
            FunnelStage::MembershipComplete => "choose your booking",
            FunnelStage::BookingComplete => "complete your payment",
            FunnelStage::PaymentComplete => "payment",
        }
    }
}

impl fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunnelStage::EmailPending => write!(f, "email pending"),
            FunnelStage::EmailVerified => write!(f, "email verified"),
            FunnelStage::ProfileComplete => write!(f, "profile complete"),
            FunnelStage::MembershipComplete => write!(f, "membership complete"),
            FunnelStage::BookingComplete => write!(f, "booking complete"),
            FunnelStage::PaymentComplete => write!(f, "payment complete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityError {
    StageRequired {
        required: FunnelStage,
        current: FunnelStage,
    },
    NoPendingOtp,
    OtpMismatch,
    OtpExpired,
}

impl fmt::Display for EligibilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EligibilityError::StageRequired { current, .. } => {
                write!(f, "please {} first", current.step_name())
            }
            EligibilityError::NoPendingOtp => write!(f, "no verification code was requested"),
            EligibilityError::OtpMismatch => write!(f, "invalid verification code"),
            EligibilityError::OtpExpired => {
                write!(f, "verification code has expired, please request a new one")
            }
        }
    }
}

impl std::error::Error for EligibilityError {}

/// Require the member to have reached `required` (or further). Returns the
/// gate error naming the step still missing.
pub fn require_stage(member: &Member, required: FunnelStage) -> Result<(), EligibilityError> {
    let current = FunnelStage::of(member);
    if current < required {
        return Err(EligibilityError::StageRequired { required, current });
    }
    Ok(())
}

/// A one-time code sent by email. Codes are six digits, live for thirty
/// minutes and are replaced (never extended) when the member asks again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl OtpChallenge {
    pub const VALIDITY_MINUTES: i64 = 30;

    pub fn generate(now: DateTime<Utc>) -> Self {
        let code = rand::thread_rng().gen_range(100_000..1_000_000);
        OtpChallenge {
            code: code.to_string(),
            expires_at: now + Duration::minutes(Self::VALIDITY_MINUTES),
        }
    }

    /// Rebuild the pending challenge from the persisted member fields.
    pub fn of(member: &Member) -> Option<OtpChallenge> {
        match (&member.otp_code, member.otp_expires) {
            (Some(code), Some(expires_at)) => Some(OtpChallenge {
                code: code.clone(),
                expires_at,
            }),
            _ => None,
        }
    }

    /// Check a submitted code. Expiry wins over mismatch: an expired code is
    /// reported as expired even when the digits are right.
    pub fn verify(&self, code: &str, now: DateTime<Utc>) -> Result<(), EligibilityError> {
        if now > self.expires_at {
            return Err(EligibilityError::OtpExpired);
        }
        if self.code != code {
            return Err(EligibilityError::OtpMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{MembershipDuration, TimeSlot, Venue};
    use crate::models::member::{BookingDetails, PaymentStatus};
    use crate::pricing::composer::PriceBreakdown;
    use crate::pricing::seating::SeatTier;
    use chrono::NaiveDate;

    fn booking_details() -> BookingDetails {
        BookingDetails {
            membership_type: Venue::StandardHall,
            time_slot: TimeSlot::DayBatch,
            membership_duration: MembershipDuration::OneMonth,
            membership_start_date: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
            membership_end_date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap(),
            preferred_seat: "B6".parse().unwrap(),
            seat_tier: SeatTier::Standard,
            price_breakdown: PriceBreakdown {
                base_price: 999,
                seat_tier: SeatTier::Standard,
                seat_tier_surcharge: 0,
                price_with_seat_tier: 999,
                discount_percentage: 0,
                discount_amount: 0,
                registration_fee: 300,
                final_amount: 1299,
            },
            total_amount: 1299,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            payment_date: None,
        }
    }

    #[test]
    fn stages_progress_with_the_flags() {
        let mut member = Member::pending("m@example.com", Utc::now());
        assert_eq!(FunnelStage::of(&member), FunnelStage::EmailPending);

        member.is_email_verified = true;
        assert_eq!(FunnelStage::of(&member), FunnelStage::EmailVerified);

        member.profile_completed = true;
        assert_eq!(FunnelStage::of(&member), FunnelStage::ProfileComplete);

        member.membership_completed = true;
        assert_eq!(FunnelStage::of(&member), FunnelStage::MembershipComplete);

        member.booking_details = Some(booking_details());
        assert_eq!(FunnelStage::of(&member), FunnelStage::BookingComplete);

        member.booking_completed = true;
        assert_eq!(FunnelStage::of(&member), FunnelStage::PaymentComplete);
    }

    #[test]
    fn gates_reject_members_behind_the_required_stage() {
        let mut member = Member::pending("m@example.com", Utc::now());
        member.is_email_verified = true;

        assert!(require_stage(&member, FunnelStage::EmailVerified).is_ok());
        let err = require_stage(&member, FunnelStage::MembershipComplete).unwrap_err();
        assert!(matches!(
            err,
            EligibilityError::StageRequired {
                required: FunnelStage::MembershipComplete,
                current: FunnelStage::EmailVerified,
            }
        ));
        // the message names the step the member still has to do
        assert_eq!(err.to_string(), "please complete your profile first");
    }

    #[test]
    fn otp_codes_are_six_digits() {
        for _ in 0..50 {
            let otp = OtpChallenge::generate(Utc::now());
            assert_eq!(otp.code.len(), 6);
            assert!(otp.code.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn otp_expiry_beats_mismatch() {
        let issued = Utc::now();
        let otp = OtpChallenge::generate(issued);

        let in_time = issued + Duration::minutes(29);
        let too_late = issued + Duration::minutes(31);

        assert!(otp.verify(&otp.code, in_time).is_ok());
        assert_eq!(
            otp.verify("000000", in_time),
            Err(EligibilityError::OtpMismatch)
        );
        // right code, too late
        assert_eq!(
            otp.verify(&otp.code, too_late),
            Err(EligibilityError::OtpExpired)
        );
    }

    #[test]
    fn regeneration_replaces_code_and_expiry() {
        let first_issued = Utc::now();
        let first = OtpChallenge::generate(first_issued);
        let second_issued = first_issued + Duration::minutes(10);
        let second = OtpChallenge::generate(second_issued);

        assert_eq!(
            second.expires_at,
            second_issued + Duration::minutes(OtpChallenge::VALIDITY_MINUTES)
        );
        // the old challenge is gone once the member record is updated
        let mut member = Member::pending("m@example.com", first_issued);
        member.otp_code = Some(second.code.clone());
        member.otp_expires = Some(second.expires_at);
        let pending = OtpChallenge::of(&member).unwrap();
        assert_eq!(pending, second);
    }
}
