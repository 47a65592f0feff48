pub mod auth;
pub mod bookings;
pub mod email_verification;
pub mod google_auth;
pub mod membership;
pub mod password_reset;
