pub mod booking;
pub mod google_auth;
pub mod member;
