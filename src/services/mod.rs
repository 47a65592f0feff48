pub mod email_service;
pub mod google_auth_service;
pub mod member_id_service;
