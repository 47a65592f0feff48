pub mod funnel;
pub mod validator;

pub use funnel::{require_stage, EligibilityError, FunnelStage, OtpChallenge};
pub use validator::{validate_selection, ValidationError};
