use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;

pub const TEST_JWT_SECRET: &str = "test_jwt_secret";

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    exp: usize,
    iat: usize,
    user_id: String,
}

pub fn install_test_jwt_secret() {
    std::env::set_var("JWT_SECRET", TEST_JWT_SECRET);
}

pub fn get_test_email() -> String {
    "test@example.com".to_string()
}

pub fn get_test_member_oid() -> String {
    "507f1f77bcf86cd799439011".to_string()
}

/// A Bearer token the auth middleware will accept, shaped like the ones
/// the login route hands out.
pub fn bearer_token() -> String {
    bearer_token_expiring_in(3600)
}

/// Same, but with a chosen lifetime so expiry behaviour can be exercised.
pub fn bearer_token_expiring_in(seconds: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = TestClaims {
        sub: get_test_email(),
        iat: now as usize,
        exp: (now + seconds) as usize,
        user_id: get_test_member_oid(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode test token");

    format!("Bearer {}", token)
}

/// A token signed with the wrong key; decoding it must fail.
pub fn forged_bearer_token() -> String {
    let now = Utc::now().timestamp();
    let claims = TestClaims {
        sub: get_test_email(),
        iat: now as usize,
        exp: (now + 3600) as usize,
        user_id: get_test_member_oid(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"some_other_secret"),
    )
    .expect("failed to encode forged token");

    format!("Bearer {}", token)
}
