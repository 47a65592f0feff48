use actix_web::{web, HttpResponse, Responder};
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::booking::funnel::{self, EligibilityError, FunnelStage};
use crate::db::mongo;
use crate::middleware::auth::{AuthenticatedMember, Claims};
use crate::models::booking::Gender;
use crate::models::member::age_between;
use crate::services::email_service::EmailService;
use crate::services::member_id_service;

#[derive(Debug, Deserialize)]
pub struct CheckEmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPhoneRequest {
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    // email address, or a member ID starting with '@'
    pub email: String,
    pub password: String,
    pub remember_me: Option<bool>,
}

// POST /api/auth/check-email
pub async fn check_email(
    data: web::Data<Arc<Client>>,
    input: web::Json<CheckEmailRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);
    let email = input.email.to_lowercase();

    if !is_valid_email(&email) {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Invalid email address"
        }));
    }

    match members.find_one(doc! { "email": &email }).await {
        Ok(found) => HttpResponse::Ok().json(json!({
            "success": true,
            "exists": found.map_or(false, |m| m.profile_completed)
        })),
        Err(err) => {
            eprintln!("Failed to check email: {:?}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to check email"
            }))
        }
    }
}

// POST /api/auth/check-phone
pub async fn check_phone(
    data: web::Data<Arc<Client>>,
    input: web::Json<CheckPhoneRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);

    if !is_valid_phone(&input.phone_number) {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Phone number must be '+' followed by 10 to 15 digits"
        }));
    }

    match members
        .find_one(doc! { "phoneNumber": &input.phone_number })
        .await
    {
        Ok(found) => HttpResponse::Ok().json(json!({
            "success": true,
            "exists": found.is_some()
        })),
        Err(err) => {
            eprintln!("Failed to check phone number: {:?}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to check phone number"
            }))
        }
    }
}

// POST /api/auth/register
pub async fn register(
    data: web::Data<Arc<Client>>,
    input: web::Json<RegisterRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);
    let input = input.into_inner();
    let email = input.email.to_lowercase();
    let now = Utc::now();

    let mut member = match members.find_one(doc! { "email": &email }).await {
        Ok(Some(member)) => member,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "success": false,
                "message": "Please verify your email first"
            }));
        }
        Err(err) => {
            eprintln!("Failed to load member for registration: {:?}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to register"
            }));
        }
    };

    if let Err(err) = funnel::require_stage(&member, FunnelStage::EmailVerified) {
        return eligibility_response(&err);
    }
    if member.profile_completed {
        return HttpResponse::Conflict().json(json!({
            "success": false,
            "message": "Account already registered, please sign in"
        }));
    }

    if input.full_name.trim().is_empty() {
        return field_error("fullName", "Full name is required");
    }
    if !is_valid_phone(&input.phone_number) {
        return field_error(
            "phoneNumber",
            "Phone number must be '+' followed by 10 to 15 digits",
        );
    }
    if age_between(input.date_of_birth, now.date_naive()) < 13 {
        return field_error("dateOfBirth", "You must be at least 13 years old");
    }
    if !is_strong_password(&input.password) {
        return field_error(
            "password",
            "Password needs 8+ characters with upper, lower, digit and special",
        );
    }

    // another member may already own this phone number
    match members
        .find_one(doc! { "phoneNumber": &input.phone_number, "email": { "$ne": &email } })
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(json!({
                "success": false,
                "message": "Phone number is already in use",
                "field": "phoneNumber"
            }));
        }
        Ok(None) => {}
        Err(err) => {
            eprintln!("Failed to check phone uniqueness: {:?}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to register"
            }));
        }
    }

    let hashed = match bcrypt::hash(&input.password, bcrypt::DEFAULT_COST) {
        Ok(hashed) => hashed,
        Err(err) => {
            eprintln!("Failed to hash password: {:?}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to register"
            }));
        }
    };

    let assigned = match member_id_service::next_member_id(&client, now).await {
        Ok(assigned) => assigned,
        Err(err) => {
            eprintln!("Failed to allocate member ID: {:?}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to register"
            }));
        }
    };

    member.full_name = Some(input.full_name.trim().to_string());
    member.phone_number = Some(input.phone_number);
    member.gender = Some(input.gender);
    member.date_of_birth = Some(input.date_of_birth);
    member.password = Some(hashed);
    member.member_id = Some(assigned.member_id.clone());
    member.registration_month = Some(assigned.registration_month.clone());
    member.registration_number = Some(assigned.registration_number);
    member.registration_date = Some(now);
    member.profile_completed = true;
    member.otp_code = None;
    member.otp_expires = None;
    member.updated_at = Some(now);

    if let Err(err) = members
        .replace_one(doc! { "email": &member.email }, &member)
        .await
    {
        eprintln!("Failed to save registration: {:?}", err);
        return HttpResponse::InternalServerError().json(json!({
            "success": false,
            "message": "Failed to register"
        }));
    }

    // welcome mail is best effort, registration already happened
    match EmailService::new() {
        Ok(email_service) => {
            if let Err(err) = email_service
                .send_welcome_email(
                    &member.email,
                    member.full_name.as_deref().unwrap_or(""),
                    &assigned.member_id,
                )
                .await
            {
                eprintln!("Failed to send welcome email: {}", err);
            }
        }
        Err(err) => eprintln!("Email service unavailable: {}", err),
    }

    let member_oid = match member.id {
        Some(id) => id,
        None => {
            eprintln!("Registered member has no document id: {}", member.email);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to register"
            }));
        }
    };

    match generate_token(&member.email, member_oid, false) {
        Ok(token) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Registration completed",
            "token": token,
            "user": member.public_profile()
        })),
        Err(err) => {
            eprintln!("Failed to generate token: {:?}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Token generation failed"
            }))
        }
    }
}

// POST /api/auth/login
pub async fn login(data: web::Data<Arc<Client>>, input: web::Json<LoginRequest>) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);
    let input = input.into_inner();

    // '@SH...' means the member typed their ID instead of an email
    let filter = if input.email.starts_with('@') {
        doc! { "memberId": &input.email }
    } else {
        doc! { "email": input.email.to_lowercase() }
    };

    let mut member = match members.find_one(filter).await {
        Ok(Some(member)) => member,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "success": false,
                "message": "Account not found"
            }));
        }
        Err(err) => {
            eprintln!("Failed to load member for login: {:?}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to sign in"
            }));
        }
    };

    if !member.is_active {
        return HttpResponse::Forbidden().json(json!({
            "success": false,
            "message": "Account is deactivated"
        }));
    }
    if !member.is_email_verified {
        return HttpResponse::Forbidden().json(json!({
            "success": false,
            "message": "Please verify your email first"
        }));
    }

    let stored_hash = match &member.password {
        Some(hash) => hash.clone(),
        None => {
            return HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": "This account signs in with Google"
            }));
        }
    };

    if !bcrypt::verify(&input.password, &stored_hash).unwrap_or(false) {
        return HttpResponse::Unauthorized().json(json!({
            "success": false,
            "message": "Invalid credentials"
        }));
    }

    let now = Utc::now();
    member.last_login = Some(now);
    member.updated_at = Some(now);
    if let Err(err) = members
        .replace_one(doc! { "email": &member.email }, &member)
        .await
    {
        eprintln!("Failed to record login time: {:?}", err);
    }

    let member_oid = match member.id {
        Some(id) => id,
        None => {
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to sign in"
            }));
        }
    };

    match generate_token(&member.email, member_oid, input.remember_me.unwrap_or(false)) {
        Ok(token) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Signed in",
            "token": token,
            "user": member.public_profile()
        })),
        Err(err) => {
            eprintln!("Failed to generate token: {:?}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Token generation failed"
            }))
        }
    }
}

// GET /api/auth/me
pub async fn me(data: web::Data<Arc<Client>>, auth: AuthenticatedMember) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);

    let member_oid = match ObjectId::parse_str(&auth.member_oid) {
        Ok(oid) => oid,
        Err(_) => {
            return HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": "Invalid member ID"
            }));
        }
    };

    match members.find_one(doc! { "_id": member_oid }).await {
        Ok(Some(member)) => HttpResponse::Ok().json(json!({
            "success": true,
            "user": member.public_profile(),
            "funnelStage": FunnelStage::of(&member).to_string()
        })),
        Ok(None) => HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "Account not found"
        })),
        Err(err) => {
            eprintln!("Failed to fetch member: {:?}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to fetch profile"
            }))
        }
    }
}

// POST /api/auth/logout
pub async fn logout(_auth: AuthenticatedMember) -> impl Responder {
    // tokens are stateless; the client drops its copy
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Signed out"
    }))
}

pub fn is_valid_email(email: &str) -> bool {
    let re = regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
    );
    re.map_or(false, |re| re.is_match(email))
}

pub fn is_valid_phone(phone: &str) -> bool {
    let re = regex::Regex::new(r"^\+\d{10,15}$");
    re.map_or(false, |re| re.is_match(phone))
}

// 8+ chars with at least one lower, upper, digit and special character
pub fn is_strong_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

pub fn generate_token(
    email: &str,
    member_oid: ObjectId,
    remember_me: bool,
) -> Result<String, jsonwebtoken::errors::Error> {
    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let now = Utc::now();
    let validity = if remember_me {
        Duration::days(30)
    } else {
        Duration::days(7)
    };

    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + validity).timestamp() as usize,
        user_id: member_oid.to_hex(),
    };

    let header = Header::new(Algorithm::HS256);
    encode(&header, &claims, &EncodingKey::from_secret(secret.as_ref()))
}

pub fn eligibility_response(err: &EligibilityError) -> HttpResponse {
    let body = json!({ "success": false, "message": err.to_string() });
    match err {
        EligibilityError::StageRequired { .. } => HttpResponse::Conflict().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn field_error(field: &str, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "success": false,
        "message": message,
        "field": field
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("member@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn phone_shapes() {
        assert!(is_valid_phone("+911234567890"));
        assert!(is_valid_phone("+123456789012345"));
        assert!(!is_valid_phone("+123456789")); // 9 digits
        assert!(!is_valid_phone("911234567890")); // no plus
        assert!(!is_valid_phone("+12 34567890"));
    }

    #[test]
    fn password_strength() {
        assert!(is_strong_password("Str0ng!pass"));
        assert!(!is_strong_password("Sh0rt!a")); // 7 chars
        assert!(!is_strong_password("alllower1!"));
        assert!(!is_strong_password("ALLUPPER1!"));
        assert!(!is_strong_password("NoDigits!!"));
        assert!(!is_strong_password("NoSpecial11"));
    }
}
