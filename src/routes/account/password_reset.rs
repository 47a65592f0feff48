use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use mongodb::{bson::doc, Client};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::booking::funnel::OtpChallenge;
use crate::db::mongo;
use crate::models::member::Member;
use crate::routes::account::auth::{eligibility_response, is_strong_password};
use crate::services::email_service::EmailService;

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyResetOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

async fn load_resettable_member(
    members: &mongodb::Collection<Member>,
    email: &str,
) -> Result<Member, HttpResponse> {
    let member = match members.find_one(doc! { "email": email }).await {
        Ok(Some(member)) => member,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(json!({
                "success": false,
                "message": "Account not found"
            })));
        }
        Err(err) => {
            eprintln!("Failed to look up member: {:?}", err);
            return Err(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to process request"
            })));
        }
    };

    if member.password.is_none() {
        return Err(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "This account signs in with Google"
        })));
    }

    Ok(member)
}

// POST /api/auth/forgot-password
pub async fn forgot_password(
    data: web::Data<Arc<Client>>,
    input: web::Json<ForgotPasswordRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);
    let email = input.email.to_lowercase();
    let now = Utc::now();

    let mut member = match load_resettable_member(&members, &email).await {
        Ok(member) => member,
        Err(resp) => return resp,
    };

    let challenge = OtpChallenge::generate(now);
    member.otp_code = Some(challenge.code.clone());
    member.otp_expires = Some(challenge.expires_at);
    member.updated_at = Some(now);

    if let Err(err) = members.replace_one(doc! { "email": &email }, &member).await {
        eprintln!("Failed to store reset code: {:?}", err);
        return HttpResponse::InternalServerError().json(json!({
            "success": false,
            "message": "Failed to send reset code"
        }));
    }

    let email_service = match EmailService::new() {
        Ok(service) => service,
        Err(err) => {
            eprintln!("Failed to initialize email service: {}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to send reset code"
            }));
        }
    };

    match email_service
        .send_otp_email(&email, &challenge.code, "reset your password")
        .await
    {
        Ok(_) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Password reset code sent"
        })),
        Err(err) => {
            eprintln!("Failed to send reset email: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to send reset code"
            }))
        }
    }
}

// POST /api/auth/verify-reset-otp
pub async fn verify_reset_otp(
    data: web::Data<Arc<Client>>,
    input: web::Json<VerifyResetOtpRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);
    let email = input.email.to_lowercase();

    let member = match load_resettable_member(&members, &email).await {
        Ok(member) => member,
        Err(resp) => return resp,
    };

    let challenge = match OtpChallenge::of(&member) {
        Some(challenge) => challenge,
        None => {
            return HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": "No reset code was requested"
            }));
        }
    };

    // the code stays live until reset-password consumes it
    match challenge.verify(&input.otp, Utc::now()) {
        Ok(_) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Code verified, you can set a new password"
        })),
        Err(err) => eligibility_response(&err),
    }
}

// POST /api/auth/reset-password
pub async fn reset_password(
    data: web::Data<Arc<Client>>,
    input: web::Json<ResetPasswordRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);
    let email = input.email.to_lowercase();
    let now = Utc::now();

    let mut member = match load_resettable_member(&members, &email).await {
        Ok(member) => member,
        Err(resp) => return resp,
    };

    let challenge = match OtpChallenge::of(&member) {
        Some(challenge) => challenge,
        None => {
            return HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": "No reset code was requested"
            }));
        }
    };
    if let Err(err) = challenge.verify(&input.otp, now) {
        return eligibility_response(&err);
    }

    if !is_strong_password(&input.new_password) {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Password needs 8+ characters with upper, lower, digit and special",
            "field": "newPassword"
        }));
    }

    let hashed = match bcrypt::hash(&input.new_password, bcrypt::DEFAULT_COST) {
        Ok(hashed) => hashed,
        Err(err) => {
            eprintln!("Failed to hash new password: {:?}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to reset password"
            }));
        }
    };

    member.password = Some(hashed);
    member.otp_code = None;
    member.otp_expires = None;
    member.updated_at = Some(now);

    match members.replace_one(doc! { "email": &email }, &member).await {
        Ok(_) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Password has been reset"
        })),
        Err(err) => {
            eprintln!("Failed to save new password: {:?}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to reset password"
            }))
        }
    }
}
