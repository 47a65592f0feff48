use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use mongodb::{bson::doc, Client};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::booking::funnel::OtpChallenge;
use crate::db::mongo;
use crate::models::member::Member;
use crate::routes::account::auth::{eligibility_response, is_valid_email};
use crate::services::email_service::EmailService;

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

// POST /api/auth/send-otp
pub async fn send_otp(
    data: web::Data<Arc<Client>>,
    input: web::Json<SendOtpRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);
    let email = input.email.to_lowercase();
    let now = Utc::now();

    if !is_valid_email(&email) {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Invalid email address"
        }));
    }

    let existing = match members.find_one(doc! { "email": &email }).await {
        Ok(existing) => existing,
        Err(err) => {
            eprintln!("Failed to look up email: {:?}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to send verification code"
            }));
        }
    };

    if let Some(member) = &existing {
        if member.is_email_verified {
            let message = if member.profile_completed {
                "Account already registered, please sign in"
            } else {
                "Email already verified, please continue with registration"
            };
            return HttpResponse::Conflict().json(json!({
                "success": false,
                "message": message
            }));
        }
    }

    // a resend always issues a fresh code, the old one dies here
    let challenge = OtpChallenge::generate(now);

    let result = match existing {
        Some(mut member) => {
            member.otp_code = Some(challenge.code.clone());
            member.otp_expires = Some(challenge.expires_at);
            member.updated_at = Some(now);
            members
                .replace_one(doc! { "email": &email }, &member)
                .await
                .map(|_| ())
        }
        None => {
            let mut member = Member::pending(&email, now);
            member.otp_code = Some(challenge.code.clone());
            member.otp_expires = Some(challenge.expires_at);
            members.insert_one(&member).await.map(|_| ())
        }
    };

    if let Err(err) = result {
        eprintln!("Failed to store verification code: {:?}", err);
        return HttpResponse::InternalServerError().json(json!({
            "success": false,
            "message": "Failed to send verification code"
        }));
    }

    let email_service = match EmailService::new() {
        Ok(service) => service,
        Err(err) => {
            eprintln!("Failed to initialize email service: {}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to send verification code"
            }));
        }
    };

    match email_service
        .send_otp_email(&email, &challenge.code, "verify your email")
        .await
    {
        Ok(_) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Verification code sent"
        })),
        Err(err) => {
            eprintln!("Failed to send verification email: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to send verification code"
            }))
        }
    }
}

// POST /api/auth/verify-otp
pub async fn verify_otp(
    data: web::Data<Arc<Client>>,
    input: web::Json<VerifyOtpRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);
    let email = input.email.to_lowercase();
    let now = Utc::now();

    let mut member = match members.find_one(doc! { "email": &email }).await {
        Ok(Some(member)) => member,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "success": false,
                "message": "No verification was requested for this email"
            }));
        }
        Err(err) => {
            eprintln!("Failed to look up email: {:?}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to verify code"
            }));
        }
    };

    if member.is_email_verified {
        return HttpResponse::Conflict().json(json!({
            "success": false,
            "message": "Email already verified"
        }));
    }

    let challenge = match OtpChallenge::of(&member) {
        Some(challenge) => challenge,
        None => {
            return HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": "No verification code was requested"
            }));
        }
    };

    if let Err(err) = challenge.verify(&input.otp, now) {
        return eligibility_response(&err);
    }

    member.is_email_verified = true;
    member.otp_code = None;
    member.otp_expires = None;
    member.updated_at = Some(now);

    match members.replace_one(doc! { "email": &email }, &member).await {
        Ok(_) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Email verified"
        })),
        Err(err) => {
            eprintln!("Failed to save verification: {:?}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to verify code"
            }))
        }
    }
}
