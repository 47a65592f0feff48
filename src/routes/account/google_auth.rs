use actix_web::{http::header, web, HttpResponse, Responder};
use chrono::Utc;
use mongodb::bson::doc;
use mongodb::Client;
use oauth2::AuthorizationCode;
use std::sync::Arc;

use crate::db::mongo;
use crate::models::google_auth::GoogleAuthCallbackParams;
use crate::models::member::Member;
use crate::routes::account::auth::generate_token;
use crate::services::google_auth_service::{
    create_google_oauth_client, fetch_verified_profile, get_google_auth_url, GoogleAuthError,
};

// GET /api/auth/google
pub async fn google_auth_init() -> impl Responder {
    println!("Initiating Google OAuth flow...");
    let client = create_google_oauth_client();
    let (auth_url, _csrf_token) = get_google_auth_url(&client);

    // TODO: keep the CSRF token in an encrypted cookie and check it in the callback
    HttpResponse::Found()
        .insert_header((header::LOCATION, auth_url.to_string()))
        .finish()
}

// GET /api/auth/google/callback
pub async fn google_auth_callback(
    data: web::Data<Arc<Client>>,
    query: web::Query<GoogleAuthCallbackParams>,
) -> impl Responder {
    if let Some(error) = &query.error {
        eprintln!("OAuth error received: {}", error);
        return HttpResponse::BadRequest().body(format!("OAuth error: {}", error));
    }

    let oauth_client = create_google_oauth_client();
    let code = AuthorizationCode::new(query.code.clone());

    let user_info = match fetch_verified_profile(&oauth_client, code).await {
        Ok(info) => info,
        Err(e @ GoogleAuthError::UnverifiedAddress(_)) => {
            eprintln!("Google sign-in refused: {}", e);
            return HttpResponse::BadRequest().body(format!("{}", e));
        }
        Err(e) => {
            eprintln!("Google sign-in failed: {}", e);
            return HttpResponse::InternalServerError().body(format!("Sign-in error: {}", e));
        }
    };

    let db_client = data.into_inner();
    let members = mongo::members(&db_client);
    let email = user_info.email.to_lowercase();
    let now = Utc::now();

    let member = match members.find_one(doc! { "email": &email }).await {
        Ok(Some(mut existing)) => {
            existing.google_id = Some(user_info.id.clone());
            if existing.avatar.is_none() {
                existing.avatar = user_info.picture.clone();
            }
            if existing.full_name.is_none() {
                existing.full_name = user_info.display_name();
            }
            // Google vouched for the address
            existing.is_email_verified = true;
            existing.last_login = Some(now);
            existing.updated_at = Some(now);

            if let Err(err) = members.replace_one(doc! { "email": &email }, &existing).await {
                eprintln!("Failed to update member after Google sign-in: {:?}", err);
                return HttpResponse::InternalServerError().body("Failed to update member");
            }
            existing
        }
        Ok(None) => {
            let mut member = Member::pending(&email, now);
            member.google_id = Some(user_info.id.clone());
            member.full_name = user_info.display_name();
            member.avatar = user_info.picture.clone();
            member.is_email_verified = true;
            member.last_login = Some(now);

            match members.insert_one(&member).await {
                Ok(result) => {
                    member.id = result.inserted_id.as_object_id();
                    member
                }
                Err(err) => {
                    eprintln!("Failed to create member from Google sign-in: {:?}", err);
                    return HttpResponse::InternalServerError().body("Failed to create member");
                }
            }
        }
        Err(err) => {
            eprintln!("Database error: {:?}", err);
            return HttpResponse::InternalServerError().body("Database error");
        }
    };

    let member_oid = match member.id {
        Some(id) => id,
        None => {
            eprintln!("Member record has no document id: {}", member.email);
            return HttpResponse::InternalServerError().body("Failed to sign in");
        }
    };

    match generate_token(&member.email, member_oid, false) {
        Ok(token) => {
            let frontend_url =
                std::env::var("FRONTEND_URL").unwrap_or("http://localhost:3000".to_string());
            let redirect_url = format!("{}/?token={}", frontend_url, token);

            HttpResponse::Found()
                .insert_header((header::LOCATION, redirect_url))
                .finish()
        }
        Err(_) => HttpResponse::InternalServerError().body("Failed to generate token"),
    }
}
