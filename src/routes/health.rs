use actix_web::{web, HttpResponse, Responder};
use mongodb::{bson::doc, Client};
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use crate::db::mongo;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(client: web::Data<Arc<Client>>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    // Check MongoDB connection
    let mongo_result = check_mongodb(&client).await;
    health
        .services
        .insert("mongodb".to_string(), mongo_result.clone());

    // Check SendGrid (just validate key existence for now)
    let sendgrid_result = check_sendgrid();
    health
        .services
        .insert("sendgrid".to_string(), sendgrid_result.clone());

    // Check Google Auth API connection
    let google_auth_result = check_google_auth();
    health
        .services
        .insert("google_auth".to_string(), google_auth_result.clone());

    // Determine overall status (if any service is not ok, the overall status is degraded)
    if mongo_result.status != "ok"
        || sendgrid_result.status != "ok"
        || google_auth_result.status != "ok"
    {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_mongodb(client: &web::Data<Arc<Client>>) -> ServiceStatus {
    match client
        .database(mongo::DB_NAME)
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("Connected successfully to MongoDB".to_string()),
        },
        Err(e) => {
            // Log error for internal visibility
            eprintln!("MongoDB health check failed: {}", e);

            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to connect: {}", e)),
            }
        }
    }
}

fn check_sendgrid() -> ServiceStatus {
    // Just validate key existence for basic check
    // In a more comprehensive check, you could make a test API call
    match env::var("SENDGRID_API_KEY") {
        Ok(key) => {
            let masked_key = if key.len() > 8 {
                format!("{}***{}", &key[0..4], &key[key.len() - 4..])
            } else {
                "***".to_string()
            };

            ServiceStatus {
                status: "ok".to_string(),
                details: Some(format!("SendGrid API key configured ({})", masked_key)),
            }
        }
        Err(_) => ServiceStatus {
            status: "error".to_string(),
            details: Some("SENDGRID_API_KEY not configured".to_string()),
        },
    }
}

fn check_google_auth() -> ServiceStatus {
    // Check if required environment variables are set
    let client_id = env::var("GOOGLE_CLIENT_ID").ok();
    let client_secret = env::var("GOOGLE_CLIENT_SECRET").ok();
    let redirect_uri = env::var("GOOGLE_REDIRECT_URI").ok();

    match (client_id, client_secret, redirect_uri) {
        (Some(id), Some(_), Some(redirect)) => {
            let masked_id = if id.len() > 8 {
                format!("{}...{}", &id[0..6], &id[id.len() - 4..])
            } else {
                "***".to_string()
            };

            ServiceStatus {
                status: "ok".to_string(),
                details: Some(format!(
                    "Google Auth configured, Client ID: {}, Redirect: {}",
                    masked_id, redirect
                )),
            }
        }
        (client_id, client_secret, redirect_uri) => {
            let mut missing = Vec::new();

            if client_id.is_none() {
                missing.push("GOOGLE_CLIENT_ID");
            }
            if client_secret.is_none() {
                missing.push("GOOGLE_CLIENT_SECRET");
            }
            if redirect_uri.is_none() {
                missing.push("GOOGLE_REDIRECT_URI");
            }

            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Missing configuration: {}", missing.join(", "))),
            }
        }
    }
}
