use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use mongodb::Client;
use serde_json::json;
use std::sync::Arc;

use crate::booking::validator::validate_selection;
use crate::db::mongo;
use crate::middleware::auth::AuthenticatedMember;
use crate::models::booking::{BookingRequest, BookingSelection};
use crate::pricing::PricingConfig;
use crate::routes::account::membership::load_member;

// POST /api/pricing/quote
// Prices a selection for the signed-in member without persisting anything,
// so the booking screen can show live totals.
pub async fn quote(
    data: web::Data<Arc<Client>>,
    pricing: web::Data<PricingConfig>,
    auth: AuthenticatedMember,
    input: web::Json<BookingRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);
    let now = Utc::now();

    let member = match load_member(&members, &auth.member_oid).await {
        Ok(member) => member,
        Err(resp) => return resp,
    };

    let request = input.into_inner();
    let selection = BookingSelection {
        membership_type: request.membership_type,
        time_slot: request.time_slot,
        membership_duration: request.membership_duration,
        membership_start_date: request.membership_start_date,
        preferred_seat: request.preferred_seat,
        is_female: member.is_female(),
        registration_date: member.registration_date,
        last_package_date: member.last_package_date,
    };

    if let Err(err) = validate_selection(&pricing, &selection, now.date_naive()) {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": err.to_string(),
            "field": err.field()
        }));
    }

    match pricing.compute_price(&selection, now) {
        Ok(breakdown) => HttpResponse::Ok().json(json!({
            "success": true,
            "quote": breakdown,
            "membershipEndDate": request
                .membership_duration
                .end_date(request.membership_start_date)
        })),
        Err(err) => {
            eprintln!("Pricing failed for {}: {}", member.email, err);
            HttpResponse::UnprocessableEntity().json(json!({
                "success": false,
                "message": err.to_string()
            }))
        }
    }
}
