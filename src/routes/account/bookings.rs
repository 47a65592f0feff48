use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use mongodb::bson::doc;
use mongodb::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::booking::funnel::{self, FunnelStage};
use crate::booking::validator::validate_selection;
use crate::db::mongo;
use crate::middleware::auth::AuthenticatedMember;
use crate::models::booking::{BookingRequest, BookingSelection};
use crate::models::member::{BookingDetails, PaymentStatus};
use crate::pricing::PricingConfig;
use crate::routes::account::auth::eligibility_response;
use crate::routes::account::membership::load_member;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBookingRequest {
    pub booking_details: BookingRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub payment_id: String,
    pub payment_status: PaymentStatus,
}

// POST /api/account/booking
pub async fn submit_booking(
    data: web::Data<Arc<Client>>,
    pricing: web::Data<PricingConfig>,
    auth: AuthenticatedMember,
    input: web::Json<SubmitBookingRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);
    let now = Utc::now();

    let mut member = match load_member(&members, &auth.member_oid).await {
        Ok(member) => member,
        Err(resp) => return resp,
    };

    if let Err(err) = funnel::require_stage(&member, FunnelStage::MembershipComplete) {
        return eligibility_response(&err);
    }

    // a booking that is already paid for can only be replaced by a renewal;
    // an unpaid one may be rechosen freely
    let request = input.into_inner().booking_details;

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

    let breakdown = match pricing.compute_price(&selection, now) {
        Ok(breakdown) => breakdown,
        Err(err) => {
            eprintln!("Pricing failed for {}: {}", member.email, err);
            return HttpResponse::UnprocessableEntity().json(json!({
                "success": false,
                "message": err.to_string()
            }));
        }
    };

    let membership_end_date = request
        .membership_duration
        .end_date(request.membership_start_date);

    member.booking_details = Some(BookingDetails {
        membership_type: request.membership_type,
        time_slot: request.time_slot,
        membership_duration: request.membership_duration,
        membership_start_date: request.membership_start_date,
        membership_end_date,
        preferred_seat: request.preferred_seat,
        seat_tier: breakdown.seat_tier,
        total_amount: breakdown.final_amount,
        price_breakdown: breakdown.clone(),
        payment_status: PaymentStatus::Pending,
        payment_id: None,
        payment_date: None,
    });
    member.booking_completed = false;
    member.updated_at = Some(now);

    match members
        .replace_one(doc! { "email": &member.email }, &member)
        .await
    {
        Ok(_) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Booking saved, awaiting payment",
            "paymentAmount": breakdown.final_amount,
            "priceBreakdown": breakdown,
            "user": member.public_profile()
        })),
        Err(err) => {
            eprintln!("Failed to save booking: {:?}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to save booking"
            }))
        }
    }
}

// GET /api/account/booking
pub async fn get_booking(data: web::Data<Arc<Client>>, auth: AuthenticatedMember) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);

    let member = match load_member(&members, &auth.member_oid).await {
        Ok(member) => member,
        Err(resp) => return resp,
    };

    match &member.booking_details {
        Some(details) => HttpResponse::Ok().json(json!({
            "success": true,
            "bookingDetails": details,
            "funnelStage": FunnelStage::of(&member).to_string()
        })),
        None => HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "No booking found"
        })),
    }
}

// POST /api/account/payment
pub async fn record_payment(
    data: web::Data<Arc<Client>>,
    auth: AuthenticatedMember,
    input: web::Json<RecordPaymentRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);
    let now = Utc::now();
    let input = input.into_inner();

    let mut member = match load_member(&members, &auth.member_oid).await {
        Ok(member) => member,
        Err(resp) => return resp,
    };

    if let Err(err) = funnel::require_stage(&member, FunnelStage::BookingComplete) {
        return eligibility_response(&err);
    }

    let mut details = match member.booking_details.take() {
        Some(details) => details,
        None => {
            return HttpResponse::NotFound().json(json!({
                "success": false,
                "message": "No booking found"
            }));
        }
    };

    if details.payment_status == PaymentStatus::Completed {
        return HttpResponse::Conflict().json(json!({
            "success": false,
            "message": "Payment already recorded"
        }));
    }
    if input.payment_status == PaymentStatus::Pending {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Payment status must be completed or failed"
        }));
    }

    details.payment_status = input.payment_status;
    details.payment_id = Some(input.payment_id);

    if input.payment_status == PaymentStatus::Completed {
        details.payment_date = Some(now);
        member.booking_completed = true;
        // the paid package anchors the next registration-fee window
        member.last_package_date = Some(now);
    }

    member.booking_details = Some(details);
    member.updated_at = Some(now);

    match members
        .replace_one(doc! { "email": &member.email }, &member)
        .await
    {
        Ok(_) => {
            let message = if member.booking_completed {
                "Payment recorded, booking complete"
            } else {
                "Payment failure recorded"
            };
            HttpResponse::Ok().json(json!({
                "success": true,
                "message": message,
                "user": member.public_profile()
            }))
        }
        Err(err) => {
            eprintln!("Failed to record payment: {:?}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to record payment"
            }))
        }
    }
}
