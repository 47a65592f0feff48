use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::booking::funnel::{self, FunnelStage};
use crate::db::mongo;
use crate::middleware::auth::AuthenticatedMember;
use crate::models::member::{Member, MembershipDetails};
use crate::routes::account::auth::eligibility_response;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRequest {
    pub membership_details: MembershipDetails,
}

pub(crate) async fn load_member(
    members: &mongodb::Collection<Member>,
    member_oid: &str,
) -> Result<Member, HttpResponse> {
    let oid = match ObjectId::parse_str(member_oid) {
        Ok(oid) => oid,
        Err(_) => {
            return Err(HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": "Invalid member ID"
            })));
        }
    };

    match members.find_one(doc! { "_id": oid }).await {
        Ok(Some(member)) => Ok(member),
        Ok(None) => Err(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "Account not found"
        }))),
        Err(err) => {
            eprintln!("Failed to load member: {:?}", err);
            Err(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to load account"
            })))
        }
    }
}

// POST /api/account/membership
pub async fn submit_membership(
    data: web::Data<Arc<Client>>,
    auth: AuthenticatedMember,
    input: web::Json<MembershipRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let members = mongo::members(&client);
    let now = Utc::now();

    let mut member = match load_member(&members, &auth.member_oid).await {
        Ok(member) => member,
        Err(resp) => return resp,
    };

    if let Err(err) = funnel::require_stage(&member, FunnelStage::ProfileComplete) {
        return eligibility_response(&err);
    }
    if member.booking_details.is_some() {
        return HttpResponse::Conflict().json(json!({
            "success": false,
            "message": "Membership details are locked once a booking exists"
        }));
    }

    let details = input.into_inner().membership_details;
    if let Some(field) = first_missing_field(&details) {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "All membership details are required",
            "field": field
        }));
    }

    member.membership_details = Some(details);
    member.membership_completed = true;
    member.updated_at = Some(now);

    match members
        .replace_one(doc! { "email": &member.email }, &member)
        .await
    {
        Ok(_) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Membership details saved",
            "user": member.public_profile()
        })),
        Err(err) => {
            eprintln!("Failed to save membership details: {:?}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to save membership details"
            }))
        }
    }
}

/// First required answer that came in blank, by wire field name.
fn first_missing_field(details: &MembershipDetails) -> Option<&'static str> {
    let required = [
        ("visitedBefore", &details.visited_before),
        ("fatherName", &details.father_name),
        ("parentContactNumber", &details.parent_contact_number),
        ("educationalBackground", &details.educational_background),
        ("currentOccupation", &details.current_occupation),
        ("currentAddress", &details.current_address),
        ("jobTitle", &details.job_title),
        ("examPreparation", &details.exam_preparation),
        ("examinationDate", &details.examination_date),
        ("studyRoomDuration", &details.study_room_duration),
    ];
    required
        .iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_details() -> MembershipDetails {
        MembershipDetails {
            visited_before: "no".to_string(),
            father_name: "R. Sharma".to_string(),
            parent_contact_number: "+911234567890".to_string(),
            educational_background: "B.Sc.".to_string(),
            current_occupation: "student".to_string(),
            current_address: "12 Park Lane".to_string(),
            job_title: "none".to_string(),
            exam_preparation: "UPSC".to_string(),
            examination_date: "2025-09-01".to_string(),
            study_room_duration: "6 Months".to_string(),
            selfie_photo_url: None,
        }
    }

    #[test]
    fn complete_details_pass() {
        assert_eq!(first_missing_field(&complete_details()), None);
    }

    #[test]
    fn blank_answers_are_reported_by_field() {
        let mut details = complete_details();
        details.father_name = "  ".to_string();
        assert_eq!(first_missing_field(&details), Some("fatherName"));

        let mut details = complete_details();
        details.study_room_duration = String::new();
        assert_eq!(first_missing_field(&details), Some("studyRoomDuration"));
    }

    #[test]
    fn selfie_stays_optional() {
        let mut details = complete_details();
        details.selfie_photo_url = Some("https://cdn.example.com/selfie.jpg".to_string());
        assert_eq!(first_missing_field(&details), None);
    }
}
