use chrono::{DateTime, Datelike, Utc};
use mongodb::{bson::doc, Client};

use crate::db::mongo;

/// Identity assigned when registration completes.
#[derive(Debug, Clone)]
pub struct AssignedMemberId {
    pub member_id: String,
    pub registration_month: String,
    pub registration_number: i32,
}

fn format_member_id(month: &str, sequence: i32) -> String {
    format!("@SH{}{:03}", month, sequence)
}

/// Allocate the next member ID for the month of `now`: `@SH` + `YYYYMM` +
/// a 3-digit sequence that restarts every month. The sequence comes from the
/// highest number already issued this month.
pub async fn next_member_id(
    client: &Client,
    now: DateTime<Utc>,
) -> Result<AssignedMemberId, mongodb::error::Error> {
    let registration_month = format!("{}{:02}", now.year(), now.month());

    let members = mongo::members(client);
    let latest = members
        .find_one(doc! { "registrationMonth": &registration_month })
        .sort(doc! { "registrationNumber": -1 })
        .await?;

    let registration_number = latest.and_then(|m| m.registration_number).unwrap_or(0) + 1;
    let member_id = format_member_id(&registration_month, registration_number);

    Ok(AssignedMemberId {
        member_id,
        registration_month,
        registration_number,
    })
}
