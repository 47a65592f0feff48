use reqwest;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Serialize, Deserialize)]
pub struct SendGridEmail {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendGridPersonalization {
    pub to: Vec<SendGridEmail>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendGridContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendGridRequest {
    pub personalizations: Vec<SendGridPersonalization>,
    pub from: SendGridEmail,
    pub subject: String,
    pub content: Vec<SendGridContent>,
}

#[derive(Debug)]
pub enum EmailError {
    EnvironmentError(String),
    RequestError(String),
    ApiError(String),
}

impl std::fmt::Display for EmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailError::EnvironmentError(err) => write!(f, "Environment error: {}", err),
            EmailError::RequestError(err) => write!(f, "Request error: {}", err),
            EmailError::ApiError(err) => write!(f, "API error: {}", err),
        }
    }
}

impl std::error::Error for EmailError {}

/// All member-facing mail goes out through SendGrid's HTTP API.
pub struct EmailService {
    api_key: String,
    from_email: String,
    client: reqwest::Client,
}

impl EmailService {
    pub fn new() -> Result<Self, EmailError> {
        let api_key = env::var("SENDGRID_API_KEY")
            .map_err(|_| EmailError::EnvironmentError("SENDGRID_API_KEY not set".to_string()))?;
        let from_email = env::var("FROM_EMAIL")
            .unwrap_or_else(|_| "noreply@studyhall.example.com".to_string());

        let client = reqwest::Client::new();

        Ok(Self {
            api_key,
            from_email,
            client,
        })
    }

    async fn send_html_email(
        &self,
        to_email: &str,
        subject: &str,
        html_content: &str,
    ) -> Result<(), EmailError> {
        let url = "https://api.sendgrid.com/v3/mail/send";

        let request = SendGridRequest {
            personalizations: vec![SendGridPersonalization {
                to: vec![SendGridEmail {
                    email: to_email.to_string(),
                }],
            }],
            from: SendGridEmail {
                email: self.from_email.clone(),
            },
            subject: subject.to_string(),
            content: vec![SendGridContent {
                content_type: "text/html".to_string(),
                value: html_content.to_string(),
            }],
        };

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| EmailError::RequestError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(EmailError::ApiError(format!(
                "Status: {}, Body: {}",
                status, body
            )))
        }
    }

    /// Verification code for signup or password reset.
    pub async fn send_otp_email(
        &self,
        to_email: &str,
        code: &str,
        purpose: &str,
    ) -> Result<(), EmailError> {
        let subject = format!("Your verification code for {}", purpose);
        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
                <h2>Study Hall</h2>
                <p>Use this code to {}:</p>
                <div style="font-size: 32px; font-weight: bold; letter-spacing: 8px; padding: 16px 0;">{}</div>
                <p>The code expires in 30 minutes. If you did not request it, you can ignore this email.</p>
            </div>"#,
            purpose, code
        );
        self.send_html_email(to_email, &subject, &html).await
    }

    /// Sent once after registration completes, with the assigned member ID.
    pub async fn send_welcome_email(
        &self,
        to_email: &str,
        full_name: &str,
        member_id: &str,
    ) -> Result<(), EmailError> {
        let subject = "Welcome to Study Hall";
        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
                <h2>Welcome, {}!</h2>
                <p>Your registration is complete. Your member ID is:</p>
                <div style="font-size: 24px; font-weight: bold; padding: 16px 0;">{}</div>
                <p>You can sign in with your email or member ID. Next, complete your membership details to book a seat.</p>
            </div>"#,
            full_name, member_id
        );
        self.send_html_email(to_email, subject, &html).await
    }
}
