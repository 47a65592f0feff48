use oauth2::{
    basic::BasicClient, reqwest::async_http_client, AuthUrl, AuthorizationCode, ClientId,
    ClientSecret, CsrfToken, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use reqwest::Client as ReqwestClient;
use std::env;
use std::fmt;
use url::Url;

use crate::models::google_auth::GoogleUserInfo;

#[derive(Debug)]
pub enum GoogleAuthError {
    Exchange(String),
    UserInfoRequest(String),
    UserInfoStatus(reqwest::StatusCode),
    UserInfoParse(String),
    /// Google reports the address itself as unverified, so it cannot vouch
    /// for the member's email.
    UnverifiedAddress(String),
}

impl fmt::Display for GoogleAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoogleAuthError::Exchange(err) => {
                write!(f, "Failed to exchange authorization code: {}", err)
            }
            GoogleAuthError::UserInfoRequest(err) => {
                write!(f, "Failed to request user info: {}", err)
            }
            GoogleAuthError::UserInfoStatus(status) => {
                write!(f, "Google API returned error status: {}", status)
            }
            GoogleAuthError::UserInfoParse(err) => write!(f, "Failed to parse user info: {}", err),
            GoogleAuthError::UnverifiedAddress(email) => {
                write!(f, "Google account email is not verified: {}", email)
            }
        }
    }
}

impl std::error::Error for GoogleAuthError {}

/// OAuth client against Google's endpoints. Credentials come from the
/// environment; a misconfigured deployment fails the first sign-in attempt.
pub fn create_google_oauth_client() -> BasicClient {
    let google_client_id =
        env::var("GOOGLE_CLIENT_ID").expect("Missing GOOGLE_CLIENT_ID environment variable");
    let google_client_secret = env::var("GOOGLE_CLIENT_SECRET")
        .expect("Missing GOOGLE_CLIENT_SECRET environment variable");
    let google_redirect_url =
        env::var("GOOGLE_REDIRECT_URI").expect("Missing GOOGLE_REDIRECT_URI environment variable");

    BasicClient::new(
        ClientId::new(google_client_id),
        Some(ClientSecret::new(google_client_secret)),
        AuthUrl::new("https://accounts.google.com/o/oauth2/v2/auth".to_string())
            .expect("Invalid authorization endpoint URL"),
        Some(
            TokenUrl::new("https://oauth2.googleapis.com/token".to_string())
                .expect("Invalid token endpoint URL"),
        ),
    )
    .set_redirect_uri(RedirectUrl::new(google_redirect_url).expect("Invalid redirect URL"))
}

pub fn get_google_auth_url(client: &BasicClient) -> (Url, CsrfToken) {
    client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new("openid".to_string()))
        .add_scope(Scope::new("email".to_string()))
        .add_scope(Scope::new("profile".to_string()))
        .url()
}

/// Exchange the callback code and fetch the member's Google profile.
/// Sign-in marks the member's email as verified on the strength of this
/// profile, so a profile Google itself has not verified is refused here.
pub async fn fetch_verified_profile(
    client: &BasicClient,
    code: AuthorizationCode,
) -> Result<GoogleUserInfo, GoogleAuthError> {
    let token = client
        .exchange_code(code)
        .request_async(async_http_client)
        .await
        .map_err(|e| GoogleAuthError::Exchange(e.to_string()))?;
    let access_token = token.access_token().secret();

    let http = ReqwestClient::new();
    let response = http
        .get("https://www.googleapis.com/oauth2/v2/userinfo")
        .header("Authorization", format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| GoogleAuthError::UserInfoRequest(e.to_string()))?;

    if !response.status().is_success() {
        return Err(GoogleAuthError::UserInfoStatus(response.status()));
    }

    let info = response
        .json::<GoogleUserInfo>()
        .await
        .map_err(|e| GoogleAuthError::UserInfoParse(e.to_string()))?;

    if !info.verified_email {
        return Err(GoogleAuthError::UnverifiedAddress(info.email));
    }

    Ok(info)
}
