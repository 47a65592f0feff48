use serde::{Deserialize, Serialize};

// Query string Google appends to the callback redirect
#[derive(Debug, Deserialize)]
pub struct GoogleAuthCallbackParams {
    pub code: String,
    pub state: String,
    pub scope: Option<String>,
    pub error: Option<String>,
}

// Shape of /oauth2/v2/userinfo
#[derive(Debug, Serialize, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    pub email: String,
    pub verified_email: bool,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
    pub locale: Option<String>,
}

impl GoogleUserInfo {
    /// Name to seed the member profile with. Google does not always fill
    /// `name`, so fall back to the split fields.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            let name = name.trim();
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
        match (&self.given_name, &self.family_name) {
            (Some(given), Some(family)) => Some(format!("{} {}", given.trim(), family.trim())),
            (Some(given), None) => Some(given.trim().to_string()),
            _ => None,
        }
    }
}
