//! Google Sheets API v4 client
//!
//! Authenticates either with a service account key (OAuth2 JWT-bearer grant)
//! or with a ready-made access token, and reads worksheet titles and
//! formatted cell values.

use crate::error::{ForecastError, Result};
use crate::sheets::SheetSource;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::debug;
use url::Url;

/// Google Sheets API endpoint
pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

/// OAuth2 scopes requested for service account tokens
pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for signed assertions
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before they expire
const EXPIRY_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a service account JSON key that the client needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Parse a service account key from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a service account key from base64-encoded JSON
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ForecastError::AuthError(format!("Credentials are not valid base64: {}", e)))?;
        let json = String::from_utf8(bytes)
            .map_err(|e| ForecastError::AuthError(format!("Credentials are not valid UTF-8: {}", e)))?;
        Self::from_json(&json)
    }
}

/// How the client authenticates
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Exchange signed assertions for access tokens
    ServiceAccount(ServiceAccountKey),
    /// Use a fixed bearer token
    AccessToken(String),
}

/// Claims of the JWT-bearer assertion
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Blocking client for one spreadsheet
#[derive(Debug)]
pub struct GoogleSheetsClient {
    http: Client,
    credentials: Credentials,
    spreadsheet_id: String,
    api_base: String,
    token: Mutex<Option<CachedToken>>,
}

impl GoogleSheetsClient {
    /// Create a client for the spreadsheet with the given key
    pub fn new(credentials: Credentials, spreadsheet_id: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            credentials,
            spreadsheet_id: spreadsheet_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            token: Mutex::new(None),
        })
    }

    /// Point the client at a different API host
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Spreadsheet key
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// URL of the spreadsheet metadata, restricted to worksheet titles
    pub fn metadata_url(&self) -> Result<Url> {
        let mut url = self.spreadsheet_url(&[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");
        Ok(url)
    }

    /// URL of the formatted values of a whole worksheet
    pub fn values_url(&self, title: &str) -> Result<Url> {
        let range = format!("'{}'", title.replace('\'', "''"));
        let mut url = self.spreadsheet_url(&["values", &range])?;
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", "FORMATTED_VALUE");
        Ok(url)
    }

    fn spreadsheet_url(&self, extra: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| ForecastError::InvalidParameter(format!("Invalid API base URL: {}", e)))?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ForecastError::InvalidParameter(format!("API base URL {} cannot hold a path", self.api_base))
            })?;
            segments.pop_if_empty();
            segments.extend(["v4", "spreadsheets", self.spreadsheet_id.as_str()]);
            segments.extend(extra);
        }
        Ok(url)
    }

    fn access_token(&self) -> Result<String> {
        let key = match &self.credentials {
            Credentials::AccessToken(token) => return Ok(token.clone()),
            Credentials::ServiceAccount(key) => key,
        };

        let mut cache = self
            .token
            .lock()
            .map_err(|_| ForecastError::AuthError("Token cache lock poisoned".to_string()))?;

        if let Some(cached) = cache.as_ref() {
            if cached.expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > Utc::now() {
                return Ok(cached.token.clone());
            }
        }

        let fresh = self.request_token(key)?;
        let token = fresh.token.clone();
        *cache = Some(fresh);
        Ok(token)
    }

    fn request_token(&self, key: &ServiceAccountKey) -> Result<CachedToken> {
        let assertion = sign_assertion(key, Utc::now())?;
        debug!("Requesting access token for {}", key.client_email);

        let response = self
            .http
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ForecastError::AuthError(format!(
                "Token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json()?;
        Ok(CachedToken {
            token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        })
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, url: Url) -> Result<T> {
        let token = self.access_token()?;
        debug!("GET {}", url);

        let response = self.http.get(url.clone()).bearer_auth(token).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ForecastError::HttpError(format!(
                "{} returned {}: {}",
                url, status, body
            )));
        }

        Ok(response.json()?)
    }
}

impl SheetSource for GoogleSheetsClient {
    fn sheet_titles(&self) -> Result<Vec<String>> {
        let metadata: SpreadsheetMetadata = self.get_json(self.metadata_url()?)?;
        Ok(metadata
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect())
    }

    fn sheet_values(&self, title: &str) -> Result<Vec<Vec<String>>> {
        let range: ValueRange = self.get_json(self.values_url(title)?)?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    fn describe(&self) -> String {
        format!("Google spreadsheet {}", self.spreadsheet_id)
    }
}

/// Build and sign the RS256 assertion exchanged for an access token
pub fn sign_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String> {
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: SCOPES.join(" "),
        aud: &key.token_uri,
        iat: now.timestamp(),
        exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(encode(&header, &claims, &signing_key)?)
}

/// Text of a cell as the Sheets UI shows it
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(serde_json::json!("1,234")), "1,234");
        assert_eq!(cell_text(serde_json::json!(12.5)), "12.5");
        assert_eq!(cell_text(serde_json::json!(true)), "true");
        assert_eq!(cell_text(serde_json::Value::Null), "");
    }
}
