//! Storage Service Client
//!
//! Uploads objects to a bucket through the storage REST API and resolves
//! their public URLs.

use crate::config::StorageSettings;
use crate::error::{Error, Result};
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use std::time::Duration;

/// Request timeout for a single upload.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

// ─────────────────────────────────────────────────────────────────────────────
// Storage Client Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Something that can store an object and hand back its public URL.
pub trait StorageClient: Send + Sync {
    /// Store `bytes` as `object_name` and return the object's public URL.
    fn upload(&self, object_name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP Storage Client
// ─────────────────────────────────────────────────────────────────────────────

/// Storage client talking to `{endpoint}/storage/v1` over HTTPS.
///
/// Requests are authenticated with the anonymous access key only.
pub struct HttpStorageClient {
    client: Client,
    endpoint: String,
    bucket: String,
    access_key: String,
}

impl HttpStorageClient {
    /// Create a client from settings.
    ///
    /// Fails with [`Error::StorageNotConfigured`] when the endpoint or key is
    /// missing.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self> {
        if !settings.is_configured() {
            return Err(Error::StorageNotConfigured);
        }
        let access_key = settings
            .access_key
            .clone()
            .ok_or(Error::StorageNotConfigured)?;

        let client = Client::builder().timeout(UPLOAD_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim().trim_end_matches('/').to_string(),
            bucket: settings.bucket.clone(),
            access_key,
        })
    }

    /// URL objects are posted to.
    pub fn object_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.endpoint, self.bucket, object_name
        )
    }

    /// URL an uploaded object is publicly served from.
    pub fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.endpoint, self.bucket, object_name
        )
    }
}

impl StorageClient for HttpStorageClient {
    fn upload(&self, object_name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let url = self.object_url(object_name);
        debug!("Uploading {} bytes to {}", bytes.len(), url);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.access_key)
            .bearer_auth(&self.access_key)
            .header(CACHE_CONTROL, "max-age=3600")
            .header("x-upsert", "false")
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Upload {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        info!("Uploaded {} to bucket {}", object_name, self.bucket);
        Ok(self.public_url(object_name))
    }
}

/// Pull a readable message out of an error response body.
///
/// The service answers with JSON carrying `message` or `error`; anything
/// else is passed through as text.
fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        });

    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => "no response body".to_string(),
        None => body.trim().to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(endpoint: &str, key: Option<&str>) -> StorageSettings {
        StorageSettings {
            endpoint: endpoint.to_string(),
            bucket: "markdown-images".to_string(),
            access_key: key.map(str::to_string),
        }
    }

    #[test]
    fn test_unconfigured_storage_is_rejected() {
        let result = HttpStorageClient::from_settings(&settings("", Some("key")));
        assert!(matches!(result, Err(Error::StorageNotConfigured)));

        let result = HttpStorageClient::from_settings(&settings("https://x.example", None));
        assert!(matches!(result, Err(Error::StorageNotConfigured)));
    }

    #[test]
    fn test_urls() {
        let client =
            HttpStorageClient::from_settings(&settings("https://x.example/", Some("anon"))).unwrap();
        assert_eq!(
            client.object_url("1-2.png"),
            "https://x.example/storage/v1/object/markdown-images/1-2.png"
        );
        assert_eq!(
            client.public_url("1-2.png"),
            "https://x.example/storage/v1/object/public/markdown-images/1-2.png"
        );
    }

    #[test]
    fn test_error_message_from_json() {
        assert_eq!(
            error_message(r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#),
            "The resource already exists"
        );
        assert_eq!(error_message(r#"{"error":"Unauthorized"}"#), "Unauthorized");
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message("  "), "no response body");
        assert_eq!(error_message(r#"{"code":1}"#), r#"{"code":1}"#);
    }
}
