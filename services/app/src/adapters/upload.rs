//! services/app/src/adapters/upload.rs
//!
//! Shared plumbing for the two multipart submissions (lost reports and
//! sightings): session checks, photo preparation, and turning backend failures
//! into `[HTTP <status>] <message>` errors.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use pawtrack_core::ports::{AuthProvider, PortError, PortResult, PushTokenStore};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::http::ApiClient;

const FILE_SCHEME: &str = "file://";
const CONTENT_SCHEME: &str = "content://";

//=========================================================================================
// Error Envelope
//=========================================================================================

/// The error body the backend sends with a failed request.
///
/// The first non-blank of `error`, `message`, `detail` (in that order) is the
/// message shown to the user. `detail` may also be a structured validation
/// report, in which case its JSON text is used.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    pub error: Option<Value>,
    pub message: Option<Value>,
    pub detail: Option<Value>,
}

impl ErrorEnvelope {
    pub fn into_message(self) -> Option<String> {
        [self.error, self.message, self.detail]
            .into_iter()
            .flatten()
            .find_map(value_text)
    }
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Builds the error for a response that arrived with an unexpected status.
pub fn http_failure(status: StatusCode, body: &[u8]) -> PortError {
    let message = serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(ErrorEnvelope::into_message)
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
    PortError::Http {
        status: status.as_u16(),
        message,
    }
}

/// Builds the error for a request that never produced a usable response.
/// The transport detail goes to the log, the user sees the generic message.
pub fn transport_failure(err: reqwest::Error) -> PortError {
    error!("Request did not complete: {}", err);
    let status = err.status().map(|s| s.as_u16()).unwrap_or(0);
    PortError::Http {
        status,
        message: format!("Request failed with status {}", status),
    }
}

//=========================================================================================
// Photo Preparation
//=========================================================================================

/// Gives a bare local path an explicit `file://` scheme. URIs that already
/// carry a scheme are returned unchanged.
pub fn normalize_image_uri(uri: &str) -> String {
    if uri.contains("://") {
        uri.to_string()
    } else {
        format!("{FILE_SCHEME}{uri}")
    }
}

/// The lowercase extension of the last path segment, `jpg` when there is none.
pub fn file_extension(uri: &str) -> String {
    let segment = uri.rsplit('/').next().unwrap_or(uri);
    match segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
        _ => "jpg".to_string(),
    }
}

pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "image/jpeg",
    }
}

/// A photo ready to be attached as the `image` part.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub uri: String,
    pub file_name: String,
    pub mime_type: &'static str,
}

impl ImageUpload {
    /// Normalizes `image_uri` and names the upload `<prefix>-<epoch_ms>.<ext>`.
    pub fn prepare(image_uri: &str, prefix: &str) -> Self {
        let uri = normalize_image_uri(image_uri);
        let ext = file_extension(&uri);
        Self {
            file_name: format!("{}-{}.{}", prefix, Utc::now().timestamp_millis(), ext),
            mime_type: mime_for_extension(&ext),
            uri,
        }
    }

    /// Reads the photo from local storage.
    pub async fn read(&self) -> PortResult<Bytes> {
        let path = if let Some(path) = self.uri.strip_prefix(FILE_SCHEME) {
            path
        } else if self.uri.starts_with(CONTENT_SCHEME) {
            return Err(PortError::Unexpected(format!(
                "Content URIs must be resolved by the device: {}",
                self.uri
            )));
        } else {
            return Err(PortError::Unexpected(format!(
                "Unsupported image location: {}",
                self.uri
            )));
        };

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| PortError::Unexpected(format!("Could not read image {}: {}", path, e)))?;
        Ok(Bytes::from(data))
    }

    pub async fn into_part(self) -> PortResult<Part> {
        let data = self.read().await?;
        let len = data.len() as u64;
        Part::stream_with_length(data, len)
            .file_name(self.file_name)
            .mime_str(self.mime_type)
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

/// Assembles the multipart body: the photo followed by text fields.
pub fn multipart_form(image: Part, fields: Vec<(&'static str, String)>) -> Form {
    fields
        .into_iter()
        .fold(Form::new().part("image", image), |form, (name, value)| {
            form.text(name, value)
        })
}

//=========================================================================================
// Submission Client
//=========================================================================================

/// Who is submitting, resolved before any network call.
#[derive(Debug, Clone)]
pub struct SubmissionContext {
    pub access_token: String,
    pub user_id: String,
    pub push_token: String,
}

/// Performs authenticated multipart submissions that must answer `201 Created`.
#[derive(Clone)]
pub struct SubmissionClient {
    api: ApiClient,
    auth: Arc<dyn AuthProvider>,
    push_tokens: Arc<dyn PushTokenStore>,
}

impl SubmissionClient {
    pub fn new(
        api: ApiClient,
        auth: Arc<dyn AuthProvider>,
        push_tokens: Arc<dyn PushTokenStore>,
    ) -> Self {
        Self {
            api,
            auth,
            push_tokens,
        }
    }

    /// Requires both a session and a user. The push token is best effort.
    pub async fn context(&self, what: &str) -> PortResult<SubmissionContext> {
        let session = self.auth.current_session().await?.ok_or_else(|| {
            PortError::AuthMissing(format!("You must sign in to publish a {}.", what))
        })?;
        let user = self.auth.current_user().await?.ok_or_else(|| {
            PortError::AuthMissing(format!("You must sign in to publish a {}.", what))
        })?;

        let push_token = match self.push_tokens.push_token().await {
            Ok(token) => token.unwrap_or_default(),
            Err(e) => {
                warn!("Could not read the stored push token: {}", e);
                String::new()
            }
        };

        Ok(SubmissionContext {
            access_token: session.access_token,
            user_id: user.id.to_string(),
            push_token,
        })
    }

    /// Sends the form and decodes the `201` body.
    pub async fn submit<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        ctx: &SubmissionContext,
    ) -> PortResult<T> {
        let response = self
            .api
            .post_multipart(path, form, &ctx.access_token)
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.bytes().await.unwrap_or_default();
            return Err(http_failure(status, &body));
        }

        debug!(path, "Submission accepted");
        response.json::<T>().await.map_err(|e| PortError::Http {
            status: status.as_u16(),
            message: e.to_string(),
        })
    }
}

/// Re-raises any failure that is not already an HTTP error as `[HTTP 0] ...`.
/// Auth errors are left as they are.
pub fn as_submission_error(err: PortError) -> PortError {
    match err {
        PortError::Http { .. } | PortError::AuthMissing(_) => err,
        PortError::Unexpected(message) | PortError::Unavailable(message) => {
            PortError::Http { status: 0, message }
        }
        other => PortError::Http {
            status: 0,
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_prefers_error_then_message_then_detail() {
        let err = http_failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"message":"Invalid species"}"#,
        );
        assert_eq!(err.to_string(), "[HTTP 422] Invalid species");

        let err = http_failure(
            StatusCode::BAD_REQUEST,
            br#"{"error":"Image too large","message":"ignored"}"#,
        );
        assert_eq!(err.to_string(), "[HTTP 400] Image too large");

        let err = http_failure(StatusCode::BAD_REQUEST, br#"{"error":"","detail":"bad date"}"#);
        assert_eq!(err.to_string(), "[HTTP 400] bad date");
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let err = http_failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"detail":[{"loc":["body","lost_date"]}]}"#,
        );
        assert_eq!(
            err.to_string(),
            r#"[HTTP 422] [{"loc":["body","lost_date"]}]"#
        );
    }

    #[test]
    fn unreadable_body_falls_back_to_status() {
        let err = http_failure(StatusCode::BAD_GATEWAY, b"<html>upstream down</html>");
        assert_eq!(err.to_string(), "[HTTP 502] Request failed with status 502");

        let err = http_failure(StatusCode::OK, b"{}");
        assert_eq!(err.to_string(), "[HTTP 200] Request failed with status 200");
    }

    #[test]
    fn bare_paths_gain_a_file_scheme() {
        assert_eq!(
            normalize_image_uri("/data/user/0/cache/photo.jpg"),
            "file:///data/user/0/cache/photo.jpg"
        );
        assert_eq!(normalize_image_uri("file:///tmp/a.png"), "file:///tmp/a.png");
        assert_eq!(
            normalize_image_uri("content://media/external/images/12"),
            "content://media/external/images/12"
        );
    }

    #[test]
    fn mime_type_follows_extension() {
        assert_eq!(mime_for_extension(&file_extension("file:///a/b.PNG")), "image/png");
        assert_eq!(mime_for_extension(&file_extension("file:///a/b.jpeg")), "image/jpeg");
        assert_eq!(mime_for_extension(&file_extension("file:///a/b.jpg")), "image/jpeg");
        assert_eq!(mime_for_extension(&file_extension("file:///a/b.heic")), "image/jpeg");
        assert_eq!(file_extension("content://media/images/12"), "jpg");
        assert_eq!(file_extension("file:///a.dir/photo"), "jpg");
    }

    #[test]
    fn prepared_upload_is_named_after_the_prefix() {
        let upload = ImageUpload::prepare("/tmp/cat.png", "sighting");
        assert_eq!(upload.uri, "file:///tmp/cat.png");
        assert_eq!(upload.mime_type, "image/png");
        assert!(upload.file_name.starts_with("sighting-"));
        assert!(upload.file_name.ends_with(".png"));
    }

    #[tokio::test]
    async fn content_uris_cannot_be_read_here() {
        let upload = ImageUpload::prepare("content://media/images/12", "report");
        assert!(matches!(upload.read().await, Err(PortError::Unexpected(_))));
    }

    #[test]
    fn non_http_failures_are_reported_with_status_zero() {
        let err = as_submission_error(PortError::Unexpected("Could not read image".into()));
        assert_eq!(err.to_string(), "[HTTP 0] Could not read image");

        let auth = as_submission_error(PortError::AuthMissing("sign in".into()));
        assert!(auth.to_string().starts_with("ERR_AUTH_MISSING"));
    }
}
