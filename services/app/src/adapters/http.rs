//! services/app/src/adapters/http.rs
//!
//! The thin HTTP layer shared by every backend adapter: one `reqwest::Client`,
//! the base URL, and the `{ success, data }` envelope the backend wraps
//! its list responses in.

use reqwest::header::ACCEPT;
use reqwest::multipart::Form;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// A handle to the reports backend. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// The standard success envelope: `{ "success": bool, "data": T }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// The payload, or `None` when the backend flagged the call as unsuccessful.
    pub fn into_data(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

impl ApiClient {
    /// Creates a new `ApiClient` with its own connection pool.
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("pawtrack/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Wraps an existing client, e.g. one shared with the geocoder.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GETs `path` and decodes the success envelope. Non-2xx statuses are errors.
    pub async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        bearer: Option<&str>,
    ) -> Result<Envelope<T>, reqwest::Error> {
        debug!(path, ?query, "GET");
        let mut request = self.client.get(self.url(path)).query(query);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        request
            .send()
            .await?
            .error_for_status()?
            .json::<Envelope<T>>()
            .await
    }

    /// POSTs a multipart form. The caller decides which statuses count as success.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: Form,
        bearer: &str,
    ) -> Result<Response, reqwest::Error> {
        debug!(path, "POST multipart");
        self.client
            .post(self.url(path))
            .bearer_auth(bearer)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
    }
}
