// REST API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection,
// and `{ success, data, error }` envelope unwrapping. Endpoint groups
// (guests, wedding config, auth) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::models::ApiErrorBody;
use crate::transport::TransportConfig;

/// Default base URL of a locally running backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the wedding REST API.
///
/// All methods return the unwrapped `data` payload; the envelope is
/// stripped before the caller sees it. A 401 response drops the stored
/// token so the next call goes out unauthenticated.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the API root including any path prefix, e.g.
    /// `http://localhost:5000/api`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// The API root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token management ─────────────────────────────────────────────

    /// Store a bearer token to attach to every subsequent request.
    pub fn set_token(&self, token: SecretString) {
        debug!("storing bearer token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Forget the stored bearer token.
    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether a bearer token is currently held.
    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL: `{base}/{segments...}`.
    ///
    /// Each segment is percent-encoded on its own, so an id holding `/`,
    /// `?`, or `#` stays inside its segment.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T, Error> {
        self.send_get::<T, ()>(path, None).await
    }

    /// Send a GET request with a query string and unwrap the envelope.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &[&str], query: &Q) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Serialize + Sync,
    {
        self.send_get(path, Some(query)).await
    }

    async fn send_get<T, Q>(&self, path: &[&str], query: Option<&Q>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Serialize + Sync,
    {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let mut builder = self.http.get(url);
        if let Some(query) = query {
            builder = builder.query(query);
        }
        let resp = self.apply_auth(builder).send().await?;

        self.parse_envelope(resp).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &[&str],
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);

        let builder = self.apply_auth(self.http.post(url).json(body));
        let resp = builder.send().await?;

        self.parse_envelope(resp).await
    }

    /// Send a PUT request with JSON body and unwrap the envelope.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &[&str],
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {}", url);

        let builder = self.apply_auth(self.http.put(url).json(body));
        let resp = builder.send().await?;

        self.parse_envelope(resp).await
    }

    /// Send a DELETE request and unwrap the envelope.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("DELETE {}", url);

        let builder = self.apply_auth(self.http.delete(url));
        let resp = builder.send().await?;

        self.parse_envelope(resp).await
    }

    /// Map the HTTP status and `{ success, data, error }` envelope into
    /// either the `data` payload or a typed [`Error`].
    ///
    /// Bodies that are not an envelope at all are decoded directly as `T`,
    /// matching backends that skip the wrapper on some routes.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        let path = resp.url().path().to_owned();
        let body = resp.text().await?;
        trace!(%status, len = body.len(), "response received");

        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("request rejected with 401, dropping stored token");
            self.clear_token();
            return Err(Error::Authentication {
                message: envelope_error(&body)
                    .map_or_else(|| "session expired or invalid token".into(), |e| e.message),
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                path,
                message: envelope_error(&body).map(|e| e.message),
            });
        }

        if !status.is_success() {
            return Err(match envelope_error(&body) {
                Some(err) => Error::Api {
                    message: err.message,
                    code: err.code,
                    status: status.as_u16(),
                },
                None => Error::Api {
                    message: format!("HTTP {status}: {}", preview(&body)),
                    code: None,
                    status: status.as_u16(),
                },
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| deserialization(&e, &body))?;

        let payload = match value.get("success").and_then(serde_json::Value::as_bool) {
            Some(true) => value
                .get("data")
                .cloned()
                .unwrap_or(serde_json::Value::Null),
            Some(false) => {
                let err = envelope_error(&body);
                return Err(Error::Api {
                    message: err
                        .as_ref()
                        .map_or_else(|| "request failed".into(), |e| e.message.clone()),
                    code: err.and_then(|e| e.code),
                    status: status.as_u16(),
                });
            }
            None => value,
        };

        serde_json::from_value(payload).map_err(|e| deserialization(&e, &body))
    }
}

/// Pull the `error` object out of an envelope body, if there is one.
fn envelope_error(body: &str) -> Option<ApiErrorBody> {
    #[derive(serde::Deserialize)]
    struct ErrorOnly {
        error: Option<ApiErrorBody>,
    }

    serde_json::from_str::<ErrorOnly>(body).ok()?.error
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

fn deserialization(err: &serde_json::Error, body: &str) -> Error {
    Error::Deserialization {
        message: format!("{err} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn url_joins_without_double_slashes() {
        let c = client("http://localhost:5000/api/");
        assert_eq!(
            c.url(&["guests", "stats"]).unwrap().as_str(),
            "http://localhost:5000/api/guests/stats"
        );

        let c = client("http://localhost:5000/api");
        assert_eq!(
            c.url(&["guests"]).unwrap().as_str(),
            "http://localhost:5000/api/guests"
        );
    }

    #[test]
    fn ids_stay_inside_their_segment() {
        let c = client("http://localhost:5000/api");
        assert_eq!(
            c.url(&["guests", "a/b?c#d", "check-in"]).unwrap().as_str(),
            "http://localhost:5000/api/guests/a%2Fb%3Fc%23d/check-in"
        );
        assert_eq!(
            c.url(&["invitation", "..", "config"]).unwrap().path(),
            "/api/invitation/config"
        );
    }

    #[test]
    fn token_can_be_set_and_cleared() {
        let c = client(DEFAULT_BASE_URL);
        assert!(!c.has_token());
        c.set_token(SecretString::from("abc".to_owned()));
        assert!(c.has_token());
        c.clear_token();
        assert!(!c.has_token());
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(300);
        assert_eq!(preview(&body).chars().count(), BODY_PREVIEW_CHARS);
    }
}
