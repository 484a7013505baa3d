// Admin authentication endpoints
//
// The backend issues a bearer token on login; the client stores it and
// attaches it to every later request until logout or a 401.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ApiUser, LoginResponse};

impl ApiClient {
    /// Log in with admin email + password and keep the issued token.
    ///
    /// `POST /auth/login`. Returns the token so callers can persist it.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(SecretString, ApiUser), Error> {
        debug!(email, "logging in");
        let resp: LoginResponse = self
            .post(
                &["auth", "login"],
                &json!({
                    "email": email,
                    "password": password.expose_secret(),
                }),
            )
            .await
            .map_err(|e| match e {
                Error::Api { message, .. } => Error::Authentication { message },
                other => other,
            })?;

        let token = SecretString::from(resp.token);
        self.set_token(token.clone());
        Ok((token, resp.user))
    }

    /// Check that the stored token is still accepted.
    ///
    /// `POST /auth/verify`
    pub async fn verify(&self) -> Result<(), Error> {
        if !self.has_token() {
            return Err(Error::Authentication {
                message: "no token stored".into(),
            });
        }
        let _: serde_json::Value = self.post(&["auth", "verify"], &json!({})).await?;
        Ok(())
    }

    /// Drop the stored token. The backend keeps no server-side session.
    pub fn logout(&self) {
        debug!("logging out");
        self.clear_token();
    }
}
