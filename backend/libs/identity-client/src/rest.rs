//! HTTP backend for the hosted identity toolkit endpoints
//! (`accounts:signUp`, `accounts:signInWithPassword`, `accounts:lookup`).

use crate::{Identity, IdentityError, IdentityProvider};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

pub struct RestIdentity {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialResponse {
    local_id: String,
    email: String,
    id_token: String,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    #[serde(default)]
    message: String,
}

impl RestIdentity {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1/accounts:{}?key={}",
            self.base_url,
            action,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Map the provider's error codes onto the crate taxonomy; anything
    /// unrecognized is surfaced verbatim.
    async fn provider_error(response: reqwest::Response) -> IdentityError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let code = serde_json::from_str::<ProviderErrorBody>(&body)
            .map(|parsed| parsed.error.message)
            .unwrap_or_default();
        tracing::debug!(status, code = %code, "identity request rejected");

        match code.as_str() {
            "EMAIL_EXISTS" => IdentityError::EmailTaken,
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
                IdentityError::InvalidCredentials
            }
            "INVALID_ID_TOKEN" | "USER_NOT_FOUND" => IdentityError::InvalidToken,
            _ => IdentityError::Provider {
                status,
                message: if code.is_empty() { body } else { code },
            },
        }
    }

    async fn credential_call(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, IdentityError> {
        let response = self
            .http
            .post(self.endpoint(action))
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::provider_error(response).await);
        }

        let body: CredentialResponse = response.json().await.map_err(IdentityError::Transport)?;
        Ok(Identity {
            uid: body.local_id,
            email: body.email,
            id_token: body.id_token,
        })
    }
}

#[async_trait]
impl IdentityProvider for RestIdentity {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        self.credential_call("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        self.credential_call("signInWithPassword", email, password)
            .await
    }

    async fn lookup(&self, id_token: &str) -> Result<Identity, IdentityError> {
        let response = self
            .http
            .post(self.endpoint("lookup"))
            .json(&json!({ "idToken": id_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::provider_error(response).await);
        }

        let body: LookupResponse = response.json().await.map_err(IdentityError::Transport)?;
        let user = body.users.into_iter().next().ok_or(IdentityError::InvalidToken)?;
        Ok(Identity {
            uid: user.local_id,
            email: user.email,
            id_token: id_token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_embeds_action_and_key() {
        let identity = RestIdentity::new("https://id.example.com/", "k-123");
        assert_eq!(
            identity.endpoint("signUp"),
            "https://id.example.com/v1/accounts:signUp?key=k-123"
        );
    }
}
