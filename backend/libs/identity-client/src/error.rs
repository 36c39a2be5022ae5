use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("email is already registered")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid or expired session token")]
    InvalidToken,

    #[error("identity request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("identity provider returned status {status}: {message}")]
    Provider { status: u16, message: String },
}
