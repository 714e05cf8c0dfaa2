//! Auth provider seam

use async_trait::async_trait;
use thiserror::Error;

/// Error reported by the auth provider
///
/// `code` is the provider's machine-readable error code when it sends one
/// (e.g. `AuthWeakPasswordError`, or a database code such as `23505`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthError {
    pub code: Option<String>,
    pub message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Hosted email/password auth provider
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Registers a new account; the provider sends a verification email
    async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// Starts a session
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// Sends a password-reset link that lands on `redirect_to`
    async fn reset_password_for_email(&self, email: &str, redirect_to: &str)
    -> Result<(), AuthError>;

    /// Sets a new password for the signed-in user
    async fn update_password(&self, password: &str) -> Result<(), AuthError>;

    /// Ends the current session
    async fn sign_out(&self) -> Result<(), AuthError>;
}
