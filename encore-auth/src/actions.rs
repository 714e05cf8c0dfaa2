//! Auth actions
//!
//! Each action reads submitted form fields, calls the provider and resolves
//! to a `Redirect`. Actions never fail: every error becomes an encoded
//! redirect back to the originating page.

use tracing::{error, info, warn};

use crate::FormData;
use crate::provider::AuthProvider;
use crate::redirect::Redirect;

const SIGN_UP: &str = "/sign-up";
const SIGN_IN: &str = "/sign-in";
const FORGOT_PASSWORD: &str = "/forgot-password";
const RESET_PASSWORD: &str = "/protected/reset-password";
const AFTER_SIGN_IN: &str = "/artists";

const MIN_PASSWORD_LEN: usize = 6;

/// Non-empty form field
fn field<'a>(form: &'a FormData, name: &str) -> Option<&'a str> {
    form.get(name).map(String::as_str).filter(|v| !v.is_empty())
}

/// Register a new account
pub async fn sign_up(form: &FormData, provider: &dyn AuthProvider) -> Redirect {
    let Some(email) = field(form, "email") else {
        return Redirect::error(SIGN_UP, "Email is required");
    };
    let Some(password) = field(form, "password") else {
        return Redirect::error(SIGN_UP, "Password is required");
    };
    // Length in UTF-16 code units, as the browser form counts it
    if password.encode_utf16().count() < MIN_PASSWORD_LEN {
        return Redirect::error(
            SIGN_UP,
            format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            ),
        );
    }

    if let Err(e) = provider.sign_up(email, password).await {
        error!(
            code = e.code.as_deref().unwrap_or("-"),
            "Sign-up failed: {}", e.message
        );

        let message = match e.code.as_deref() {
            Some("23505") => "This email is already registered",
            Some("InvalidEmailError") => "Please provide a valid email address",
            Some("AuthWeakPasswordError") => {
                "Password is too weak. Please include numbers and special characters"
            }
            Some("AuthApiError") => "Unable to create account. Please try again later",
            _ => "An unexpected error occurred. Please try again",
        };
        return Redirect::error(SIGN_UP, message);
    }

    info!("Account created for {}", email);
    Redirect::success(
        SIGN_UP,
        "Thanks for signing up! Please check your email for a verification link.",
    )
}

/// Start a session
pub async fn sign_in(form: &FormData, provider: &dyn AuthProvider) -> Redirect {
    let email = form.get("email").map(String::as_str).unwrap_or_default();
    let password = form.get("password").map(String::as_str).unwrap_or_default();

    match provider.sign_in_with_password(email, password).await {
        Ok(()) => Redirect::to(AFTER_SIGN_IN),
        Err(e) => Redirect::error(SIGN_IN, e.message),
    }
}

/// Send a password-reset link
///
/// `origin` is the site origin the reset link points back to.
pub async fn forgot_password(
    form: &FormData,
    origin: &str,
    provider: &dyn AuthProvider,
) -> Redirect {
    let Some(email) = field(form, "email") else {
        return Redirect::error(FORGOT_PASSWORD, "Email is required");
    };

    let redirect_to = format!(
        "{}/auth/callback?redirect_to={}",
        origin.trim_end_matches('/'),
        RESET_PASSWORD
    );

    if let Err(e) = provider.reset_password_for_email(email, &redirect_to).await {
        error!("Password reset failed: {}", e);
        return Redirect::error(FORGOT_PASSWORD, "Could not reset password");
    }

    if let Some(callback_url) = field(form, "callbackUrl") {
        return Redirect::to(callback_url);
    }

    Redirect::success(
        FORGOT_PASSWORD,
        "Check your email for a link to reset your password.",
    )
}

/// Set a new password for the signed-in user
pub async fn reset_password(form: &FormData, provider: &dyn AuthProvider) -> Redirect {
    let (Some(password), Some(confirm)) =
        (field(form, "password"), field(form, "confirmPassword"))
    else {
        return Redirect::error(RESET_PASSWORD, "Password and confirm password are required");
    };

    if password != confirm {
        return Redirect::error(RESET_PASSWORD, "Passwords do not match");
    }

    if let Err(e) = provider.update_password(password).await {
        error!("Password update failed: {}", e);
        return Redirect::error(RESET_PASSWORD, "Password update failed");
    }

    Redirect::success(RESET_PASSWORD, "Password updated")
}

/// End the current session
pub async fn sign_out(provider: &dyn AuthProvider) -> Redirect {
    if let Err(e) = provider.sign_out().await {
        warn!("Sign-out failed: {}", e);
    }
    Redirect::to(SIGN_IN)
}
