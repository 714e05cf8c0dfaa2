//! Encore Auth
//!
//! Sign-up, sign-in and password flows for the dashboard, backed by a hosted
//! auth provider.
//!
//! This crate provides:
//! - `AuthProvider`: the provider seam (email/password accounts)
//! - Actions: validate form input, call the provider, resolve to a redirect
//! - `Redirect`: the outcome of an action, optionally carrying an encoded
//!   status message

pub mod actions;
pub mod provider;
pub mod redirect;

pub use actions::{forgot_password, reset_password, sign_in, sign_out, sign_up};
pub use provider::{AuthError, AuthProvider};
pub use redirect::{Redirect, RedirectKind};

/// Submitted form fields
pub type FormData = std::collections::HashMap<String, String>;
