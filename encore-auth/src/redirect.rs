//! Action outcomes

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    Success,
    Error,
}

impl RedirectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectKind::Success => "success",
            RedirectKind::Error => "error",
        }
    }
}

/// Where the browser goes after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// Back to `path` with a status message in the query string
    Encoded {
        kind: RedirectKind,
        path: String,
        message: String,
    },
    /// Plain redirect
    To(String),
}

impl Redirect {
    pub fn error(path: &str, message: impl Into<String>) -> Self {
        Self::Encoded {
            kind: RedirectKind::Error,
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub fn success(path: &str, message: impl Into<String>) -> Self {
        Self::Encoded {
            kind: RedirectKind::Success,
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub fn to(path: impl Into<String>) -> Self {
        Self::To(path.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Redirect::Encoded {
                kind: RedirectKind::Error,
                ..
            }
        )
    }

    /// `Location` header value, e.g. `/sign-up?error=Email+is+required`
    pub fn location(&self) -> String {
        match self {
            Redirect::Encoded {
                kind,
                path,
                message,
            } => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair(kind.as_str(), message)
                    .finish();
                format!("{}?{}", path, query)
            }
            Redirect::To(path) => path.clone(),
        }
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_location() {
        let redirect = Redirect::error("/sign-up", "Email is required");
        assert_eq!(redirect.location(), "/sign-up?error=Email+is+required");
        assert!(redirect.is_error());
    }

    #[test]
    fn test_message_is_escaped() {
        let redirect = Redirect::success("/forgot-password", "Done! a&b=c");
        assert_eq!(
            redirect.location(),
            "/forgot-password?success=Done%21+a%26b%3Dc"
        );
    }

    #[test]
    fn test_plain_location() {
        assert_eq!(Redirect::to("/artists").to_string(), "/artists");
        assert!(!Redirect::to("/artists").is_error());
    }
}
