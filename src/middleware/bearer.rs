use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;

/// Spotify access token taken from an `Authorization: Bearer` header
#[derive(Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    fn parse(header: &str) -> Option<Self> {
        let (scheme, token) = header.split_once(' ')?;
        let token = token.trim();
        if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
            return None;
        }
        Some(BearerToken(token.to_string()))
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(BearerToken::parse)
            .ok_or_else(|| AppError::Authentication("Not authenticated".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer() {
        let token = BearerToken::parse("Bearer BQD123").unwrap();
        assert_eq!(token.0, "BQD123");
    }

    #[test]
    fn test_parse_scheme_case_insensitive() {
        assert!(BearerToken::parse("bearer abc").is_some());
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        assert!(BearerToken::parse("Basic dXNlcjpwYXNz").is_none());
        assert!(BearerToken::parse("Bearer ").is_none());
        assert!(BearerToken::parse("BQD123").is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = BearerToken("secret".to_string());
        assert!(!format!("{:?}", token).contains("secret"));
    }
}
