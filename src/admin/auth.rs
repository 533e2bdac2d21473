use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use crate::http::{ApiError, AppState};

pub const X_API_KEY: &str = "x-api-key";

/// Guards mutating routes when `security.api_key_enabled` is on.
///
/// Accepts `Authorization: Bearer <key>` or `X-API-Key: <key>`. With the
/// check enabled but no key configured, every request is rejected.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let settings = state.settings.current();
    if !settings.api_key_enabled {
        return Ok(next.run(request).await);
    }

    let expected = settings.api_key.as_deref().filter(|key| !key.is_empty());
    let headers = request.headers();
    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .or_else(|| headers.get(X_API_KEY).and_then(|h| h.to_str().ok()));

    let authorized = match (expected, presented) {
        (Some(expected), Some(presented)) => keys_match(expected, presented),
        _ => false,
    };
    if authorized {
        Ok(next.run(request).await)
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// Compare keys without stopping at the first differing byte. Only the
/// length is allowed to short-circuit.
fn keys_match(expected: &str, presented: &str) -> bool {
    let (expected, presented) = (expected.as_bytes(), presented.as_bytes());
    if expected.len() != presented.len() {
        return false;
    }
    expected
        .iter()
        .zip(presented)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_match() {
        assert!(keys_match("s3cret", "s3cret"));
        assert!(!keys_match("s3cret", "s3creT"));
        assert!(!keys_match("s3cret", "s3cre"));
        assert!(!keys_match("s3cret", ""));
    }
}
