use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::{
    repositories::auth as auth_repo,
    state::AppState,
    types::UserId,
    utils::jwt::{verify_access_token, Claims},
};

/// Bearer-token authentication. Inserts the verified [`Claims`] and the
/// loaded user into request extensions for handlers to extract.
pub async fn auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer_token)
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_string();

    let claims: Claims =
        verify_access_token(&token, &state.config.jwt_secret).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user_id: UserId = claims.sub.parse().map_err(|_| StatusCode::UNAUTHORIZED)?;
    let user = auth_repo::find_user_by_id(&state.pool, user_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn parse_bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        let token = rest.trim_start();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bearer_header_case_insensitively() {
        assert_eq!(parse_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(parse_bearer_token("bearer abc.def"), Some("abc.def"));
        assert_eq!(parse_bearer_token("BEARER  abc.def"), Some("abc.def"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert_eq!(parse_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(parse_bearer_token("Bearer "), None);
        assert_eq!(parse_bearer_token("Bearer"), None);
    }
}
