//! Session cookie middleware
//!
//! Every request gets a [`SessionToken`] in its extensions. Visitors without a
//! valid cookie are issued a new token on the response.

use crate::server::app::AppState;
use crate::session::SessionToken;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub async fn session_cookie(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let session = &state.settings.session;
    let presented = jar
        .get(&session.cookie_name)
        .and_then(|cookie| SessionToken::parse(cookie.value()));

    let (token, issued) = match presented {
        Some(token) => (token, false),
        None => (SessionToken::generate(), true),
    };

    request.extensions_mut().insert(token.clone());
    let response = next.run(request).await;

    if !issued {
        return response;
    }

    tracing::debug!("issued new session cookie");
    let cookie = Cookie::build((session.cookie_name.clone(), token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(session.secure_cookie)
        .build();
    (jar.add(cookie), response).into_response()
}
