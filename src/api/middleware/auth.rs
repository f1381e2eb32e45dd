use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{
    api::state::AppState,
    auth::Identity,
    domain::{Role, User},
    error::{AppError, Result},
    repository::UserRepository,
};

/// Verified caller identity, inserted into request extensions by the auth
/// middleware and read back by the handlers.
#[derive(Clone)]
pub struct CurrentUser {
    pub email: String,
}

/// Role predicate shared by both guards. An unknown email and a role
/// mismatch fail identically so responses leak nothing about which it was.
/// One fresh read of user storage per call, no caching.
pub async fn check_role(
    user_repo: &dyn UserRepository,
    email: &str,
    required: Role,
) -> Result<User> {
    let user = user_repo
        .find_by_email(email)
        .await?
        .ok_or(AppError::Forbidden)?;

    if user.role != required {
        return Err(AppError::Forbidden);
    }

    Ok(user)
}

fn verify_request(state: &AppState, request: &Request) -> Result<Identity> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    state.identity_verifier.verify_header(header)
}

async fn authorize(
    state: AppState,
    mut request: Request,
    next: Next,
    required: Option<Role>,
) -> Result<Response> {
    let identity = verify_request(&state, &request)?;

    if let Some(role) = required {
        check_role(
            state.service_context.user_repo.as_ref(),
            &identity.email,
            role,
        )
        .await?;
    }

    request.extensions_mut().insert(CurrentUser {
        email: identity.email,
    });

    Ok(next.run(request).await)
}

/// Token check only; any registered or unregistered identity passes as long
/// as the credential itself is valid.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    authorize(state, request, next, None).await
}

pub async fn require_participant(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    authorize(state, request, next, Some(Role::Participant)).await
}

pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    authorize(state, request, next, Some(Role::Admin)).await
}
