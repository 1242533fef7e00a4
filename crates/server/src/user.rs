//! Profile sync and profile endpoints.

use api_types::user::{ProfileUpdate, ProfileView, SyncUser};
use axum::{Extension, Json, extract::State};

use engine::UserProfile;

use crate::{ServerError, server::ServerState};

fn map_profile(profile: UserProfile) -> ProfileView {
    ProfileView {
        id: profile.id,
        email: profile.email,
        name: profile.name,
        username: profile.username,
        currency: profile.currency,
    }
}

/// Idempotent profile upsert.
///
/// The auth middleware has already created the row, so this only fills in
/// whichever fields the payload carries.
pub async fn sync(
    Extension(user): Extension<UserProfile>,
    State(state): State<ServerState>,
    Json(payload): Json<SyncUser>,
) -> Result<Json<ProfileView>, ServerError> {
    let profile = state
        .engine
        .sync_user(engine::SyncUserCmd {
            subject: user.id.clone(),
            email: payload.email,
            name: payload.name,
            username: payload.username,
            currency: payload.currency,
        })
        .await?;
    Ok(Json(map_profile(profile)))
}

pub async fn profile(
    Extension(user): Extension<UserProfile>,
    State(state): State<ServerState>,
) -> Result<Json<ProfileView>, ServerError> {
    let profile = state.engine.user_profile(&user.id).await?;
    Ok(Json(map_profile(profile)))
}

pub async fn update_profile(
    Extension(user): Extension<UserProfile>,
    State(state): State<ServerState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<ProfileView>, ServerError> {
    if payload.name.is_none() && payload.currency.is_none() {
        return Err(ServerError::Generic(
            "provide at least one of name or currency".to_string(),
        ));
    }

    let profile = state
        .engine
        .update_profile(&user.id, payload.name.as_deref(), payload.currency.as_deref())
        .await?;
    Ok(Json(map_profile(profile)))
}
