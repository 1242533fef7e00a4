//! Accounts API endpoints.

use api_types::account::{AccountNew, AccountView};
use axum::{Extension, Json, extract::State};

use engine::UserProfile;

use crate::{ServerError, server::ServerState};

fn map_account(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        kind: account.kind,
        created_at: account.created_at.fixed_offset(),
    }
}

pub async fn create(
    Extension(user): Extension<UserProfile>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<Json<AccountView>, ServerError> {
    let (Some(name), Some(kind)) = (payload.name, payload.kind) else {
        return Err(ServerError::Generic("missing name or type".to_string()));
    };

    let account = state.engine.create_account(&user.id, &name, &kind).await?;
    Ok(Json(map_account(account)))
}

pub async fn list(
    Extension(user): Extension<UserProfile>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state
        .engine
        .list_accounts(&user.id)
        .await?
        .into_iter()
        .map(map_account)
        .collect();
    Ok(Json(accounts))
}
