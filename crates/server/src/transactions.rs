//! Transactions API endpoints.

use api_types::MessageResponse;
use api_types::transaction::{TransactionKind as ApiKind, TransactionNew, TransactionView};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use engine::UserProfile;

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn engine_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        account_id: tx.account_id,
        kind: map_kind(tx.kind),
        category: tx.category,
        amount_minor: tx.amount_minor,
        note: tx.note,
        occurred_at: tx.occurred_at.fixed_offset(),
    }
}

struct RequiredFields {
    account_id: Uuid,
    amount_minor: i64,
    kind: engine::TransactionKind,
    occurred_at: DateTime<Utc>,
}

fn required_fields(payload: &TransactionNew) -> Result<RequiredFields, ServerError> {
    match (
        payload.account_id,
        payload.amount_minor,
        payload.kind,
        payload.occurred_at,
    ) {
        (Some(account_id), Some(amount_minor), Some(kind), Some(occurred_at)) => {
            Ok(RequiredFields {
                account_id,
                amount_minor,
                kind: engine_kind(kind),
                occurred_at: occurred_at.with_timezone(&Utc),
            })
        }
        _ => Err(ServerError::Generic("missing required fields".to_string())),
    }
}

pub async fn create(
    Extension(user): Extension<UserProfile>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<Json<TransactionView>, ServerError> {
    let required = required_fields(&payload)?;
    let tx = state
        .engine
        .create_transaction(engine::CreateTransactionCmd {
            user_id: user.id.clone(),
            account_id: required.account_id,
            kind: required.kind,
            amount_minor: required.amount_minor,
            category: payload.category,
            note: payload.note,
            occurred_at: required.occurred_at,
        })
        .await?;

    Ok(Json(map_transaction(tx)))
}

pub async fn list(
    Extension(user): Extension<UserProfile>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let transactions = state
        .engine
        .list_transactions(&user.id)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();
    Ok(Json(transactions))
}

pub async fn update(
    Extension(user): Extension<UserProfile>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionNew>,
) -> Result<Json<TransactionView>, ServerError> {
    let required = required_fields(&payload)?;
    let tx = state
        .engine
        .update_transaction(engine::UpdateTransactionCmd {
            user_id: user.id.clone(),
            transaction_id: id,
            account_id: required.account_id,
            kind: required.kind,
            amount_minor: required.amount_minor,
            category: payload.category,
            note: payload.note,
            occurred_at: required.occurred_at,
        })
        .await?;

    Ok(Json(map_transaction(tx)))
}

pub async fn remove(
    Extension(user): Extension<UserProfile>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ServerError> {
    state.engine.delete_transaction(&user.id, id).await?;
    Ok(Json(MessageResponse {
        message: "transaction deleted".to_string(),
    }))
}
