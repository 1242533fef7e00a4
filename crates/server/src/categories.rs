//! Categories API endpoints.

use api_types::MessageResponse;
use api_types::category::{CategoryKind as ApiCategoryKind, CategoryUpdate, CategoryView};
use api_types::transaction::TransactionKind as ApiTransactionKind;
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use engine::UserProfile;

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::CategoryKind) -> ApiCategoryKind {
    match kind {
        engine::CategoryKind::Income => ApiCategoryKind::Income,
        engine::CategoryKind::Expense => ApiCategoryKind::Expense,
        engine::CategoryKind::Both => ApiCategoryKind::Both,
    }
}

fn map_category(category: engine::Category) -> CategoryView {
    match category {
        engine::Category::Static { name, icon, kind } => CategoryView::Static {
            name,
            icon,
            kind: map_kind(kind),
        },
        engine::Category::UserDefined {
            id,
            name,
            icon,
            color,
            kind,
        } => CategoryView::UserDefined {
            id,
            name,
            icon,
            color,
            kind: map_kind(kind),
        },
    }
}

/// `context` is the caller's active filter; it becomes the inferred kind of
/// categories no transaction has used yet.
#[derive(Deserialize)]
pub struct CategoryListQuery {
    context: Option<ApiTransactionKind>,
}

pub async fn list(
    Extension(user): Extension<UserProfile>,
    State(state): State<ServerState>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let fallback = match query.context.unwrap_or(ApiTransactionKind::Expense) {
        ApiTransactionKind::Income => engine::CategoryKind::Income,
        ApiTransactionKind::Expense => engine::CategoryKind::Expense,
    };

    let categories = state
        .engine
        .list_categories(&user.id, fallback)
        .await?
        .into_iter()
        .map(map_category)
        .collect();
    Ok(Json(categories))
}

pub async fn update(
    Extension(user): Extension<UserProfile>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<MessageResponse>, ServerError> {
    let (Some(name), Some(icon)) = (payload.name, payload.icon) else {
        return Err(ServerError::Generic("missing name or icon".to_string()));
    };

    state
        .engine
        .update_category(&user.id, id, &name, &icon, payload.color.as_deref())
        .await?;
    Ok(Json(MessageResponse {
        message: "category updated".to_string(),
    }))
}

pub async fn remove(
    Extension(user): Extension<UserProfile>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ServerError> {
    state.engine.delete_category(&user.id, id).await?;
    Ok(Json(MessageResponse {
        message: "category deleted".to_string(),
    }))
}
