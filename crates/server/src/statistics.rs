//! Statistics API endpoints.
//!
//! All aggregates are recomputed from the caller's transaction set on every
//! request; nothing is cached or materialized.

use api_types::stats::{BalanceSummary, CategoryTotal, MonthlyReport};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;

use engine::UserProfile;

use crate::{ServerError, server::ServerState};

/// `year` and `month` restrict the balance to one calendar month; they must
/// be supplied together.
#[derive(Deserialize)]
pub struct BalanceQuery {
    year: Option<i32>,
    month: Option<u32>,
}

pub async fn balance(
    Extension(user): Extension<UserProfile>,
    State(state): State<ServerState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceSummary>, ServerError> {
    let month = match (query.year, query.month) {
        (Some(year), Some(month)) => Some((year, month)),
        (None, None) => None,
        _ => {
            return Err(ServerError::Generic(
                "provide both year and month, or neither".to_string(),
            ));
        }
    };

    let summary = state.engine.balance_summary(&user.id, month).await?;
    Ok(Json(BalanceSummary {
        income_minor: summary.income_minor,
        expense_minor: summary.expense_minor,
        balance_minor: summary.balance_minor,
    }))
}

#[derive(Deserialize)]
pub struct MonthlyQuery {
    year: i32,
    month: u32,
}

pub async fn monthly(
    Extension(user): Extension<UserProfile>,
    State(state): State<ServerState>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<MonthlyReport>, ServerError> {
    let report = state
        .engine
        .monthly_report(&user.id, query.year, query.month)
        .await?;

    Ok(Json(MonthlyReport {
        year: report.year,
        month: report.month,
        expense_minor: report.expense_minor,
        categories: report
            .categories
            .into_iter()
            .map(|total| CategoryTotal {
                category: total.category,
                amount_minor: total.amount_minor,
            })
            .collect(),
        daily_expense_minor: report.daily_expense_minor,
    }))
}
