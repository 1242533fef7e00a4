use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body returned by every endpoint on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body returned by delete endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub mod user {
    use super::*;

    /// Body for `POST /auth/sync`.
    ///
    /// Every field is optional; the server only touches the fields that are
    /// present, so repeating the call is idempotent.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SyncUser {
        pub email: Option<String>,
        pub name: Option<String>,
        pub username: Option<String>,
        pub currency: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfileView {
        pub id: String,
        pub email: Option<String>,
        pub name: Option<String>,
        pub username: Option<String>,
        pub currency: String,
    }

    /// Body for `PUT /user/profile`. At least one field must be present.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub name: Option<String>,
        pub currency: Option<String>,
    }
}

pub mod account {
    use super::*;

    /// Body for `POST /accounts`.
    ///
    /// Both fields are required; they are `Option` here so a missing field
    /// surfaces as a 400 instead of a deserialization rejection.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
        /// RFC3339 timestamp.
        pub created_at: DateTime<FixedOffset>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    /// Body for `POST /transactions` and `PUT /transactions/{id}`.
    ///
    /// `accountId`, `amountMinor`, `type` and `occurredAt` are required;
    /// `category` and `note` may be omitted.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub account_id: Option<Uuid>,
        pub amount_minor: Option<i64>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionKind>,
        pub category: Option<String>,
        pub note: Option<String>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: Uuid,
        pub account_id: Uuid,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub category: String,
        pub amount_minor: i64,
        pub note: Option<String>,
        /// RFC3339 timestamp.
        pub occurred_at: DateTime<FixedOffset>,
    }
}

pub mod category {
    use super::*;

    /// Whether a category has held income, expenses, or both.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryKind {
        Income,
        Expense,
        Both,
    }

    /// A category as listed by `GET /categories`.
    ///
    /// Static entries are compiled into the server and carry no id;
    /// user-defined entries are persisted rows.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(tag = "source", rename_all = "snake_case")]
    pub enum CategoryView {
        Static {
            name: String,
            icon: String,
            #[serde(rename = "type")]
            kind: CategoryKind,
        },
        UserDefined {
            id: Uuid,
            name: String,
            icon: String,
            color: Option<String>,
            #[serde(rename = "type")]
            kind: CategoryKind,
        },
    }

    /// Body for `PUT /categories/{id}`. `name` and `icon` are required.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub icon: Option<String>,
        pub color: Option<String>,
    }
}

pub mod stats {
    use super::*;

    /// Response of `GET /stats`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BalanceSummary {
        pub income_minor: i64,
        pub expense_minor: i64,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryTotal {
        pub category: String,
        pub amount_minor: i64,
    }

    /// Response of `GET /stats/monthly`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MonthlyReport {
        pub year: i32,
        pub month: u32,
        pub expense_minor: i64,
        /// Expense totals per category, largest first.
        pub categories: Vec<CategoryTotal>,
        /// One bucket per calendar day, never sparse.
        pub daily_expense_minor: Vec<i64>,
    }
}
