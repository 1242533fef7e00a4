//! Typed data-access layer over the finance API.
//!
//! Screens talk to a [`Session`]: an explicit context holding the base URL
//! and an injected token capability. There is no global client state; every
//! call fetches a fresh bearer token from the [`TokenSource`] and attaches
//! it to the request.
//!
//! Server records are normalized into display-ready view models here:
//! amounts become major units, blank categories collapse to
//! `Uncategorized`, and error bodies decode into a typed [`ClientError`]
//! so screens can offer a manual retry without showing raw server text.

use api_types::{
    ErrorResponse, MessageResponse,
    account::{AccountNew, AccountView},
    category::{CategoryUpdate, CategoryView},
    stats::{BalanceSummary, MonthlyReport},
    transaction::{TransactionKind, TransactionNew, TransactionView},
    user::{ProfileUpdate, ProfileView, SyncUser},
};
use chrono::{DateTime, FixedOffset};
use reqwest::Url;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// Environment variable carrying the API base URL.
pub const API_URL_VAR: &str = "FINANCE_API_URL";

const DEFAULT_ACCOUNT_NAME: &str = "Main Wallet";
const DEFAULT_ACCOUNT_KIND: &str = "cash";
const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// Supplies the current bearer token for a request.
///
/// Injected so the session never owns credential storage; the identity
/// provider's SDK (or a test fixture) stays behind this seam.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Result<String, ClientError>;
}

/// A fixed token, for tests and one-off scripts.
#[derive(Clone, Debug)]
pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Result<String, ClientError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug)]
pub enum ClientError {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict(String),
    Validation(String),
    Server(String),
    Transport(reqwest::Error),
    MissingConfig(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound => write!(f, "not found"),
            Self::Conflict(msg) => write!(f, "conflict: {msg}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
            Self::Server(msg) => write!(f, "server error: {msg}"),
            Self::Transport(err) => write!(f, "transport error: {err}"),
            Self::MissingConfig(name) => write!(f, "missing configuration: {name}"),
        }
    }
}

impl std::error::Error for ClientError {}

fn error_for_status(status: u16, body: String) -> ClientError {
    match status {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(body),
        400 | 422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    }
}

/// Convert a wire amount (minor units) to major units for display.
pub fn major_units(minor: i64) -> f64 {
    minor as f64 / 100.0
}

/// Convert a user-entered major-unit amount to minor units.
pub fn minor_units(major: f64) -> i64 {
    (major * 100.0).round() as i64
}

/// A transaction normalized for display.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionEntry {
    pub id: Uuid,
    pub account_id: Uuid,
    pub kind: TransactionKind,
    pub category: String,
    /// Major units.
    pub amount: f64,
    pub description: Option<String>,
    pub occurred_at: DateTime<FixedOffset>,
}

fn normalize_transaction(view: TransactionView) -> TransactionEntry {
    let category = if view.category.trim().is_empty() {
        UNCATEGORIZED_NAME.to_string()
    } else {
        view.category
    };
    TransactionEntry {
        id: view.id,
        account_id: view.account_id,
        kind: view.kind,
        category,
        amount: major_units(view.amount_minor),
        description: view.note,
        occurred_at: view.occurred_at,
    }
}

/// Input for creating or updating a transaction.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub account_id: Uuid,
    pub kind: TransactionKind,
    /// Major units; converted to minor units on the wire.
    pub amount: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub occurred_at: DateTime<FixedOffset>,
}

impl NewTransaction {
    fn into_payload(self) -> TransactionNew {
        TransactionNew {
            account_id: Some(self.account_id),
            amount_minor: Some(minor_units(self.amount)),
            kind: Some(self.kind),
            category: self.category,
            note: self.description,
            occurred_at: Some(self.occurred_at),
        }
    }
}

/// Balance totals in major units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BalanceEntry {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// One category's slice of a month's expenses.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    /// Major units.
    pub amount: f64,
    /// Share of the month's expense total, 0–100. Display only.
    pub percent: f64,
}

/// A month's expense report, normalized for charts.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyBreakdown {
    pub year: i32,
    pub month: u32,
    /// Major units.
    pub expense: f64,
    pub categories: Vec<CategoryShare>,
    /// One bucket per calendar day, major units.
    pub daily_expense: Vec<f64>,
}

fn normalize_report(report: MonthlyReport) -> MonthlyBreakdown {
    let total = report.expense_minor;
    MonthlyBreakdown {
        year: report.year,
        month: report.month,
        expense: major_units(total),
        categories: report
            .categories
            .into_iter()
            .map(|entry| CategoryShare {
                percent: if total > 0 {
                    entry.amount_minor as f64 * 100.0 / total as f64
                } else {
                    0.0
                },
                category: entry.category,
                amount: major_units(entry.amount_minor),
            })
            .collect(),
        daily_expense: report.daily_expense_minor.into_iter().map(major_units).collect(),
    }
}

/// An authenticated connection to the API.
#[derive(Debug)]
pub struct Session<T: TokenSource> {
    base_url: Url,
    http: reqwest::Client,
    tokens: T,
}

impl<T: TokenSource> Session<T> {
    pub fn new(base_url: &str, tokens: T) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ClientError::MissingConfig(format!("invalid base url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            tokens,
        })
    }

    /// Build a session from `FINANCE_API_URL`, failing fast when unset.
    pub fn from_env(tokens: T) -> Result<Self, ClientError> {
        let base_url = std::env::var(API_URL_VAR)
            .map_err(|_| ClientError::MissingConfig(API_URL_VAR.to_string()))?;
        Self::new(&base_url, tokens)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid endpoint: {err}")))
    }

    async fn decode<R: DeserializeOwned>(res: reqwest::Response) -> Result<R, ClientError> {
        if res.status().is_success() {
            return res.json::<R>().await.map_err(ClientError::Transport);
        }

        let status = res.status().as_u16();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(error_for_status(status, body))
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        let token = self.tokens.bearer_token()?;
        let res = self
            .http
            .get(self.endpoint(path)?)
            .bearer_auth(token)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ClientError> {
        let token = self.tokens.bearer_token()?;
        let res = self
            .http
            .post(self.endpoint(path)?)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    async fn put_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ClientError> {
        let token = self.tokens.bearer_token()?;
        let res = self
            .http
            .put(self.endpoint(path)?)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    async fn delete_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        let token = self.tokens.bearer_token()?;
        let res = self
            .http
            .delete(self.endpoint(path)?)
            .bearer_auth(token)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    /// Push profile fields after sign-in. Safe to repeat.
    pub async fn sync_user(&self, payload: SyncUser) -> Result<ProfileView, ClientError> {
        self.post_json("auth/sync", &payload).await
    }

    pub async fn profile(&self) -> Result<ProfileView, ClientError> {
        self.get_json("user/profile").await
    }

    pub async fn update_profile(
        &self,
        name: Option<String>,
        currency: Option<String>,
    ) -> Result<ProfileView, ClientError> {
        self.put_json("user/profile", &ProfileUpdate { name, currency })
            .await
    }

    pub async fn accounts(&self) -> Result<Vec<AccountView>, ClientError> {
        self.get_json("accounts").await
    }

    pub async fn create_account(&self, name: &str, kind: &str) -> Result<AccountView, ClientError> {
        self.post_json(
            "accounts",
            &AccountNew {
                name: Some(name.to_string()),
                kind: Some(kind.to_string()),
            },
        )
        .await
    }

    /// Return the user's first account, creating the standard
    /// `Main Wallet` cash account when none exists yet.
    pub async fn ensure_default_account(&self) -> Result<AccountView, ClientError> {
        let mut accounts = self.accounts().await?;
        if accounts.is_empty() {
            return self
                .create_account(DEFAULT_ACCOUNT_NAME, DEFAULT_ACCOUNT_KIND)
                .await;
        }
        Ok(accounts.remove(0))
    }

    /// All transactions, newest first, normalized for display.
    pub async fn transactions(&self) -> Result<Vec<TransactionEntry>, ClientError> {
        let views: Vec<TransactionView> = self.get_json("transactions").await?;
        Ok(views.into_iter().map(normalize_transaction).collect())
    }

    pub async fn add_transaction(
        &self,
        input: NewTransaction,
    ) -> Result<TransactionEntry, ClientError> {
        let view: TransactionView = self
            .post_json("transactions", &input.into_payload())
            .await?;
        Ok(normalize_transaction(view))
    }

    pub async fn update_transaction(
        &self,
        id: Uuid,
        input: NewTransaction,
    ) -> Result<TransactionEntry, ClientError> {
        let view: TransactionView = self
            .put_json(&format!("transactions/{id}"), &input.into_payload())
            .await?;
        Ok(normalize_transaction(view))
    }

    pub async fn delete_transaction(&self, id: Uuid) -> Result<(), ClientError> {
        let _: MessageResponse = self.delete_json(&format!("transactions/{id}")).await?;
        Ok(())
    }

    /// Categories with inferred kinds. `context` biases unseen names.
    pub async fn categories(
        &self,
        context: Option<TransactionKind>,
    ) -> Result<Vec<CategoryView>, ClientError> {
        let path = match context {
            Some(TransactionKind::Income) => "categories?context=income",
            Some(TransactionKind::Expense) => "categories?context=expense",
            None => "categories",
        };
        self.get_json(path).await
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        name: &str,
        icon: &str,
        color: Option<&str>,
    ) -> Result<(), ClientError> {
        let _: MessageResponse = self
            .put_json(
                &format!("categories/{id}"),
                &CategoryUpdate {
                    name: Some(name.to_string()),
                    icon: Some(icon.to_string()),
                    color: color.map(str::to_string),
                },
            )
            .await?;
        Ok(())
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<(), ClientError> {
        let _: MessageResponse = self.delete_json(&format!("categories/{id}")).await?;
        Ok(())
    }

    /// Balance totals, optionally for one calendar month.
    pub async fn balance(&self, month: Option<(i32, u32)>) -> Result<BalanceEntry, ClientError> {
        let path = match month {
            Some((year, month)) => format!("stats?year={year}&month={month}"),
            None => "stats".to_string(),
        };
        let summary: BalanceSummary = self.get_json(&path).await?;
        Ok(BalanceEntry {
            income: major_units(summary.income_minor),
            expense: major_units(summary.expense_minor),
            balance: major_units(summary.balance_minor),
        })
    }

    /// Expense breakdown and daily series for one month, with display
    /// percentages precomputed.
    pub async fn monthly_breakdown(
        &self,
        year: i32,
        month: u32,
    ) -> Result<MonthlyBreakdown, ClientError> {
        let report: MonthlyReport = self
            .get_json(&format!("stats/monthly?year={year}&month={month}"))
            .await?;
        Ok(normalize_report(report))
    }
}
