//! Derived aggregates over a user's transaction set.
//!
//! Everything here is a pure function over already-loaded transactions.
//! Nothing is materialized or cached: totals are recomputed on every
//! request, which keeps reads trivially consistent with writes.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::{CategoryKind, EngineError, ResultEngine, Transaction, TransactionKind, util};

/// Income, expense and net totals over a transaction set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BalanceSummary {
    pub income_minor: i64,
    pub expense_minor: i64,
    pub balance_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount_minor: i64,
}

/// Expense aggregates for one calendar month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub expense_minor: i64,
    /// Per-category expense totals, largest first.
    pub categories: Vec<CategoryTotal>,
    /// One bucket per calendar day (index 0 = day 1), never sparse.
    pub daily_expense_minor: Vec<i64>,
}

/// Number of days in a calendar month, rejecting out-of-range months.
pub fn days_in_month(year: i32, month: u32) -> ResultEngine<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::InvalidField(format!("invalid month: {year}-{month:02}")))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| EngineError::InvalidField(format!("invalid month: {year}-{month:02}")))?;

    Ok(next.signed_duration_since(first).num_days() as u32)
}

fn in_month(occurred_at: DateTime<Utc>, year: i32, month: u32) -> bool {
    occurred_at.year() == year && occurred_at.month() == month
}

/// Single-pass income/expense/net fold.
pub fn balance<'a, I>(transactions: I) -> BalanceSummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let (income, expense) = transactions
        .into_iter()
        .fold((0i64, 0i64), |acc, tx| match tx.kind {
            TransactionKind::Income => (acc.0 + tx.amount_minor, acc.1),
            TransactionKind::Expense => (acc.0, acc.1 + tx.amount_minor),
        });

    BalanceSummary {
        income_minor: income,
        expense_minor: expense,
        balance_minor: income - expense,
    }
}

/// Balance restricted to one calendar month.
pub fn monthly_balance(transactions: &[Transaction], year: i32, month: u32) -> BalanceSummary {
    balance(
        transactions
            .iter()
            .filter(|tx| in_month(tx.occurred_at, year, month)),
    )
}

/// Expense totals per category for one month, ordered by amount descending
/// (category name ascending as tie-break, so the order is deterministic).
pub fn expense_breakdown(
    transactions: &[Transaction],
    year: i32,
    month: u32,
) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, i64> = HashMap::new();
    for tx in transactions {
        if tx.kind == TransactionKind::Expense && in_month(tx.occurred_at, year, month) {
            *totals.entry(tx.category.as_str()).or_insert(0) += tx.amount_minor;
        }
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, amount_minor)| CategoryTotal {
            category: category.to_string(),
            amount_minor,
        })
        .collect();
    breakdown.sort_by(|a, b| {
        b.amount_minor
            .cmp(&a.amount_minor)
            .then_with(|| a.category.cmp(&b.category))
    });
    breakdown
}

/// Expense total per calendar day of one month.
///
/// The result always holds exactly `days_in_month` buckets; days without
/// transactions stay zero.
pub fn daily_expense_series(
    transactions: &[Transaction],
    year: i32,
    month: u32,
) -> ResultEngine<Vec<i64>> {
    let days = days_in_month(year, month)? as usize;
    let mut series = vec![0i64; days];
    for tx in transactions {
        if tx.kind == TransactionKind::Expense && in_month(tx.occurred_at, year, month) {
            let day = tx.occurred_at.day() as usize;
            series[day - 1] += tx.amount_minor;
        }
    }
    Ok(series)
}

/// Infer the kind of a category from the transactions recorded under it.
///
/// Both kinds observed means `Both`; a single kind means that kind; an
/// unseen name falls back to the caller's active context.
pub fn infer_kind<'a, I>(transactions: I, name_norm: &str, fallback: CategoryKind) -> CategoryKind
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut income = false;
    let mut expense = false;
    for tx in transactions {
        if util::normalize_key(&tx.category) == name_norm {
            match tx.kind {
                TransactionKind::Income => income = true,
                TransactionKind::Expense => expense = true,
            }
        }
        if income && expense {
            return CategoryKind::Both;
        }
    }

    match (income, expense) {
        (true, false) => CategoryKind::Income,
        (false, true) => CategoryKind::Expense,
        (false, false) => fallback,
        (true, true) => CategoryKind::Both,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;

    fn tx(kind: TransactionKind, category: &str, amount_minor: i64, date: (i32, u32, u32)) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user_id: "user_test".to_string(),
            account_id: Uuid::new_v4(),
            kind,
            category: category.to_string(),
            amount_minor,
            note: None,
            occurred_at: Utc
                .with_ymd_and_hms(date.0, date.1, date.2, 12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn balance_is_income_minus_expense() {
        let txs = vec![
            tx(TransactionKind::Income, "Salary", 200_000, (2024, 3, 1)),
            tx(TransactionKind::Expense, "Food", 5_000, (2024, 3, 5)),
            tx(TransactionKind::Expense, "Rent", 80_000, (2024, 3, 2)),
        ];
        let summary = balance(&txs);
        assert_eq!(summary.income_minor, 200_000);
        assert_eq!(summary.expense_minor, 85_000);
        assert_eq!(summary.balance_minor, 115_000);
    }

    #[test]
    fn monthly_balance_ignores_other_months() {
        let txs = vec![
            tx(TransactionKind::Expense, "Food", 5_000, (2024, 3, 5)),
            tx(TransactionKind::Expense, "Food", 9_000, (2024, 4, 5)),
        ];
        let summary = monthly_balance(&txs, 2024, 3);
        assert_eq!(summary.expense_minor, 5_000);
        assert_eq!(summary.balance_minor, -5_000);
    }

    #[test]
    fn breakdown_orders_by_amount_descending() {
        let txs = vec![
            tx(TransactionKind::Expense, "Food", 3_000, (2024, 3, 1)),
            tx(TransactionKind::Expense, "Rent", 90_000, (2024, 3, 1)),
            tx(TransactionKind::Expense, "Food", 4_000, (2024, 3, 9)),
            tx(TransactionKind::Income, "Salary", 500_000, (2024, 3, 1)),
        ];
        let breakdown = expense_breakdown(&txs, 2024, 3);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, "Rent");
        assert_eq!(breakdown[0].amount_minor, 90_000);
        assert_eq!(breakdown[1].category, "Food");
        assert_eq!(breakdown[1].amount_minor, 7_000);
    }

    #[test]
    fn daily_series_is_dense_and_sums_to_total() {
        let txs = vec![
            tx(TransactionKind::Expense, "Food", 1_000, (2024, 2, 1)),
            tx(TransactionKind::Expense, "Food", 2_500, (2024, 2, 29)),
        ];
        let series = daily_expense_series(&txs, 2024, 2).unwrap();
        // 2024 is a leap year.
        assert_eq!(series.len(), 29);
        assert_eq!(series[0], 1_000);
        assert_eq!(series[28], 2_500);
        assert_eq!(series.iter().sum::<i64>(), 3_500);
        assert!(series.iter().all(|&bucket| bucket >= 0));
    }

    #[test]
    fn days_in_month_rejects_bad_input() {
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(days_in_month(2024, 12).unwrap(), 31);
        assert!(days_in_month(2024, 13).is_err());
        assert!(days_in_month(2024, 0).is_err());
    }

    #[test]
    fn kind_inference_follows_history() {
        let txs = vec![
            tx(TransactionKind::Income, "Freelance", 10_000, (2024, 3, 1)),
            tx(TransactionKind::Expense, "Freelance", 2_000, (2024, 3, 3)),
            tx(TransactionKind::Expense, "Food", 2_000, (2024, 3, 3)),
        ];
        assert_eq!(
            infer_kind(&txs, "freelance", CategoryKind::Expense),
            CategoryKind::Both
        );
        assert_eq!(
            infer_kind(&txs, "food", CategoryKind::Income),
            CategoryKind::Expense
        );
        assert_eq!(
            infer_kind(&txs, "unseen", CategoryKind::Income),
            CategoryKind::Income
        );
    }
}
