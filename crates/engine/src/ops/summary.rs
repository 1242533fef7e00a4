use crate::{BalanceSummary, MonthlyReport, ResultEngine, summary};

use super::Engine;

impl Engine {
    /// Balance totals, optionally restricted to one calendar month.
    pub async fn balance_summary(
        &self,
        user_id: &str,
        month: Option<(i32, u32)>,
    ) -> ResultEngine<BalanceSummary> {
        let txs = self.list_transactions(user_id).await?;
        match month {
            Some((year, month)) => {
                summary::days_in_month(year, month)?;
                Ok(summary::monthly_balance(&txs, year, month))
            }
            None => Ok(summary::balance(&txs)),
        }
    }

    /// Expense breakdown and dense daily series for one month.
    pub async fn monthly_report(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> ResultEngine<MonthlyReport> {
        let txs = self.list_transactions(user_id).await?;
        let categories = summary::expense_breakdown(&txs, year, month);
        let daily_expense_minor = summary::daily_expense_series(&txs, year, month)?;
        let expense_minor = daily_expense_minor.iter().sum();
        Ok(MonthlyReport {
            year,
            month,
            expense_minor,
            categories,
            daily_expense_minor,
        })
    }
}
