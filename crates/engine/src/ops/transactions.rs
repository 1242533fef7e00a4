use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Transaction, TransactionKind, transactions, util};

use super::{Engine, with_tx};

pub struct CreateTransactionCmd {
    pub user_id: String,
    pub account_id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub category: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

pub struct UpdateTransactionCmd {
    pub user_id: String,
    pub transaction_id: Uuid,
    pub account_id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub category: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl Engine {
    /// Create a transaction against one of the caller's accounts.
    ///
    /// The category is free text: unseen non-static names are registered as
    /// user categories inside the same DB transaction.
    pub async fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            self.require_account_owned(&db_tx, &cmd.user_id, cmd.account_id)
                .await?;
            let category = self
                .resolve_category(&db_tx, &cmd.user_id, cmd.category.as_deref())
                .await?;
            let tx = Transaction::new(
                cmd.user_id,
                cmd.account_id,
                cmd.kind,
                category,
                cmd.amount_minor,
                util::normalize_optional_text(cmd.note.as_deref()),
                cmd.occurred_at,
            )?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(tx)
        })
    }

    /// All of a user's transactions, newest first (id as tie-break).
    pub async fn list_transactions(&self, user_id: &str) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_desc(transactions::Column::Id)
            .all(&self.database)
            .await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    /// Full-field update of an owned transaction.
    pub async fn update_transaction(
        &self,
        cmd: UpdateTransactionCmd,
    ) -> ResultEngine<Transaction> {
        if cmd.amount_minor <= 0 {
            return Err(EngineError::InvalidField(
                "amount_minor must be > 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(cmd.transaction_id)
                .filter(transactions::Column::UserId.eq(cmd.user_id.as_str()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
            self.require_account_owned(&db_tx, &cmd.user_id, cmd.account_id)
                .await?;
            let category = self
                .resolve_category(&db_tx, &cmd.user_id, cmd.category.as_deref())
                .await?;

            let mut active: transactions::ActiveModel = model.into();
            active.account_id = ActiveValue::Set(cmd.account_id);
            active.kind = ActiveValue::Set(cmd.kind.as_str().to_string());
            active.category = ActiveValue::Set(category);
            active.amount_minor = ActiveValue::Set(cmd.amount_minor);
            active.note = ActiveValue::Set(util::normalize_optional_text(cmd.note.as_deref()));
            active.occurred_at = ActiveValue::Set(cmd.occurred_at);
            let model = active.update(&db_tx).await?;
            Transaction::try_from(model)
        })
    }

    /// Delete an owned transaction; deleting an absent one is an error.
    pub async fn delete_transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = transactions::Entity::delete_many()
                .filter(transactions::Column::Id.eq(transaction_id))
                .filter(transactions::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("transaction not exists".to_string()));
            }
            Ok(())
        })
    }
}
