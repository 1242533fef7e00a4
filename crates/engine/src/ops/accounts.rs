use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, accounts, accounts::Account};

use super::{Engine, normalize_required, with_tx};

impl Engine {
    /// Create an account for a user.
    pub async fn create_account(
        &self,
        user_id: &str,
        name: &str,
        kind: &str,
    ) -> ResultEngine<Account> {
        let name = normalize_required(name, "account name")?;
        let kind = normalize_required(kind, "account type")?;
        with_tx!(self, |db_tx| {
            let account = Account::new(user_id.to_string(), name, kind);
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            Ok(account)
        })
    }

    /// All accounts owned by a user, oldest first.
    pub async fn list_accounts(&self, user_id: &str) -> ResultEngine<Vec<Account>> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::CreatedAt)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Account::from).collect())
    }

    /// Ownership guard: a foreign account is indistinguishable from a
    /// missing one.
    pub(super) async fn require_account_owned(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        account_id: Uuid,
    ) -> ResultEngine<()> {
        let exists = accounts::Entity::find_by_id(account_id)
            .filter(accounts::Column::UserId.eq(user_id))
            .one(db_tx)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound("account not exists".to_string()));
        }
        Ok(())
    }
}
