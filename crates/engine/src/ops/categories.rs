use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    CategoryKind, EngineError, ResultEngine, STATIC_CATEGORIES, categories,
    categories::{CUSTOM_CATEGORY_ICON, Category, static_category},
    summary, transactions, util,
};

use super::{Engine, with_tx};

const UNCATEGORIZED_NAME: &str = "Uncategorized";

impl Engine {
    /// Resolve free-text input to a canonical category display name.
    ///
    /// Blank input collapses to `Uncategorized`; static names win over user
    /// rows; an unseen name is registered as a user category on the spot.
    pub(super) async fn resolve_category(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        input: Option<&str>,
    ) -> ResultEngine<String> {
        let Some(display) = input.and_then(util::normalize_display) else {
            return Ok(UNCATEGORIZED_NAME.to_string());
        };

        let normalized = util::normalize_key(&display);
        if normalized == "uncategorized" {
            return Ok(UNCATEGORIZED_NAME.to_string());
        }
        if let Some(static_cat) = static_category(&normalized) {
            return Ok(static_cat.name.to_string());
        }

        if let Some(model) = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(categories::Column::NameNorm.eq(normalized.clone()))
            .one(db_tx)
            .await?
        {
            return Ok(model.name);
        }

        let active =
            categories::new_active_model(user_id, &display, &normalized, CUSTOM_CATEGORY_ICON, None);
        let model = active.insert(db_tx).await?;
        Ok(model.name)
    }

    /// The static set plus the user's own categories, each with its kind
    /// inferred from the user's transaction history.
    pub async fn list_categories(
        &self,
        user_id: &str,
        fallback: CategoryKind,
    ) -> ResultEngine<Vec<Category>> {
        let txs = self.list_transactions(user_id).await?;
        let models = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;

        let mut result = Vec::with_capacity(STATIC_CATEGORIES.len() + models.len());
        for static_cat in STATIC_CATEGORIES {
            result.push(Category::Static {
                name: static_cat.name.to_string(),
                icon: static_cat.icon.to_string(),
                kind: static_cat.kind,
            });
        }
        for model in models {
            let kind = summary::infer_kind(&txs, &model.name_norm, fallback);
            result.push(model.into_category(kind));
        }
        Ok(result)
    }

    /// Rename/restyle a user category.
    ///
    /// Renames rewrite the `category` field of referencing transactions in
    /// the same DB transaction, so grouping and the in-use check stay
    /// consistent.
    pub async fn update_category(
        &self,
        user_id: &str,
        category_id: Uuid,
        name: &str,
        icon: &str,
        color: Option<&str>,
    ) -> ResultEngine<()> {
        let display = util::normalize_display(name)
            .ok_or_else(|| EngineError::InvalidField("category name must not be empty".to_string()))?;
        let icon = util::normalize_display(icon)
            .ok_or_else(|| EngineError::InvalidField("category icon must not be empty".to_string()))?;
        let normalized = util::normalize_key(&display);

        with_tx!(self, |db_tx| {
            let model = categories::Entity::find_by_id(category_id)
                .filter(categories::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;

            if static_category(&normalized).is_some() {
                return Err(EngineError::ExistingKey(display.clone()));
            }
            let collision = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .filter(categories::Column::NameNorm.eq(normalized.clone()))
                .filter(categories::Column::Id.ne(category_id))
                .one(&db_tx)
                .await?
                .is_some();
            if collision {
                return Err(EngineError::ExistingKey(display.clone()));
            }

            let old_name = model.name.clone();
            let mut active: categories::ActiveModel = model.into();
            active.name = ActiveValue::Set(display.clone());
            active.name_norm = ActiveValue::Set(normalized.clone());
            active.icon = ActiveValue::Set(icon.clone());
            active.color = ActiveValue::Set(util::normalize_optional_text(color));
            let model = active.update(&db_tx).await?;

            if old_name != model.name {
                transactions::Entity::update_many()
                    .col_expr(
                        transactions::Column::Category,
                        Expr::value(model.name.clone()),
                    )
                    .filter(transactions::Column::UserId.eq(user_id))
                    .filter(transactions::Column::Category.eq(old_name))
                    .exec(&db_tx)
                    .await?;
            }
            Ok(())
        })
    }

    /// Delete an unused user category; a referenced one is a conflict.
    pub async fn delete_category(&self, user_id: &str, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = categories::Entity::find_by_id(category_id)
                .filter(categories::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;

            let in_use = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::Category.eq(model.name.clone()))
                .count(&db_tx)
                .await?;
            if in_use > 0 {
                return Err(EngineError::CategoryInUse(model.name));
            }

            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
