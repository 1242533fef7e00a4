use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, users, users::UserProfile, util};

use super::{Engine, with_tx};

/// Profile fields accepted by the sync operation.
///
/// Absent fields are left untouched, which makes repeated syncs with the
/// same payload idempotent.
#[derive(Clone, Debug, Default)]
pub struct SyncUserCmd {
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub currency: Option<String>,
}

impl Engine {
    /// Create the user row on first sight of a verified subject.
    ///
    /// Called by the auth middleware on every request; existing rows are
    /// returned untouched.
    pub async fn ensure_user(
        &self,
        subject: &str,
        email: Option<&str>,
    ) -> ResultEngine<UserProfile> {
        with_tx!(self, |db_tx| {
            let existing = users::Entity::find_by_id(subject.to_string())
                .one(&db_tx)
                .await?;
            let model = match existing {
                Some(model) => model,
                None => {
                    let active = users::ActiveModel {
                        id: ActiveValue::Set(subject.to_string()),
                        email: ActiveValue::Set(util::normalize_optional_text(email)),
                        name: ActiveValue::Set(None),
                        username: ActiveValue::Set(None),
                        currency: ActiveValue::Set(users::DEFAULT_CURRENCY.to_string()),
                    };
                    active.insert(&db_tx).await?
                }
            };
            Ok(UserProfile::from(model))
        })
    }

    /// Idempotent profile upsert backing `POST /auth/sync`.
    pub async fn sync_user(&self, cmd: SyncUserCmd) -> ResultEngine<UserProfile> {
        let email = util::normalize_optional_text(cmd.email.as_deref());
        let name = util::normalize_optional_text(cmd.name.as_deref());
        let username = util::normalize_optional_text(cmd.username.as_deref());
        let currency = util::normalize_optional_text(cmd.currency.as_deref());

        with_tx!(self, |db_tx| {
            let existing = users::Entity::find_by_id(cmd.subject.clone())
                .one(&db_tx)
                .await?;
            let model = match existing {
                Some(model) => {
                    let mut changed = false;
                    let mut active: users::ActiveModel = model.clone().into();
                    if let Some(email) = email {
                        active.email = ActiveValue::Set(Some(email));
                        changed = true;
                    }
                    if let Some(name) = name {
                        active.name = ActiveValue::Set(Some(name));
                        changed = true;
                    }
                    if let Some(username) = username {
                        active.username = ActiveValue::Set(Some(username));
                        changed = true;
                    }
                    if let Some(currency) = currency {
                        active.currency = ActiveValue::Set(currency);
                        changed = true;
                    }
                    if changed {
                        active.update(&db_tx).await?
                    } else {
                        model
                    }
                }
                None => {
                    let active = users::ActiveModel {
                        id: ActiveValue::Set(cmd.subject.clone()),
                        email: ActiveValue::Set(email),
                        name: ActiveValue::Set(name),
                        username: ActiveValue::Set(username),
                        currency: ActiveValue::Set(
                            currency.unwrap_or_else(|| users::DEFAULT_CURRENCY.to_string()),
                        ),
                    };
                    active.insert(&db_tx).await?
                }
            };
            Ok(UserProfile::from(model))
        })
    }

    pub async fn user_profile(&self, user_id: &str) -> ResultEngine<UserProfile> {
        let model = users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        Ok(UserProfile::from(model))
    }

    /// Update display name and/or preferred currency.
    pub async fn update_profile(
        &self,
        user_id: &str,
        name: Option<&str>,
        currency: Option<&str>,
    ) -> ResultEngine<UserProfile> {
        let name = match name {
            Some(value) => Some(util::normalize_display(value).ok_or_else(|| {
                EngineError::InvalidField("name must not be empty".to_string())
            })?),
            None => None,
        };
        let currency = match currency {
            Some(value) => Some(util::normalize_display(value).ok_or_else(|| {
                EngineError::InvalidField("currency must not be empty".to_string())
            })?),
            None => None,
        };

        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

            let mut changed = false;
            let mut active: users::ActiveModel = model.clone().into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(Some(name));
                changed = true;
            }
            if let Some(currency) = currency {
                active.currency = ActiveValue::Set(currency);
                changed = true;
            }
            let model = if changed {
                active.update(&db_tx).await?
            } else {
                model
            };
            Ok(UserProfile::from(model))
        })
    }
}
