//! Category registry.
//!
//! Categories come in two flavors: a compiled-in static set shared by every
//! user, and user-defined rows created explicitly or implicitly the first
//! time a transaction uses an unseen name. Only the latter are persisted.
//!
//! A category has no stored kind. Whether it holds income, expenses or both
//! is inferred from the owner's transaction history at read time; static
//! entries ship with a fixed kind.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    Expense,
    Both,
}

/// A compiled-in category available to every user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticCategory {
    pub name: &'static str,
    pub icon: &'static str,
    pub kind: CategoryKind,
}

/// The predefined set, shared across all users and never persisted.
pub const STATIC_CATEGORIES: &[StaticCategory] = &[
    StaticCategory { name: "Salary", icon: "dollarsign.circle.fill", kind: CategoryKind::Income },
    StaticCategory { name: "Income", icon: "dollarsign.circle.fill", kind: CategoryKind::Income },
    StaticCategory { name: "Food", icon: "fork.knife", kind: CategoryKind::Expense },
    StaticCategory { name: "Shopping", icon: "bag.fill", kind: CategoryKind::Expense },
    StaticCategory { name: "Transport", icon: "car.fill", kind: CategoryKind::Expense },
    StaticCategory { name: "Entertainment", icon: "gamecontroller.fill", kind: CategoryKind::Expense },
    StaticCategory { name: "Utilities", icon: "bolt.fill", kind: CategoryKind::Expense },
    StaticCategory { name: "Health", icon: "heart.fill", kind: CategoryKind::Expense },
    StaticCategory { name: "Education", icon: "book.fill", kind: CategoryKind::Expense },
    StaticCategory { name: "Investment", icon: "chart.pie.fill", kind: CategoryKind::Income },
    StaticCategory { name: "Rent", icon: "house.fill", kind: CategoryKind::Expense },
    StaticCategory { name: "Groceries", icon: "cart.fill", kind: CategoryKind::Expense },
    StaticCategory { name: "Dining Out", icon: "wineglass.fill", kind: CategoryKind::Expense },
    StaticCategory { name: "Others", icon: "circle.grid.2x2.fill", kind: CategoryKind::Expense },
];

/// Icon assigned to implicitly created user categories.
pub(crate) const CUSTOM_CATEGORY_ICON: &str = "tag";

/// Look up a static category by its normalized name.
pub fn static_category(name_norm: &str) -> Option<&'static StaticCategory> {
    STATIC_CATEGORIES
        .iter()
        .find(|category| crate::util::normalize_key(category.name) == name_norm)
}

/// A category resolved for a user, with its inferred kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Category {
    Static {
        name: String,
        icon: String,
        kind: CategoryKind,
    },
    UserDefined {
        id: Uuid,
        name: String,
        icon: String,
        color: Option<String>,
        kind: CategoryKind,
    },
}

impl Category {
    pub fn name(&self) -> &str {
        match self {
            Self::Static { name, .. } | Self::UserDefined { name, .. } => name,
        }
    }

    pub fn kind(&self) -> CategoryKind {
        match self {
            Self::Static { kind, .. } | Self::UserDefined { kind, .. } => *kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub name_norm: String,
    pub icon: String,
    pub color: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub(crate) fn into_category(self, kind: CategoryKind) -> Category {
        Category::UserDefined {
            id: self.id,
            name: self.name,
            icon: self.icon,
            color: self.color,
            kind,
        }
    }
}

pub(crate) fn new_active_model(
    user_id: &str,
    name: &str,
    name_norm: &str,
    icon: &str,
    color: Option<String>,
) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        user_id: ActiveValue::Set(user_id.to_string()),
        name: ActiveValue::Set(name.to_string()),
        name_norm: ActiveValue::Set(name_norm.to_string()),
        icon: ActiveValue::Set(icon.to_string()),
        color: ActiveValue::Set(color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_lookup_is_case_insensitive() {
        assert!(static_category("food").is_some());
        assert!(static_category("dining out").is_some());
        assert!(static_category("freelance").is_none());
    }

    #[test]
    fn static_set_has_no_duplicate_keys() {
        let mut keys: Vec<String> = STATIC_CATEGORIES
            .iter()
            .map(|category| crate::util::normalize_key(category.name))
            .collect();
        keys.sort();
        let len = keys.len();
        keys.dedup();
        assert_eq!(len, keys.len());
    }
}
