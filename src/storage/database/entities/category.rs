use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog category
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    /// Parent category, `None` for top-level categories
    pub parent_id: Option<i64>,

    /// `Parent / Name` lookup key (unique)
    #[sea_orm(unique)]
    pub path: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lookup key for a category under an optional parent
pub fn category_path(name: &str, parent: Option<&str>) -> String {
    match parent {
        Some(parent) => format!("{} / {}", parent, name),
        None => name.to_string(),
    }
}
