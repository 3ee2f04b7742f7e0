use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Committed catalog product
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Supplier product code (unique)
    #[sea_orm(unique)]
    pub code: String,

    /// Name as it appeared in the input
    pub source_name: String,

    /// Translated display name
    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub category_id: i64,

    pub category_name: String,

    pub brand: Option<String>,

    pub image_url: Option<String>,

    /// Unit of measure
    pub unit: String,

    pub price: f64,

    /// 1-based position in the source input
    pub row_index: i64,

    pub committed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
