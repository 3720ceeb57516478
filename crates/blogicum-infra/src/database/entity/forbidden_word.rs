//! Blocklist entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "forbidden_words")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub word: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for blogicum_core::domain::ForbiddenWord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            word: model.word,
        }
    }
}

impl From<blogicum_core::domain::ForbiddenWord> for ActiveModel {
    fn from(word: blogicum_core::domain::ForbiddenWord) -> Self {
        Self {
            id: Set(word.id),
            word: Set(word.word),
        }
    }
}
