use sea_orm::entity::prelude::*;

/// Catalog entry. `average_rating` is derived from reviews and is `None`
/// while the movie has none.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub director: String,
    pub genre: String,
    pub release_year: i32,
    pub duration: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub average_rating: Option<f64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::watchlist_movies::Entity")]
    WatchlistMovies,
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::watchlist_movies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WatchlistMovies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
