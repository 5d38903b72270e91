use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Reviews::Table)
                    .col(Reviews::MovieId)
                    .name("idx_reviews_movie_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Watchlists::Table)
                    .col(Watchlists::UserId)
                    .name("idx_watchlists_user_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Movies::Table)
                    .col(Movies::CreatedAt)
                    .name("idx_movies_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_movies_created_at").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_watchlists_user_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reviews_movie_id").to_owned())
            .await
    }
}

#[derive(Iden)]
enum Reviews {
    Table,
    MovieId,
}

#[derive(Iden)]
enum Watchlists {
    Table,
    UserId,
}

#[derive(Iden)]
enum Movies {
    Table,
    CreatedAt,
}
