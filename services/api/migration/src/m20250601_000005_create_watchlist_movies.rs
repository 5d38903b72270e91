use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WatchlistMovies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WatchlistMovies::WatchlistId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WatchlistMovies::MovieId).integer().not_null())
                    .col(
                        ColumnDef::new(WatchlistMovies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(WatchlistMovies::WatchlistId)
                            .col(WatchlistMovies::MovieId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(WatchlistMovies::Table, WatchlistMovies::WatchlistId)
                            .to(Watchlists::Table, Watchlists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(WatchlistMovies::Table, WatchlistMovies::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WatchlistMovies::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum WatchlistMovies {
    Table,
    WatchlistId,
    MovieId,
    CreatedAt,
}

#[derive(Iden)]
enum Watchlists {
    Table,
    Id,
}

#[derive(Iden)]
enum Movies {
    Table,
    Id,
}
