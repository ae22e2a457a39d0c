use sea_orm_migration::prelude::*;

const USER_CHARACTER_INDEX: &str = "uq_favourites_user_character";
const USER_PLANET_INDEX: &str = "uq_favourites_user_planet";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // NULL targets never collide, so each index only constrains its own kind
        manager
            .create_index(
                Index::create()
                    .name(USER_CHARACTER_INDEX)
                    .table(Favourites::Table)
                    .col(Favourites::UserId)
                    .col(Favourites::CharactersId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(USER_PLANET_INDEX)
                    .table(Favourites::Table)
                    .col(Favourites::UserId)
                    .col(Favourites::PlanetsId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(USER_PLANET_INDEX)
                    .table(Favourites::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(USER_CHARACTER_INDEX)
                    .table(Favourites::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Favourites {
    Table,
    UserId,
    CharactersId,
    PlanetsId,
}
