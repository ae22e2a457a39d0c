use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::Name, 250))
                    .col(string_len(Users::Email, 250))
                    .col(string_len(Users::Password, 80))
                    .to_owned(),
            )
            .await?;

        // Create characters table
        manager
            .create_table(
                Table::create()
                    .table(Characters::Table)
                    .if_not_exists()
                    .col(pk_auto(Characters::Id))
                    .col(string_len(Characters::Name, 250))
                    .col(string_len(Characters::Gender, 20))
                    .col(string_len(Characters::Mass, 250))
                    .col(string_len(Characters::Height, 250))
                    .to_owned(),
            )
            .await?;

        // Create planets table
        manager
            .create_table(
                Table::create()
                    .table(Planets::Table)
                    .if_not_exists()
                    .col(pk_auto(Planets::Id))
                    .col(string_len(Planets::Name, 250))
                    .col(string_len(Planets::Population, 250))
                    .col(string_len(Planets::Terrain, 250))
                    .to_owned(),
            )
            .await?;

        // Create favourites table (join table).
        // A favourite always has an owner and exactly one target.
        manager
            .create_table(
                Table::create()
                    .table(Favourites::Table)
                    .if_not_exists()
                    .col(pk_auto(Favourites::Id))
                    .col(integer(Favourites::UserId))
                    .col(integer_null(Favourites::CharactersId))
                    .col(integer_null(Favourites::PlanetsId))
                    .check(Expr::cust(
                        "(characters_id IS NULL) <> (planets_id IS NULL)",
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favourites_user")
                            .from(Favourites::Table, Favourites::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favourites_character")
                            .from(Favourites::Table, Favourites::CharactersId)
                            .to(Characters::Table, Characters::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favourites_planet")
                            .from(Favourites::Table, Favourites::PlanetsId)
                            .to(Planets::Table, Planets::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Favourites::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Planets::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Characters::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Password,
}

#[derive(DeriveIden)]
enum Characters {
    Table,
    Id,
    Name,
    Gender,
    Mass,
    Height,
}

#[derive(DeriveIden)]
enum Planets {
    Table,
    Id,
    Name,
    Population,
    Terrain,
}

#[derive(DeriveIden)]
enum Favourites {
    Table,
    Id,
    UserId,
    CharactersId,
    PlanetsId,
}
