use sea_orm::entity::prelude::*;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{ConnectionTrait, PaginatorTrait, QueryFilter, Select, Set};

/// Join row linking a user to one favourite character or planet.
///
/// The schema guarantees that exactly one of `characters_id` and `planets_id`
/// is set and that a user can favourite a given target only once.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "favourites")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub characters_id: Option<i32>,
    pub planets_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::character::Entity",
        from = "Column::CharactersId",
        to = "super::character::Column::Id"
    )]
    Character,
    #[sea_orm(
        belongs_to = "super::planet::Entity",
        from = "Column::PlanetsId",
        to = "super::planet::Column::Id"
    )]
    Planet,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::character::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Character.def()
    }
}

impl Related<super::planet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Planet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// The thing a favourite points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FavouriteTarget {
    Character(i32),
    Planet(i32),
}

impl FavouriteTarget {
    /// Builds a target from the two nullable foreign key columns.
    /// Returns `None` unless exactly one of them is set.
    pub fn from_columns(characters_id: Option<i32>, planets_id: Option<i32>) -> Option<Self> {
        match (characters_id, planets_id) {
            (Some(id), None) => Some(Self::Character(id)),
            (None, Some(id)) => Some(Self::Planet(id)),
            _ => None,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Self::Character(id) | Self::Planet(id) => *id,
        }
    }

    /// Human readable entity name, used in log lines and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Character(_) => "Character",
            Self::Planet(_) => "Planet",
        }
    }

    fn column_filter(&self) -> SimpleExpr {
        match self {
            Self::Character(id) => Column::CharactersId.eq(*id),
            Self::Planet(id) => Column::PlanetsId.eq(*id),
        }
    }

    /// Checks that the referenced character or planet row exists.
    pub async fn exists<C: ConnectionTrait>(&self, db: &C) -> Result<bool, DbErr> {
        let count = match self {
            Self::Character(id) => super::character::Entity::find_by_id(*id).count(db).await?,
            Self::Planet(id) => super::planet::Entity::find_by_id(*id).count(db).await?,
        };
        Ok(count > 0)
    }

    /// Active model for a new favourite of this target owned by `user_id`.
    pub fn new_favourite(&self, user_id: i32) -> ActiveModel {
        let (characters_id, planets_id) = match self {
            Self::Character(id) => (Some(*id), None),
            Self::Planet(id) => (None, Some(*id)),
        };
        ActiveModel {
            user_id: Set(user_id),
            characters_id: Set(characters_id),
            planets_id: Set(planets_id),
            ..Default::default()
        }
    }
}

impl Entity {
    /// All favourites owned by a user.
    pub fn find_by_user(user_id: i32) -> Select<Entity> {
        Self::find().filter(Column::UserId.eq(user_id))
    }

    /// The favourite linking `user_id` to `target`, if any.
    pub fn find_by_user_and_target(user_id: i32, target: FavouriteTarget) -> Select<Entity> {
        Self::find_by_user(user_id).filter(target.column_filter())
    }
}

impl Model {
    pub fn target(&self) -> Option<FavouriteTarget> {
        FavouriteTarget::from_columns(self.characters_id, self.planets_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{character, planet, user};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, SqlErr};

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        user::ActiveModel {
            id: Set(1),
            name: Set("Leia Organa".to_string()),
            email: Set("leia@alderaan.gov".to_string()),
            password: Set("not-a-real-hash".to_string()),
        }
        .insert(&db)
        .await
        .unwrap();

        character::ActiveModel {
            id: Set(4),
            name: Set("Darth Vader".to_string()),
            gender: Set("male".to_string()),
            mass: Set("136".to_string()),
            height: Set("202".to_string()),
        }
        .insert(&db)
        .await
        .unwrap();

        planet::ActiveModel {
            id: Set(2),
            name: Set("Alderaan".to_string()),
            population: Set("2000000000".to_string()),
            terrain: Set("grasslands, mountains".to_string()),
        }
        .insert(&db)
        .await
        .unwrap();

        db
    }

    #[test]
    fn test_target_from_columns() {
        assert_eq!(
            FavouriteTarget::from_columns(Some(3), None),
            Some(FavouriteTarget::Character(3))
        );
        assert_eq!(
            FavouriteTarget::from_columns(None, Some(7)),
            Some(FavouriteTarget::Planet(7))
        );
        assert_eq!(FavouriteTarget::from_columns(Some(3), Some(7)), None);
        assert_eq!(FavouriteTarget::from_columns(None, None), None);
    }

    #[tokio::test]
    async fn test_target_exists() {
        let db = setup_test_db().await;

        assert!(FavouriteTarget::Character(4).exists(&db).await.unwrap());
        assert!(FavouriteTarget::Planet(2).exists(&db).await.unwrap());
        assert!(!FavouriteTarget::Character(2).exists(&db).await.unwrap());
        assert!(!FavouriteTarget::Planet(4).exists(&db).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_user_and_target_only_matches_that_kind() {
        let db = setup_test_db().await;

        let saved = FavouriteTarget::Character(4)
            .new_favourite(1)
            .insert(&db)
            .await
            .unwrap();
        assert_eq!(saved.target(), Some(FavouriteTarget::Character(4)));

        let found = Entity::find_by_user_and_target(1, FavouriteTarget::Character(4))
            .one(&db)
            .await
            .unwrap();
        assert_eq!(found.map(|f| f.id), Some(saved.id));

        // Same numeric id but the planet kind must not match
        let other_kind = Entity::find_by_user_and_target(1, FavouriteTarget::Planet(4))
            .one(&db)
            .await
            .unwrap();
        assert!(other_kind.is_none());

        let by_user = Entity::find_by_user(1).all(&db).await.unwrap();
        assert_eq!(by_user.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_favourite_violates_unique_index() {
        let db = setup_test_db().await;

        FavouriteTarget::Planet(2).new_favourite(1).insert(&db).await.unwrap();
        let err = FavouriteTarget::Planet(2)
            .new_favourite(1)
            .insert(&db)
            .await
            .unwrap_err();

        assert!(matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))));
        assert_eq!(Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_favourite_must_reference_exactly_one_target() {
        let db = setup_test_db().await;

        let both = ActiveModel {
            user_id: Set(1),
            characters_id: Set(Some(4)),
            planets_id: Set(Some(2)),
            ..Default::default()
        };
        assert!(both.insert(&db).await.is_err());

        let neither = ActiveModel {
            user_id: Set(1),
            characters_id: Set(None),
            planets_id: Set(None),
            ..Default::default()
        };
        assert!(neither.insert(&db).await.is_err());

        assert_eq!(Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_favourite_requires_existing_user() {
        let db = setup_test_db().await;

        let err = FavouriteTarget::Character(4)
            .new_favourite(42)
            .insert(&db)
            .await
            .unwrap_err();

        assert!(matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))));
    }
}
