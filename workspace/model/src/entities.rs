//! SeaORM entities for the catalogue: users, characters, planets and the
//! favourites join table that links them.

pub mod character;
pub mod favourite;
pub mod planet;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::character::Entity as Character;
    pub use super::favourite::Entity as Favourite;
    pub use super::favourite::FavouriteTarget;
    pub use super::planet::Entity as Planet;
    pub use super::user::Entity as User;
}
