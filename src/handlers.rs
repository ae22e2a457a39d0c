pub mod characters;
pub mod favourites;
pub mod health;
pub mod planets;
pub mod users;
