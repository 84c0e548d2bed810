pub mod entity_repository;
pub mod post_repository;
pub mod schema;
pub mod user_repository;

pub use entity_repository::Entity;
