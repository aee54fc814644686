//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_item_store;
mod postgres_item_store;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_item_store::InMemoryItemStore;
pub use postgres_item_store::PostgresItemStore;
