mod client_repository;

pub use client_repository::{ClientRepository, SqliteClientRepository};
