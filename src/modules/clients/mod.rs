// Clients module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::Client;
pub use repositories::{ClientRepository, SqliteClientRepository};
pub use services::ClientService;
