mod client;

pub use client::{Client, ClientPayload};
