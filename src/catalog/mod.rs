pub mod client;
pub mod dto;

pub use client::{CatalogClient, MobyGamesClient};
pub use dto::GameResult;
