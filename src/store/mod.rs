pub mod client;

pub use client::{ApiConfig, GraphQlClient};
