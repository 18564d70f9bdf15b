//! HTTP adapters for the workout backend

mod client;
mod gateway;

pub use client::{ApiClient, ApiError};
pub use gateway::HttpCommandGateway;
