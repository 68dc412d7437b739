//! API layer - HTTP endpoints and middleware

pub mod health;
pub mod invoke;
pub mod mcp;
pub mod middleware;
pub mod router;
pub mod state;
pub mod tools;
pub mod types;

pub use router::create_router;
pub use state::{AppState, GatewaySettings};
