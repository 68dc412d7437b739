//! Infrastructure layer - external service implementations

pub mod knowledge_base;
pub mod logging;
pub mod observability;
pub mod services;
