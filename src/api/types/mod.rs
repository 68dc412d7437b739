//! Request and response types shared by the HTTP endpoints

pub mod error;
pub mod json;
pub mod rpc;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use rpc::{RpcRequest, RpcResponse};
