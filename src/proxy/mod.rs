// proxy module - BFF request forwarding core

pub mod auth;
pub mod descriptor;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod relay;
pub mod routes;
pub mod server;
pub mod upstream;

pub use descriptor::{ResponseMode, RouteForward};
pub use error::ProxyError;
pub use server::AppState;
