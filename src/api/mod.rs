//! Backend API access
//!
//! - `WorkspaceService` / `ChatService` - async traits the client state is driven through
//! - `HttpClient` - reqwest implementation of both
//! - wire types for the JSON bodies

mod client;
mod service;
mod types;

pub use client::*;
pub use service::*;
pub use types::*;
