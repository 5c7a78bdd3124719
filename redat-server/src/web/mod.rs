//! Web layer for the fare map.
//!
//! Serves the search page, the map page and their JSON counterparts.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
