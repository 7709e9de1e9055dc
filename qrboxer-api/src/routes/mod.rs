/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login and registration
/// - `users`: User management (guarded)
/// - `moves`: Moves and their boxes
/// - `boxes`: Boxes and their items
/// - `items`: Items
use serde::{Deserialize, Serialize};

pub mod auth;
pub mod boxes;
pub mod health;
pub mod items;
pub mod moves;
pub mod users;

/// Body returned by every `DELETE` route
#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted<T> {
    pub deleted: T,
}
