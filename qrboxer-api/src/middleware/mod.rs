/// Middleware modules for the API server
///
/// - `auth`: bearer-token authentication and route guards

pub mod auth;
