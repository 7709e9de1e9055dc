/// Database layer
///
/// - `pool`: connection pool creation and health checks
/// - `migrations`: embedded schema migrations
/// - `sql`: partial-update and filter clause builders used by the models
///
/// Models themselves live in the crate-level `models` module.

pub mod migrations;
pub mod pool;
pub mod sql;
