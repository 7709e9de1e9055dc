/// Database models for QRBoxer
///
/// Each model maps one table and exposes `create`, `find_all`, `get`,
/// `update` and `remove` as associated functions taking the shared pool.
///
/// # Models
///
/// - `user`: accounts, registration and password authentication
/// - `moves`: relocation events owned by a user, with their boxes embedded
/// - `move_box`: boxes packed for a move
/// - `item`: items packed in a box
///
/// # Example
///
/// ```no_run
/// use qrboxer_shared::models::move_box::{BoxFilter, MoveBox};
/// use qrboxer_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::new("postgresql://localhost/qrboxer")).await?;
///
/// let kitchen = MoveBox::find_all(
///     &pool,
///     BoxFilter {
///         room: Some("Kitchen".to_string()),
///         ..Default::default()
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod item;
pub mod move_box;
pub mod moves;
pub mod user;
