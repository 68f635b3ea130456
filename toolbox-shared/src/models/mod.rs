/// Record models for AI Toolbox
///
/// Each model owns the operations over its record set. All of them take the
/// `RecordStore` handle explicitly.
///
/// # Models
///
/// - `user`: User accounts and credential lookup
/// - `tool_usage`: Per-user, per-tool usage counters
/// - `favorite`: Per-user favorite tools
/// - `feedback`: Tool ratings (validated, not persisted)
///
/// # Example
///
/// ```no_run
/// use toolbox_shared::db::RecordStore;
/// use toolbox_shared::models::favorite::Favorite;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = RecordStore::new("data");
/// store.init().await?;
///
/// let added = Favorite::add(&store, Uuid::new_v4(), "translation").await?;
/// assert!(added);
/// # Ok(())
/// # }
/// ```

pub mod favorite;
pub mod feedback;
pub mod tool_usage;
pub mod user;
