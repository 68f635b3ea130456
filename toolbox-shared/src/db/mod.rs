/// Storage layer for AI Toolbox
///
/// This module provides the file-backed record store. Each record set lives in
/// its own JSON array file under a single data directory and is rewritten in
/// full on every mutation.
///
/// # Modules
///
/// - `store`: `RecordStore` handle, record set layout and raw read/write
/// - Models built on top of the store are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use toolbox_shared::db::{RecordSet, RecordStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = RecordStore::new("data");
///     store.init().await?;
///
///     let users: Vec<serde_json::Value> = store.read_all(RecordSet::Users).await;
///     println!("{} users on disk", users.len());
///     Ok(())
/// }
/// ```

pub mod store;

pub use store::{Loaded, RecordSet, RecordStore, StoreError};
