/// Tool usage counters
///
/// One record per (user, tool) pair, stored in `tool_usage.json`. The first
/// use of a tool inserts a record with a count of 1; every later use bumps the
/// count and refreshes `last_used` in place. Records are never deleted.
///
/// # Example
///
/// ```no_run
/// use toolbox_shared::db::RecordStore;
/// use toolbox_shared::models::tool_usage::ToolUsage;
/// use uuid::Uuid;
///
/// # async fn example(store: RecordStore, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// ToolUsage::record(&store, user_id, "translation").await?;
///
/// for usage in ToolUsage::list_by_user(&store, user_id).await {
///     println!("{}: {}", usage.tool_name, usage.usage_count);
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{RecordSet, RecordStore, StoreError};

/// Usage counter for one user and one tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolUsage {
    /// Surrogate record ID
    pub id: Uuid,

    /// User who used the tool
    pub user_id: Uuid,

    /// Tool identifier (e.g. "text-generator")
    pub tool_name: String,

    /// Number of times the user ran the tool
    pub usage_count: u64,

    /// Time of the most recent run
    pub last_used: DateTime<Utc>,
}

impl ToolUsage {
    /// Records one use of `tool_name` by `user_id`
    ///
    /// Find-or-create on the (user, tool) pair, then persists the whole set.
    ///
    /// # Returns
    ///
    /// The record as written.
    ///
    /// # Errors
    ///
    /// Returns an error if the usage file cannot be written.
    pub async fn record(
        store: &RecordStore,
        user_id: Uuid,
        tool_name: &str,
    ) -> Result<ToolUsage, StoreError> {
        let mut records = store.load::<ToolUsage>(RecordSet::ToolUsage).await;
        let now = Utc::now();

        let updated = match records
            .records
            .iter_mut()
            .find(|record| record.user_id == user_id && record.tool_name == tool_name)
        {
            Some(existing) => {
                existing.usage_count += 1;
                existing.last_used = now;
                existing.clone()
            }
            None => {
                let record = ToolUsage {
                    id: Uuid::new_v4(),
                    user_id,
                    tool_name: tool_name.to_string(),
                    usage_count: 1,
                    last_used: now,
                };
                records.records.push(record.clone());
                record
            }
        };

        store.save(RecordSet::ToolUsage, &records).await?;

        tracing::debug!(
            user_id = %user_id,
            tool = %tool_name,
            count = updated.usage_count,
            "Recorded tool usage"
        );
        Ok(updated)
    }

    /// Lists a user's usage records, most used first
    ///
    /// The sort is stable, so equal counts keep their on-disk order.
    pub async fn list_by_user(store: &RecordStore, user_id: Uuid) -> Vec<ToolUsage> {
        let records: Vec<ToolUsage> = store.read_all(RecordSet::ToolUsage).await;

        let mut mine: Vec<ToolUsage> = records
            .into_iter()
            .filter(|record| record.user_id == user_id)
            .collect();
        mine.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
        mine
    }
}
