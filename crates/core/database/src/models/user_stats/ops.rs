use cleancity_result::Result;

use crate::UserStats;

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractUserStats: Sync + Send {
    /// Fetch counters for a user
    async fn fetch_user_stats(&self, user_id: &str) -> Result<UserStats>;

    /// Increment the submitted-report counter, creating the record if absent
    async fn increment_report_count(&self, user_id: &str) -> Result<()>;
}
