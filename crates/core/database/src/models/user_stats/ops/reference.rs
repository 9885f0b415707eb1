use iso8601_timestamp::Timestamp;

use cleancity_result::Result;

use crate::ReferenceDb;
use crate::UserStats;

use super::AbstractUserStats;

#[async_trait]
impl AbstractUserStats for ReferenceDb {
    /// Fetch counters for a user
    async fn fetch_user_stats(&self, user_id: &str) -> Result<UserStats> {
        let user_stats = self.user_stats.lock().await;
        user_stats
            .get(user_id)
            .cloned()
            .ok_or_else(|| create_error!(NotFound))
    }

    /// Increment the submitted-report counter, creating the record if absent
    async fn increment_report_count(&self, user_id: &str) -> Result<()> {
        let mut user_stats = self.user_stats.lock().await;
        let stats = user_stats
            .entry(user_id.to_string())
            .or_insert_with(|| UserStats {
                id: user_id.to_string(),
                reports_submitted: 0,
                updated_at: None,
            });

        stats.reports_submitted += 1;
        stats.updated_at = Some(Timestamp::now_utc());

        Ok(())
    }
}
