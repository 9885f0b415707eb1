use iso8601_timestamp::Timestamp;
use mongodb::options::UpdateOptions;

use cleancity_result::Result;

use crate::MongoDb;
use crate::UserStats;

use super::AbstractUserStats;

static COL: &str = "user_stats";

#[async_trait]
impl AbstractUserStats for MongoDb {
    /// Fetch counters for a user
    async fn fetch_user_stats(&self, user_id: &str) -> Result<UserStats> {
        query!(self, find_one_by_id, COL, user_id)?.ok_or_else(|| create_error!(NotFound))
    }

    /// Increment the submitted-report counter, creating the record if absent
    async fn increment_report_count(&self, user_id: &str) -> Result<()> {
        let updated_at = bson::to_bson(&Timestamp::now_utc())
            .map_err(|_| create_database_error!("update", COL))?;

        self.col::<bson::Document>(COL)
            .update_one(
                doc! { "_id": user_id },
                doc! {
                    "$inc": { "reports_submitted": 1 },
                    "$set": { "updated_at": updated_at },
                },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await
            .map(|_| ())
            .map_err(|_| create_database_error!("update", COL))
    }
}
