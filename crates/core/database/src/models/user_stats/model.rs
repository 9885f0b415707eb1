use iso8601_timestamp::Timestamp;

auto_derived!(
    /// Per-user submission counters
    pub struct UserStats {
        /// User Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Number of reports this user has submitted
        #[serde(default)]
        pub reports_submitted: u32,
        /// When these counters last changed
        #[serde(skip_serializing_if = "Option::is_none")]
        pub updated_at: Option<Timestamp>,
    }
);

#[cfg(test)]
mod tests {
    #[tokio::test]
    async fn increment_creates_then_increments() {
        database_test!(|db| async move {
            assert!(db.fetch_user_stats("user").await.is_err());

            db.increment_report_count("user").await.unwrap();
            let stats = db.fetch_user_stats("user").await.unwrap();
            assert_eq!(stats.reports_submitted, 1);
            assert!(stats.updated_at.is_some());

            db.increment_report_count("user").await.unwrap();
            let stats = db.fetch_user_stats("user").await.unwrap();
            assert_eq!(stats.reports_submitted, 2);
        });
    }
}
