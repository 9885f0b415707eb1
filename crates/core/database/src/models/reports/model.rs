use cleancity_models::v0::{ReportCategory, ReportStatus};
use iso8601_timestamp::Timestamp;

auto_derived!(
    /// Community report of a waste or sanitation issue
    pub struct Report {
        /// Unique Id, assigned by the database on insert
        #[serde(rename = "_id")]
        pub id: String,
        /// Id of the user who submitted this report
        pub author_id: String,
        /// Display name of the submitting user
        pub author_name: String,
        /// Avatar URL of the submitting user
        #[serde(default)]
        pub author_avatar: String,
        /// Public URL of the report photo
        pub photo_url: String,
        /// Free-text description of the issue
        pub description: String,
        /// Issue category
        pub category: ReportCategory,
        /// Where the issue was captured
        pub location: ReportLocation,
        /// Triage status, driven by the municipal backend
        pub status: ReportStatus,
        /// Number of upvotes
        #[serde(default)]
        pub upvotes: u32,
        /// Ids of users who upvoted
        #[serde(default)]
        pub upvoted_by: Vec<String>,
        /// Number of comments
        #[serde(default)]
        pub comment_count: u32,
        /// When this report was created
        #[serde(skip_serializing_if = "Option::is_none")]
        pub created_at: Option<Timestamp>,
        /// When this report was last updated
        #[serde(skip_serializing_if = "Option::is_none")]
        pub updated_at: Option<Timestamp>,
        /// When this report was resolved
        #[serde(skip_serializing_if = "Option::is_none")]
        pub resolved_at: Option<Timestamp>,
        /// Id of the operator who resolved this report
        #[serde(skip_serializing_if = "Option::is_none")]
        pub resolved_by: Option<String>,
    }

    /// Geotagged capture location
    pub struct ReportLocation {
        pub latitude: f64,
        pub longitude: f64,
        /// Human-readable address line
        #[serde(default)]
        pub address: String,
        /// City name, "Unknown" when reverse geocoding produced none
        #[serde(default)]
        pub city: String,
        /// Proximity-grouping hash of the coordinates
        #[serde(default)]
        pub geohash: String,
    }
);

/// Result of one bulk feed read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPage {
    /// Reports that parsed, newest first
    pub reports: Vec<Report>,
    /// Number of records dropped by the defensive parse
    pub dropped: usize,
}

impl Report {
    /// Creation time as whole seconds since the epoch, 0 when unset
    pub fn created_seconds(&self) -> i64 {
        self.created_at
            .map(|timestamp| timestamp.assume_utc().unix_timestamp())
            .unwrap_or(0)
    }
}
