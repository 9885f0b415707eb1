use cleancity_result::Result;

use crate::{Report, ReportPage};

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractReports: Sync + Send {
    /// Insert a new report, assigning its id and server-side timestamps
    async fn insert_report(&self, report: &Report) -> Result<String>;

    /// Fetch every report, newest first, dropping records that fail to parse
    async fn fetch_reports(&self) -> Result<ReportPage>;
}
