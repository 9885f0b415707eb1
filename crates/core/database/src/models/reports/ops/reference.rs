use iso8601_timestamp::Timestamp;

use cleancity_result::Result;

use crate::ReferenceDb;
use crate::{Report, ReportPage};

use super::AbstractReports;

#[async_trait]
impl AbstractReports for ReferenceDb {
    /// Insert a new report, assigning its id and server-side timestamps
    async fn insert_report(&self, report: &Report) -> Result<String> {
        let mut reports = self.reports.lock().await;

        let id = ulid::Ulid::new().to_string();
        let now = Timestamp::now_utc();

        let mut stored = report.clone();
        stored.id = id.clone();
        stored.created_at = Some(now);
        stored.updated_at = Some(now);

        let document = serde_json::to_value(&stored)
            .map_err(|_| create_database_error!("insert", "reports"))?;
        reports.insert(id.clone(), document);

        Ok(id)
    }

    /// Fetch every report, newest first, dropping records that fail to parse
    async fn fetch_reports(&self) -> Result<ReportPage> {
        let documents = self.reports.lock().await;

        let mut reports = Vec::with_capacity(documents.len());
        let mut dropped = 0;

        for (id, document) in documents.iter() {
            match serde_json::from_value::<Report>(document.clone()) {
                Ok(report) => reports.push(report),
                Err(err) => {
                    warn!("dropping malformed report {id}: {err}");
                    dropped += 1;
                }
            }
        }

        reports.sort_by_key(|report| std::cmp::Reverse(report.created_seconds()));

        Ok(ReportPage { reports, dropped })
    }
}
