use iso8601_timestamp::Timestamp;
use mongodb::options::FindOptions;

use cleancity_result::Result;

use crate::MongoDb;
use crate::{Report, ReportPage};

use super::AbstractReports;

static COL: &str = "reports";

#[async_trait]
impl AbstractReports for MongoDb {
    /// Insert a new report, assigning its id and server-side timestamps
    async fn insert_report(&self, report: &Report) -> Result<String> {
        let id = ulid::Ulid::new().to_string();
        let now = Timestamp::now_utc();

        let mut stored = report.clone();
        stored.id = id.clone();
        stored.created_at = Some(now);
        stored.updated_at = Some(now);

        query!(self, insert_one, COL, &stored).map(|_| id)
    }

    /// Fetch every report, newest first, dropping records that fail to parse
    async fn fetch_reports(&self) -> Result<ReportPage> {
        // created_at is stored as ISO-8601 text, which sorts chronologically
        let documents: Vec<bson::Document> = query!(
            self,
            find_with_options,
            COL,
            doc! {},
            FindOptions::builder()
                .sort(doc! { "created_at": -1 })
                .build()
        )?;

        let mut reports = Vec::with_capacity(documents.len());
        let mut dropped = 0;

        for document in documents {
            match bson::from_document::<Report>(document) {
                Ok(report) => reports.push(report),
                Err(err) => {
                    warn!("dropping malformed report: {err}");
                    dropped += 1;
                }
            }
        }

        Ok(ReportPage { reports, dropped })
    }
}
