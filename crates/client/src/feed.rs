//! Community feed: one bulk fetch, client-side filter and sort.

use std::sync::Arc;

use tokio::sync::watch;

use cleancity_database::{Database, Report};
use cleancity_location::{haversine_km, AbstractLocation, Coordinates};
use cleancity_models::v0::{ReportFilter, ReportSort};

/// State of the feed load operation
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FeedState {
    #[default]
    Idle,
    Loading,
    Success(Vec<Report>),
    Error(String),
}

/// Fetches the report collection and derives the filtered, sorted view.
///
/// The unfiltered collection is the source of truth; filter and sort
/// changes only recompute the derived view and never refetch.
pub struct FeedController {
    db: Database,
    location: Arc<dyn AbstractLocation>,
    all_reports: Vec<Report>,
    dropped: usize,
    device_location: Option<Coordinates>,
    filter: ReportFilter,
    sort: ReportSort,
    state: watch::Sender<FeedState>,
}

impl FeedController {
    pub fn new(db: Database, location: Arc<dyn AbstractLocation>) -> Self {
        FeedController {
            db,
            location,
            all_reports: vec![],
            dropped: 0,
            device_location: None,
            filter: ReportFilter::All,
            sort: ReportSort::Newest,
            state: watch::channel(Default::default()).0,
        }
    }

    pub fn state(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    pub fn current_state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    pub fn current_filter(&self) -> ReportFilter {
        self.filter
    }

    pub fn current_sort(&self) -> ReportSort {
        self.sort
    }

    /// Records dropped by the defensive parse on the last successful fetch
    pub fn dropped_records(&self) -> usize {
        self.dropped
    }

    /// Fetch the full report collection and recompute the derived view.
    ///
    /// A failed fetch surfaces as Error and leaves the previously cached
    /// collection untouched.
    pub async fn fetch_reports(&mut self) {
        self.state.send_replace(FeedState::Loading);

        match self.db.fetch_reports().await {
            Ok(page) => {
                if page.dropped > 0 {
                    warn!("feed fetch dropped {} malformed records", page.dropped);
                }

                self.all_reports = page.reports;
                self.dropped = page.dropped;
                self.apply_filter_and_sort();
            }
            Err(error) => {
                self.state
                    .send_replace(FeedState::Error(format!("Failed to load reports: {error}")));
            }
        }
    }

    /// Re-run the fetch from scratch
    pub async fn refresh_reports(&mut self) {
        self.fetch_reports().await
    }

    /// Best-effort device position for Nearest sorting.
    ///
    /// Failure never blocks feed display; the feed simply keeps sorting
    /// without a reference point.
    pub async fn fetch_device_location(&mut self) {
        match self.location.current_coordinates().await {
            Ok(Some(coords)) => self.device_location = Some(coords),
            Ok(None) => {}
            Err(error) => warn!("failed to fetch device location: {error}"),
        }
    }

    pub fn on_filter_change(&mut self, filter: ReportFilter) {
        self.filter = filter;
        self.apply_filter_and_sort();
    }

    pub fn on_sort_change(&mut self, sort: ReportSort) {
        self.sort = sort;
        self.apply_filter_and_sort();
    }

    fn apply_filter_and_sort(&mut self) {
        let mut reports: Vec<Report> = self
            .all_reports
            .iter()
            .filter(|report| self.filter.matches(&report.status))
            .cloned()
            .collect();

        match self.sort {
            ReportSort::Newest => {
                reports.sort_by_key(|report| std::cmp::Reverse(report.created_seconds()));
            }
            ReportSort::Oldest => {
                reports.sort_by_key(|report| report.created_seconds());
            }
            ReportSort::MostUpvoted => {
                reports.sort_by_key(|report| std::cmp::Reverse(report.upvotes));
            }
            ReportSort::Nearest => {
                // Without a device position the filtered list stays in
                // fetch order.
                if let Some(device) = self.device_location {
                    reports.sort_by(|a, b| {
                        let to_a = haversine_km(
                            device,
                            Coordinates {
                                latitude: a.location.latitude,
                                longitude: a.location.longitude,
                            },
                        );
                        let to_b = haversine_km(
                            device,
                            Coordinates {
                                latitude: b.location.latitude,
                                longitude: b.location.longitude,
                            },
                        );
                        to_a.total_cmp(&to_b)
                    });
                }
            }
        }

        self.state.send_replace(FeedState::Success(reports));
    }
}
