//! Compose-and-submit flow for a new report.

use std::sync::Arc;

use tokio::sync::watch;

use cleancity_auth::AbstractAuth;
use cleancity_config::config;
use cleancity_database::{Database, Report, ReportLocation};
use cleancity_files::{AbstractImageHost, CapturedImage};
use cleancity_location::{encode_geohash, AbstractLocation, Coordinates};
use cleancity_models::v0::{ReportCategory, ReportStatus};
use cleancity_result::Result;

use crate::validate::validate_report;

/// Mutable draft of a report being composed.
///
/// Owned by the submission controller for one compose-and-submit session
/// and reset to its defaults after a successful submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDraft {
    pub image: Option<CapturedImage>,
    pub description: String,
    pub category: ReportCategory,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub city: Option<String>,

    pub image_error: Option<String>,
    pub description_error: Option<String>,
    pub location_error: Option<String>,
}

/// State of the submission operation
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum SubmitState {
    #[default]
    Idle,
    Uploading,
    Success(String),
    Error(String),
}

/// Orchestrates photo, location and draft text into one report document
pub struct SubmissionController {
    auth: Arc<dyn AbstractAuth>,
    db: Database,
    image_host: Arc<dyn AbstractImageHost>,
    location: Arc<dyn AbstractLocation>,
    draft: ReportDraft,
    state: watch::Sender<SubmitState>,
}

impl SubmissionController {
    pub fn new(
        auth: Arc<dyn AbstractAuth>,
        db: Database,
        image_host: Arc<dyn AbstractImageHost>,
        location: Arc<dyn AbstractLocation>,
    ) -> Self {
        SubmissionController {
            auth,
            db,
            image_host,
            location,
            draft: Default::default(),
            state: watch::channel(Default::default()).0,
        }
    }

    pub fn draft(&self) -> &ReportDraft {
        &self.draft
    }

    pub fn state(&self) -> watch::Receiver<SubmitState> {
        self.state.subscribe()
    }

    pub fn current_state(&self) -> SubmitState {
        self.state.borrow().clone()
    }

    // Draft edits clear the edited field's error

    pub fn on_image_captured(&mut self, image: CapturedImage) {
        self.draft.image = Some(image);
        self.draft.image_error = None;
    }

    pub fn on_description_change(&mut self, description: &str) {
        self.draft.description = description.to_string();
        self.draft.description_error = None;
    }

    pub fn on_category_change(&mut self, category: ReportCategory) {
        self.draft.category = category;
    }

    /// Fill the draft's location fields from the device collaborator
    pub async fn fetch_location(&mut self) {
        match self.location.current_coordinates().await {
            Ok(Some(coords)) => {
                let resolved = match self.location.address_for(coords).await {
                    Ok(Some(resolved)) => resolved,
                    // reverse geocoding is best-effort
                    Ok(None) | Err(_) => Default::default(),
                };

                self.draft.latitude = Some(coords.latitude);
                self.draft.longitude = Some(coords.longitude);
                self.draft.address = Some(resolved.display_line(coords));
                self.draft.city = resolved.city;
                self.draft.location_error = None;
            }
            Ok(None) => {
                self.draft.location_error = Some("Unable to get location".to_string());
            }
            Err(error) => {
                self.draft.location_error = Some(format!("Location error: {error}"));
            }
        }
    }

    /// Submit the draft.
    ///
    /// One outcome per attempt: field errors leave the state Idle without
    /// touching any collaborator; otherwise the attempt reports Uploading
    /// and then exactly one of Success or Error. A cancelled attempt can
    /// leave the state Uploading; `reset_state` returns it to Idle.
    pub async fn submit(&mut self) -> Result<()> {
        if matches!(*self.state.borrow(), SubmitState::Uploading) {
            return Err(create_error!(OperationInFlight));
        }

        let errors = validate_report(&self.draft);
        if !errors.is_valid() {
            self.draft.image_error = errors.image;
            self.draft.description_error = errors.description;
            self.draft.location_error = errors.location;
            return Ok(());
        }

        // Submission UI is gated behind authentication, so this branch is
        // normally unreachable.
        let Some(identity) = self.auth.current_identity().await else {
            self.state.send_replace(SubmitState::Error(
                "Please login to submit reports".to_string(),
            ));
            return Ok(());
        };

        let (Some(image), Some(latitude), Some(longitude)) = (
            self.draft.image.clone(),
            self.draft.latitude,
            self.draft.longitude,
        ) else {
            // validate_report requires all three
            self.state.send_replace(SubmitState::Error(
                "Failed to submit report: incomplete draft".to_string(),
            ));
            return Ok(());
        };

        self.state.send_replace(SubmitState::Uploading);

        let photo_url = match self.image_host.upload(&image).await {
            Ok(url) => url,
            Err(error) => {
                warn!("image upload failed: {error}");
                self.state
                    .send_replace(SubmitState::Error("Failed to upload image".to_string()));
                return Ok(());
            }
        };

        let coords = Coordinates {
            latitude,
            longitude,
        };
        let geohash = encode_geohash(coords, config().await.geo.geohash_precision);

        let report = Report {
            id: String::new(),
            author_id: identity.id.clone(),
            author_name: identity
                .display_name
                .clone()
                .unwrap_or_else(|| "Anonymous".to_string()),
            author_avatar: identity.avatar_url.clone().unwrap_or_default(),
            photo_url,
            description: self.draft.description.clone(),
            category: self.draft.category,
            location: ReportLocation {
                latitude,
                longitude,
                address: self.draft.address.clone().unwrap_or_default(),
                city: self
                    .draft
                    .city
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
                geohash,
            },
            status: ReportStatus::Pending,
            upvotes: 0,
            upvoted_by: vec![],
            comment_count: 0,
            created_at: None,
            updated_at: None,
            resolved_at: None,
            resolved_by: None,
        };

        let report_id = match self.db.insert_report(&report).await {
            Ok(id) => id,
            Err(error) => {
                self.state.send_replace(SubmitState::Error(format!(
                    "Failed to submit report: {error}"
                )));
                return Ok(());
            }
        };

        // Best-effort: the report document exists even if the counter
        // write fails, so the attempt still succeeds.
        if let Err(error) = self.db.increment_report_count(&identity.id).await {
            warn!(
                "failed to increment report counter for {}: {error}",
                identity.id
            );
        }

        self.state
            .send_replace(SubmitState::Success(report_id));
        self.draft = ReportDraft::default();

        Ok(())
    }

    pub fn reset_state(&mut self) {
        self.state.send_replace(SubmitState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use cleancity_auth::{AbstractAuth, ReferenceAuth};
    use cleancity_database::{Database, DatabaseInfo};
    use cleancity_files::{AbstractImageHost, CapturedImage, InMemoryImageHost};
    use cleancity_location::{
        encode_geohash, AbstractLocation, Coordinates, FixedLocation, ResolvedAddress,
    };
    use cleancity_models::v0::ReportStatus;
    use cleancity_result::{ErrorType, Result};

    use super::*;

    fn tiny_gif() -> CapturedImage {
        CapturedImage {
            bytes: b"GIF89a\x01\x00\x01\x00\x80\x00\x00".to_vec(),
            content_type: "image/gif".to_string(),
            filename: "report.gif".to_string(),
        }
    }

    async fn reference_db() -> Database {
        DatabaseInfo::Reference.connect().await.unwrap()
    }

    async fn signed_in_auth() -> Arc<ReferenceAuth> {
        let auth = Arc::new(ReferenceAuth::new());
        let identity = auth.sign_up("user@example.com", "hunter22").await.unwrap();
        auth.update_display_name(&identity.id, "Asha").await.unwrap();
        auth
    }

    fn middlesbrough() -> FixedLocation {
        FixedLocation::new(
            Some(Coordinates {
                latitude: 54.57,
                longitude: -1.23,
            }),
            Some(ResolvedAddress {
                address: Some("Linthorpe Road".to_string()),
                city: Some("Middlesbrough".to_string()),
                ..Default::default()
            }),
        )
    }

    async fn controller_with(
        auth: Arc<dyn AbstractAuth>,
        db: Database,
        image_host: Arc<dyn AbstractImageHost>,
    ) -> SubmissionController {
        SubmissionController::new(auth, db, image_host, Arc::new(middlesbrough()))
    }

    #[tokio::test]
    async fn empty_draft_stays_idle_and_touches_nothing() {
        let db = reference_db().await;
        let host = Arc::new(InMemoryImageHost::new());
        let mut controller =
            controller_with(signed_in_auth().await, db.clone(), host.clone()).await;

        controller.submit().await.unwrap();

        assert_eq!(controller.current_state(), SubmitState::Idle);
        assert_eq!(
            controller.draft().image_error,
            Some("Please capture a photo".to_string())
        );
        assert_eq!(
            controller.draft().description_error,
            Some("Please add a description".to_string())
        );
        assert_eq!(
            controller.draft().location_error,
            Some("Please set location".to_string())
        );

        assert_eq!(host.upload_count().await, 0);
        assert!(db.fetch_reports().await.unwrap().reports.is_empty());
    }

    #[tokio::test]
    async fn unauthenticated_submission_errors() {
        let db = reference_db().await;
        let host = Arc::new(InMemoryImageHost::new());
        let mut controller =
            controller_with(Arc::new(ReferenceAuth::new()), db, host).await;

        controller.on_image_captured(tiny_gif());
        controller.on_description_change("pothole");
        controller.fetch_location().await;
        controller.submit().await.unwrap();

        assert_eq!(
            controller.current_state(),
            SubmitState::Error("Please login to submit reports".to_string())
        );
    }

    #[tokio::test]
    async fn upload_failure_writes_nothing() {
        let db = reference_db().await;
        let host = Arc::new(InMemoryImageHost::new());
        host.set_failing(true).await;
        let mut controller =
            controller_with(signed_in_auth().await, db.clone(), host).await;

        controller.on_image_captured(tiny_gif());
        controller.on_description_change("pothole");
        controller.fetch_location().await;
        controller.submit().await.unwrap();

        assert_eq!(
            controller.current_state(),
            SubmitState::Error("Failed to upload image".to_string())
        );
        assert!(db.fetch_reports().await.unwrap().reports.is_empty());
    }

    #[tokio::test]
    async fn successful_submission_end_to_end() {
        let db = reference_db().await;
        let auth = signed_in_auth().await;
        let author_id = auth.current_identity().await.unwrap().id;
        let host = Arc::new(InMemoryImageHost::new());
        let mut controller = controller_with(auth, db.clone(), host.clone()).await;

        controller.on_image_captured(tiny_gif());
        controller.on_description_change("pothole");
        controller.fetch_location().await;
        assert_eq!(controller.draft().location_error, None);

        controller.submit().await.unwrap();

        let SubmitState::Success(report_id) = controller.current_state() else {
            panic!("expected success, got {:?}", controller.current_state());
        };

        let page = db.fetch_reports().await.unwrap();
        assert_eq!(page.reports.len(), 1);

        let stored = &page.reports[0];
        assert_eq!(stored.id, report_id);
        assert_eq!(stored.author_id, author_id);
        assert_eq!(stored.author_name, "Asha");
        assert_eq!(stored.description, "pothole");
        assert_eq!(stored.status, ReportStatus::Pending);
        assert_eq!(stored.upvotes, 0);
        assert_eq!(stored.comment_count, 0);
        assert!(stored.created_at.is_some());
        assert_eq!(
            stored.location.geohash,
            encode_geohash(
                Coordinates {
                    latitude: 54.57,
                    longitude: -1.23,
                },
                10
            )
        );
        assert!(stored.photo_url.starts_with("memory://images/"));
        assert_eq!(stored.location.city, "Middlesbrough");

        // counter incremented and draft reset
        assert_eq!(
            db.fetch_user_stats(&author_id).await.unwrap().reports_submitted,
            1
        );
        assert_eq!(controller.draft(), &ReportDraft::default());
    }

    /// Image host that never completes, for exercising cancellation
    struct StuckImageHost;

    #[async_trait]
    impl AbstractImageHost for StuckImageHost {
        async fn upload(&self, _image: &CapturedImage) -> Result<String> {
            futures::future::pending().await
        }
    }

    #[tokio::test]
    async fn second_submit_while_uploading_is_rejected() {
        let db = reference_db().await;
        let mut controller =
            controller_with(signed_in_auth().await, db, Arc::new(StuckImageHost)).await;

        controller.on_image_captured(tiny_gif());
        controller.on_description_change("pothole");
        controller.fetch_location().await;

        // Cancel an attempt mid-upload; the state is left Uploading.
        let attempt = tokio::time::timeout(Duration::from_millis(10), controller.submit()).await;
        assert!(attempt.is_err());
        assert_eq!(controller.current_state(), SubmitState::Uploading);

        let rejected = controller.submit().await.unwrap_err();
        assert!(matches!(rejected.error_type, ErrorType::OperationInFlight));

        controller.reset_state();
        assert_eq!(controller.current_state(), SubmitState::Idle);
    }

    #[tokio::test]
    async fn fetch_location_reports_absence_and_failure() {
        let db = reference_db().await;
        let host = Arc::new(InMemoryImageHost::new());
        let location = Arc::new(FixedLocation::default());
        let mut controller = SubmissionController::new(
            signed_in_auth().await,
            db.clone(),
            host.clone(),
            location.clone(),
        );

        controller.fetch_location().await;
        assert_eq!(
            controller.draft().location_error,
            Some("Unable to get location".to_string())
        );

        location
            .set_coordinates(Some(Coordinates {
                latitude: 54.57,
                longitude: -1.23,
            }))
            .await;
        controller.fetch_location().await;
        assert_eq!(controller.draft().location_error, None);
        assert_eq!(controller.draft().latitude, Some(54.57));
        // no reverse geocoding configured, coordinates fallback
        assert_eq!(
            controller.draft().address.as_deref(),
            Some("Lat: 54.5700, Long: -1.2300")
        );
    }

    /// Location provider whose positioning hardware is unavailable
    struct FailingLocation;

    #[async_trait]
    impl AbstractLocation for FailingLocation {
        async fn current_coordinates(&self) -> Result<Option<Coordinates>> {
            Err(create_error!(LocationUnavailable {
                message: "positioning service disabled".to_string()
            }))
        }

        async fn address_for(&self, _coords: Coordinates) -> Result<Option<ResolvedAddress>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn fetch_location_surfaces_collaborator_failure() {
        let db = reference_db().await;
        let mut controller = SubmissionController::new(
            signed_in_auth().await,
            db,
            Arc::new(InMemoryImageHost::new()),
            Arc::new(FailingLocation),
        );

        controller.fetch_location().await;
        assert_eq!(
            controller.draft().location_error,
            Some("Location error: positioning service disabled".to_string())
        );
    }
}
