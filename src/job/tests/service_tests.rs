//! Tests for the tracking service workflow.

use std::sync::Arc;

use async_trait::async_trait;
use eyre::{Result, bail, ensure};
use mockall::mock;

use super::support::{FixedClock, admin_session};
use crate::job::{
    adapters::InMemoryJobStore,
    domain::{EmailAddress, JobId, JobRecord, QrReference, StageProgress, StatusStage},
    ports::{
        ImagePublishError, ImagePublisher, JobNotifier, JobStore, NotifyError, NotifyResult,
        PublishResult, PublishedImage,
    },
    services::{CreateJobRequest, CreateJobWarning, LookupKey, TrackingError, TrackingService},
};
use crate::qr::QrStyle;

mock! {
    Publisher {}

    #[async_trait]
    impl ImagePublisher for Publisher {
        async fn publish(&self, png_bytes: &[u8], file_stem: &str) -> PublishResult<PublishedImage>;
    }
}

mock! {
    Notifier {}

    #[async_trait]
    impl JobNotifier for Notifier {
        async fn job_created(
            &self,
            recipient: &EmailAddress,
            record: &JobRecord,
            tracking_url: &str,
            qr_png: &[u8],
        ) -> NotifyResult<()>;
    }
}

const BASE_URL: &str = "https://status.example/track";

fn service(store: Arc<InMemoryJobStore>) -> TrackingService<InMemoryJobStore, FixedClock> {
    TrackingService::new(
        store,
        Arc::new(FixedClock::may_morning()),
        BASE_URL,
        QrStyle::Plain,
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn created_jobs_are_immediately_visible() -> Result<()> {
    let store = Arc::new(InMemoryJobStore::new());
    let service = service(Arc::clone(&store));
    let session = admin_session();

    let created = service
        .create_job(&session, CreateJobRequest::new("Ana Cruz", "invoice.pdf"))
        .await?;

    ensure!(created.warnings.is_empty(), "no side effects were configured");
    ensure!(
        created.tracking_url == format!("{BASE_URL}?job_id={}", created.record.job_id()),
        "tracking URL must carry the job id"
    );
    ensure!(!created.qr_png.is_empty(), "QR image bytes are always returned");
    ensure!(
        created.record.created_at() == FixedClock::may_morning().0,
        "creation time comes from the injected clock"
    );

    let found = store.find_by_id(created.record.job_id()).await?;
    ensure!(found == Some(created.record), "record should be in the store");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn consecutive_creations_get_distinct_ids() -> Result<()> {
    let service = service(Arc::new(InMemoryJobStore::new()));
    let session = admin_session();

    let first = service
        .create_job(&session, CreateJobRequest::new("Ana Cruz", "a.pdf"))
        .await?;
    let second = service
        .create_job(&session, CreateJobRequest::new("Ana Cruz", "b.pdf"))
        .await?;

    ensure!(
        first.record.job_id() != second.record.job_id(),
        "ids must not collide across creations"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_email_aborts_before_any_write() -> Result<()> {
    let store = Arc::new(InMemoryJobStore::new());
    let service = service(Arc::clone(&store));
    let session = admin_session();

    let request = CreateJobRequest::new("Ana Cruz", "invoice.pdf").with_client_email("not-an-email");
    let Err(TrackingError::Domain(_)) = service.create_job(&session, request).await else {
        bail!("expected a validation error");
    };

    ensure!(store.scan_all().await?.is_empty(), "nothing may be written");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn successful_publish_records_the_hosted_url() -> Result<()> {
    let mut publisher = MockPublisher::new();
    publisher.expect_publish().returning(|_, _| {
        Ok(PublishedImage {
            url: "https://i.example/qr.png".to_owned(),
        })
    });

    let store = Arc::new(InMemoryJobStore::new());
    let service = service(Arc::clone(&store)).with_publisher(Arc::new(publisher));
    let created = service
        .create_job(&admin_session(), CreateJobRequest::new("Ana Cruz", "a.pdf"))
        .await?;

    ensure!(created.warnings.is_empty(), "publish succeeded");
    ensure!(
        created.record.qr_reference()
            == Some(&QrReference::ImageUrl("https://i.example/qr.png".to_owned())),
        "hosted URL should be recorded directly"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn sheet_deployments_record_image_formulas() -> Result<()> {
    let mut publisher = MockPublisher::new();
    publisher.expect_publish().returning(|_, _| {
        Ok(PublishedImage {
            url: "https://i.example/qr.png".to_owned(),
        })
    });

    let service = service(Arc::new(InMemoryJobStore::new()))
        .with_publisher(Arc::new(publisher))
        .with_sheet_formula_references();
    let created = service
        .create_job(&admin_session(), CreateJobRequest::new("Ana Cruz", "a.pdf"))
        .await?;

    ensure!(
        created.record.qr_reference()
            == Some(&QrReference::SheetFormula("https://i.example/qr.png".to_owned())),
        "sheet deployments wrap the URL in an image formula"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_publish_degrades_instead_of_aborting() -> Result<()> {
    let mut publisher = MockPublisher::new();
    publisher
        .expect_publish()
        .returning(|_, _| Err(ImagePublishError::Rejected("quota exceeded".to_owned())));

    let store = Arc::new(InMemoryJobStore::new());
    let service = service(Arc::clone(&store)).with_publisher(Arc::new(publisher));
    let created = service
        .create_job(&admin_session(), CreateJobRequest::new("Ana Cruz", "a.pdf"))
        .await?;

    ensure!(
        matches!(
            created.warnings.as_slice(),
            [CreateJobWarning::QrUnpublished(_)]
        ),
        "the failure surfaces as a warning"
    );
    ensure!(
        created.record.qr_reference().is_none(),
        "no reference is recorded for a failed publish"
    );
    let found = store
        .find_by_id(created.record.job_id())
        .await?
        .expect("record kept despite the degraded publish");
    ensure!(found.qr_reference().is_none(), "stored record matches");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_notification_keeps_the_record() -> Result<()> {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_job_created()
        .returning(|_, _, _, _| Err(NotifyError::InvalidMessage("relay refused".to_owned())));

    let store = Arc::new(InMemoryJobStore::new());
    let service = service(Arc::clone(&store)).with_notifier(Arc::new(notifier));
    let request = CreateJobRequest::new("Ana Cruz", "a.pdf").with_client_email("ana@example.com");
    let created = service.create_job(&admin_session(), request).await?;

    ensure!(
        matches!(
            created.warnings.as_slice(),
            [CreateJobWarning::EmailUndelivered(_)]
        ),
        "the failure surfaces as a warning"
    );
    ensure!(
        store.find_by_id(created.record.job_id()).await?.is_some(),
        "record kept despite the failed delivery"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn notifier_is_skipped_without_a_client_email() -> Result<()> {
    let mut notifier = MockNotifier::new();
    notifier.expect_job_created().never();

    let service = service(Arc::new(InMemoryJobStore::new())).with_notifier(Arc::new(notifier));
    let created = service
        .create_job(&admin_session(), CreateJobRequest::new("Ana Cruz", "a.pdf"))
        .await?;

    ensure!(created.warnings.is_empty(), "nothing to deliver, nothing to warn");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn status_updates_flow_through_to_the_view() -> Result<()> {
    let service = service(Arc::new(InMemoryJobStore::new()));
    let session = admin_session();

    let created = service
        .create_job(&session, CreateJobRequest::new("Ana Cruz", "invoice.pdf"))
        .await?;
    service
        .update_job_status(&session, created.record.job_id(), StatusStage::Printing)
        .await?;

    let view = service
        .view_status(&LookupKey::JobId(created.record.job_id().clone()))
        .await?;
    let job = view.jobs.first().expect("one job in the view");
    ensure!(job.current_stage == "Printing", "view shows the new stage");
    ensure!(job.message == "Your job is printing now.", "friendly message");

    let progress: Vec<StageProgress> = job.stages.iter().map(|s| s.progress).collect();
    ensure!(
        progress
            == vec![
                StageProgress::Done,
                StageProgress::Done,
                StageProgress::Active,
                StageProgress::Upcoming,
                StageProgress::Upcoming,
            ],
        "ribbon reflects the stage order"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn updating_an_unknown_job_is_not_found() -> Result<()> {
    let store = Arc::new(InMemoryJobStore::new());
    let service = service(Arc::clone(&store));
    let session = admin_session();

    let absent = JobId::parse("FFFFFFFF")?;
    let Err(TrackingError::NotFound(_)) = service
        .update_job_status(&session, &absent, StatusStage::Completed)
        .await
    else {
        bail!("expected not-found");
    };
    ensure!(store.scan_all().await?.is_empty(), "nothing was created");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn qr_references_can_be_backfilled_after_creation() -> Result<()> {
    let store = Arc::new(InMemoryJobStore::new());
    let service = service(Arc::clone(&store));
    let session = admin_session();

    let created = service
        .create_job(&session, CreateJobRequest::new("Ana Cruz", "a.pdf"))
        .await?;
    let reference = QrReference::ImageUrl("https://i.example/qr.png".to_owned());
    service
        .attach_qr_reference(&session, created.record.job_id(), &reference)
        .await?;

    let found = store
        .find_by_id(created.record.job_id())
        .await?
        .expect("record exists");
    ensure!(found.qr_reference() == Some(&reference), "reference backfilled");

    let view = service
        .view_status(&LookupKey::JobId(created.record.job_id().clone()))
        .await?;
    let job = view.jobs.first().expect("one job");
    ensure!(
        job.qr_image_url.as_deref() == Some("https://i.example/qr.png"),
        "the page can now show the QR image"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn email_lookup_returns_every_matching_job() -> Result<()> {
    let service = service(Arc::new(InMemoryJobStore::new()));
    let session = admin_session();

    for file in ["a.pdf", "b.pdf"] {
        service
            .create_job(
                &session,
                CreateJobRequest::new("Ana Cruz", file).with_client_email("Ana@Example.com"),
            )
            .await?;
    }

    let view = service
        .view_status(&LookupKey::Email(EmailAddress::parse("ana@example.com")?))
        .await?;
    ensure!(view.jobs.len() == 2, "both jobs appear on the page");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn lookups_with_no_match_are_not_found() -> Result<()> {
    let service = service(Arc::new(InMemoryJobStore::new()));

    let Err(TrackingError::NotFound(_)) = service
        .view_status(&LookupKey::JobId(JobId::parse("FFFFFFFF")?))
        .await
    else {
        bail!("expected not-found for the id lookup");
    };
    let Err(TrackingError::NotFound(_)) = service
        .view_status(&LookupKey::Email(EmailAddress::parse("no@match.example")?))
        .await
    else {
        bail!("expected not-found for the email lookup");
    };
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn list_jobs_returns_store_order() -> Result<()> {
    let service = service(Arc::new(InMemoryJobStore::new()));
    let session = admin_session();

    for name in ["First", "Second"] {
        service
            .create_job(&session, CreateJobRequest::new(name, "x.pdf"))
            .await?;
    }

    let listed = service.list_jobs(&session).await?;
    let names: Vec<&str> = listed.iter().map(JobRecord::client_name).collect();
    ensure!(names == vec!["First", "Second"], "admin table keeps store order");
    Ok(())
}
