//! Tests for the rendered client-facing status page.

use crate::job::domain::{StageProgress, StatusStage};
use crate::job::services::{JobStatusView, StageView, StatusPageRenderer, StatusView};

fn view_for(current: StatusStage, qr_image_url: Option<&str>) -> StatusView {
    let stages = StatusStage::ALL
        .iter()
        .map(|&stage| StageView {
            label: stage.as_str().to_owned(),
            progress: current.progress_of(stage),
        })
        .collect();
    StatusView {
        jobs: vec![JobStatusView {
            job_id: "A3F0C2D1".to_owned(),
            client_name: "Ana Cruz".to_owned(),
            file_name: "invoice.pdf".to_owned(),
            created_at: "2024-05-01 10:00:00 UTC".to_owned(),
            current_stage: current.as_str().to_owned(),
            message: current.client_message().to_owned(),
            stages,
            qr_image_url: qr_image_url.map(str::to_owned),
        }],
    }
}

#[test]
fn the_page_shows_the_record_and_its_stage() {
    let renderer = StatusPageRenderer::new().expect("template compiles");
    let html = renderer
        .render(&view_for(StatusStage::Printing, None))
        .expect("render succeeds");

    assert!(html.contains("Print Job A3F0C2D1"));
    assert!(html.contains("Ana Cruz"));
    assert!(html.contains("invoice.pdf"));
    assert!(html.contains("2024-05-01 10:00:00 UTC"));
    assert!(html.contains("Status: Printing"));
    assert!(html.contains("Your job is printing now."));
}

#[test]
fn stage_dots_use_the_progress_colors() {
    let renderer = StatusPageRenderer::new().expect("template compiles");
    let html = renderer
        .render(&view_for(StatusStage::Printing, None))
        .expect("render succeeds");

    // Two passed stages, one active, two upcoming.
    assert_eq!(html.matches("#4CAF50").count(), 2);
    assert_eq!(html.matches("#f7c843").count(), 1);
    assert_eq!(html.matches("#d3d3d3").count(), 2);
}

#[test]
fn the_qr_image_appears_only_with_a_fetchable_url() {
    let renderer = StatusPageRenderer::new().expect("template compiles");

    let without = renderer
        .render(&view_for(StatusStage::Pending, None))
        .expect("render succeeds");
    assert!(!without.contains("<img"));

    let with = renderer
        .render(&view_for(
            StatusStage::Pending,
            Some("https://i.example/qr.png"),
        ))
        .expect("render succeeds");
    assert!(with.contains("src=\"https://i.example/qr.png\""));
}

#[test]
fn record_fields_are_html_escaped() {
    let mut view = view_for(StatusStage::Pending, None);
    if let Some(job) = view.jobs.first_mut() {
        job.client_name = "<script>alert(1)</script>".to_owned();
    }

    let renderer = StatusPageRenderer::new().expect("template compiles");
    let html = renderer.render(&view).expect("render succeeds");
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[test]
fn all_stage_labels_render_in_order() {
    let renderer = StatusPageRenderer::new().expect("template compiles");
    let html = renderer
        .render(&view_for(StatusStage::Pending, None))
        .expect("render succeeds");

    let mut last_position = 0;
    for stage in StatusStage::ALL {
        let position = html.find(stage.as_str()).expect("label present");
        assert!(position > last_position, "labels out of order");
        last_position = position;
    }
}

#[test]
fn progress_serializes_to_the_template_vocabulary() {
    // The template compares against these exact strings.
    let done = serde_json::to_string(&StageProgress::Done).expect("serializes");
    let active = serde_json::to_string(&StageProgress::Active).expect("serializes");
    let upcoming = serde_json::to_string(&StageProgress::Upcoming).expect("serializes");
    assert_eq!(done, "\"done\"");
    assert_eq!(active, "\"active\"");
    assert_eq!(upcoming, "\"upcoming\"");
}
