// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the orchestrator's gallery, staging and completion rules

mod common;

use common::{FakeRecipeService, generation, image, orchestrator};
use fridgemate::app::{ChangeKind, StagedOrigin};
use fridgemate::backends::camera::MediaCaptureSession;
use fridgemate::pipelines::recipe::RecipeService;
use fridgemate::{DetectionError, Generation, ItemStatus, Orchestrator, SourceImage};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;

/// Service whose calls blow up instead of answering
struct PanickingRecipeService;

impl RecipeService for PanickingRecipeService {
    fn detect_and_generate(
        &self,
        _image: SourceImage,
    ) -> BoxFuture<'static, Result<Generation, DetectionError>> {
        crash().boxed()
    }
}

async fn crash() -> Result<Generation, DetectionError> {
    panic!("detector crashed")
}

#[tokio::test]
async fn test_upload_resolves_to_recipe() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    let id = orch.submit_new(image("a.jpg", 1024));
    assert_eq!(orch.gallery().len(), 1);
    assert_eq!(orch.selected(), Some(id));
    assert!(orch.gallery().get(id).unwrap().status().is_processing());
    assert_eq!(orch.in_flight(), 1);

    let expected = generation("Veg Stir Fry", &["carrot", "egg"], &["chop", "fry"]);
    service.succeed("a.jpg", expected.clone());
    let resolution = orch.next_completion().await.unwrap();

    assert_eq!(resolution.id, id);
    assert!(resolution.applied);
    let item = orch.gallery().get(id).unwrap();
    assert_eq!(item.status(), &ItemStatus::Done(expected.clone()));
    assert_eq!(item.recipe(), Some(&expected.recipe));
    assert!(item.error_detail().is_none());
    assert_eq!(orch.in_flight(), 0);
}

#[tokio::test]
async fn test_duplicate_upload_reprocesses_existing_item() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    let first = orch.submit_new(image("a.jpg", 1024));
    service.succeed("a.jpg", generation("Veg Stir Fry", &[], &[]));
    orch.next_completion().await;

    let second = orch.submit_new(image("a.jpg", 1024));
    assert_eq!(second, first, "Duplicate must map onto the existing item");
    assert_eq!(orch.gallery().len(), 1);
    assert!(
        orch.gallery().get(first).unwrap().status().is_processing(),
        "Resubmission re-enters Processing"
    );
    assert!(orch.gallery().get(first).unwrap().recipe().is_none());
    assert_eq!(service.calls(), vec!["a.jpg", "a.jpg"]);

    service.succeed("a.jpg", generation("Omelette", &[], &[]));
    orch.next_completion().await;
    assert_eq!(
        orch.gallery().get(first).unwrap().recipe().map(|r| r.title.as_str()),
        Some("Omelette")
    );
    assert_eq!(orch.registry().outstanding(), 1, "Duplicate preview was released");
}

#[tokio::test]
async fn test_same_name_different_size_is_not_a_duplicate() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    let a = orch.submit_new(image("a.jpg", 1024));
    let b = orch.submit_new(image("a.jpg", 1025));
    assert_ne!(a, b);
    assert_eq!(orch.gallery().ids(), vec![b, a], "Newest first");
}

#[tokio::test]
async fn test_transport_failure_then_remove() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    let id = orch.submit_new(image("b.jpg", 2048));
    service.fail("b.jpg", DetectionError::Transport("connection refused".to_string()));
    orch.next_completion().await;

    let item = orch.gallery().get(id).unwrap();
    let message = item.error_detail().unwrap();
    assert!(!message.is_empty());
    assert_eq!(message, "Network error");
    assert!(item.recipe().is_none());

    assert_eq!(orch.selected(), Some(id));
    assert!(orch.remove(id));
    assert!(orch.gallery().is_empty());
    assert_eq!(orch.selected(), None);
    assert_eq!(orch.registry().outstanding(), 0);
    assert!(!orch.remove(id), "Second removal is a no-op");
}

#[tokio::test]
async fn test_service_error_message_is_kept() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    let id = orch.submit_new(image("empty-shelf.jpg", 300));
    service.fail(
        "empty-shelf.jpg",
        DetectionError::Service("No ingredients detected".to_string()),
    );
    orch.next_completion().await;

    assert_eq!(
        orch.gallery().get(id).unwrap().error_detail(),
        Some("No ingredients detected")
    );
}

#[tokio::test]
async fn test_removed_item_is_not_resurrected() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    let a = orch.submit_new(image("a.jpg", 100));
    let b = orch.submit_new(image("b.jpg", 200));
    assert!(orch.remove(b));

    service.succeed("b.jpg", generation("Ghost Soup", &[], &[]));
    let late = orch.next_completion().await.unwrap();
    assert_eq!(late.id, b);
    assert!(!late.applied);
    assert_eq!(orch.gallery().ids(), vec![a]);
    assert!(orch.gallery().get(a).unwrap().status().is_processing());

    service.succeed("a.jpg", generation("Salad", &[], &[]));
    orch.next_completion().await;
    assert_eq!(orch.gallery().ids(), vec![a]);
    assert!(orch.gallery().get(b).is_none());
    assert!(orch.next_completion().await.is_none(), "Nothing left in flight");
}

#[tokio::test]
async fn test_completions_apply_by_id_in_any_order() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    let a = orch.submit_new(image("a.jpg", 100));
    let b = orch.submit_new(image("b.jpg", 200));
    let c = orch.submit_new(image("c.jpg", 300));

    service.succeed("c.jpg", generation("C", &[], &[]));
    service.fail("a.jpg", DetectionError::Malformed("bad body".to_string()));
    service.succeed("b.jpg", generation("B", &[], &[]));
    orch.settle().await;

    let title = |id| {
        orch.gallery()
            .get(id)
            .and_then(|item| item.recipe())
            .map(|r| r.title.clone())
    };
    assert_eq!(title(b).as_deref(), Some("B"));
    assert_eq!(title(c).as_deref(), Some("C"));
    assert_eq!(orch.gallery().get(a).unwrap().error_detail(), Some("Network error"));
    assert_eq!(orch.gallery().ids(), vec![c, b, a]);
}

#[tokio::test]
async fn test_drain_applies_arrived_completions() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    let id = orch.submit_new(image("a.jpg", 100));
    assert!(orch.drain_completions().is_empty());

    service.succeed("a.jpg", generation("Toast", &[], &[]));
    // Let the detached task deliver its outcome
    while orch.drain_completions().is_empty() {
        tokio::task::yield_now().await;
    }
    assert!(orch.gallery().get(id).unwrap().recipe().is_some());
    assert_eq!(orch.in_flight(), 0);
}

#[tokio::test]
async fn test_items_never_hold_recipe_and_error() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    let id = orch.submit_new(image("a.jpg", 100));
    service.succeed("a.jpg", generation("Pasta", &[], &[]));
    orch.next_completion().await;

    assert!(orch.reprocess(id));
    service.fail("a.jpg", DetectionError::Transport("timeout".to_string()));
    orch.next_completion().await;

    let item = orch.gallery().get(id).unwrap();
    assert!(item.recipe().is_none());
    assert!(item.error_detail().is_some());

    assert!(orch.reprocess(id));
    service.succeed("a.jpg", generation("Pasta", &[], &[]));
    orch.next_completion().await;

    let item = orch.gallery().get(id).unwrap();
    assert!(matches!(item.status(), ItemStatus::Done(_)));
    assert!(item.recipe().is_some());
    assert!(item.error_detail().is_none());
}

#[tokio::test]
async fn test_staging_a_second_image_replaces_the_first() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    orch.stage_new(image("one.jpg", 10));
    orch.stage_new(image("two.jpg", 20));
    assert_eq!(orch.registry().outstanding(), 1);
    assert_eq!(orch.registry().released_count(), 1);
    assert_eq!(
        orch.staging().current().map(|s| s.source().name()),
        Some("two.jpg")
    );

    let existing = orch.submit_new(image("old.jpg", 30));
    orch.stage_new(image("three.jpg", 40));
    assert!(orch.stage_existing(existing));
    let outstanding = orch.registry().outstanding();
    assert_eq!(outstanding, 1, "Only the gallery item's preview is left");
    assert_eq!(
        orch.staging().current().map(|s| s.origin()),
        Some(StagedOrigin::Existing(existing))
    );

    orch.stage_new(image("four.jpg", 50));
    assert_eq!(
        orch.registry().outstanding(),
        outstanding + 1,
        "Replacing a gallery pick releases nothing"
    );
    assert!(orch.gallery().contains(existing));
}

#[tokio::test]
async fn test_confirm_staged_existing_reprocesses() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    let id = orch.submit_new(image("a.jpg", 100));
    service.succeed("a.jpg", generation("Curry", &[], &[]));
    orch.next_completion().await;
    orch.clear_selection();

    assert!(orch.stage_existing(id));
    assert_eq!(orch.selected(), Some(id));
    assert!(
        !orch.gallery().get(id).unwrap().status().is_processing(),
        "Staging an item that already has a result does not reprocess it"
    );
    assert_eq!(orch.staged_preview_url(), Some(orch.gallery().get(id).unwrap().preview().url()));

    assert_eq!(orch.confirm_staged(), Some(id));
    assert!(orch.staging().is_empty());
    assert!(orch.gallery().get(id).unwrap().status().is_processing());
    assert_eq!(orch.gallery().len(), 1);
    assert_eq!(orch.registry().outstanding(), 1);

    assert_eq!(orch.confirm_staged(), None, "Nothing left to confirm");
}

#[tokio::test]
async fn test_removing_a_staged_item_clears_staging() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    let id = orch.submit_new(image("a.jpg", 100));
    orch.stage_existing(id);
    assert!(orch.remove(id));

    assert!(orch.staging().is_empty());
    assert_eq!(orch.confirm_staged(), None);
    assert_eq!(orch.registry().outstanding(), 0);
}

#[tokio::test]
async fn test_select_missing_item() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    let id = orch.submit_new(image("a.jpg", 100));
    orch.remove(id);
    assert!(!orch.select_existing(id));
    assert!(!orch.stage_existing(id));
    assert!(!orch.reprocess(id));
    assert_eq!(orch.selected(), None);
}

#[tokio::test]
async fn test_selecting_does_not_reprocess_resolved_items() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    let a = orch.submit_new(image("a.jpg", 100));
    let b = orch.submit_new(image("b.jpg", 100));
    assert_eq!(orch.selected(), Some(b));

    service.fail("a.jpg", DetectionError::Transport("reset".to_string()));
    orch.next_completion().await;

    assert!(orch.select_existing(a));
    assert_eq!(orch.selected(), Some(a));
    assert_eq!(orch.in_flight(), 1, "Only b is still in flight");
    assert_eq!(service.calls().len(), 2);
}

#[tokio::test]
async fn test_handles_are_conserved_across_a_session() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);

    // Upload, duplicate upload, staged-then-cancelled, gallery pick, capture
    let a = orch.submit_new(image("a.jpg", 100));
    orch.submit_new(image("a.jpg", 100));
    orch.stage_new(image("c.jpg", 300));
    orch.cancel_staged();
    orch.stage_existing(a);
    orch.cancel_staged();
    orch.start_camera().unwrap();
    orch.capture_and_stage().unwrap();
    let captured = orch.confirm_staged().unwrap();
    let b = orch.submit_new(image("b.jpg", 200));
    orch.remove(b);

    assert_eq!(orch.gallery().len(), 2);
    assert!(orch.gallery().contains(captured));
    assert_eq!(orch.registry().outstanding(), 2);

    orch.shutdown();
    assert_eq!(orch.registry().outstanding(), 0);
    assert_eq!(orch.registry().acquired_count(), orch.registry().released_count());
    assert!(orch.gallery().is_empty());

    orch.shutdown();
    assert_eq!(orch.registry().outstanding(), 0, "Shutdown is idempotent");

    // Calls still in flight find nothing to update
    assert_eq!(service.succeed_all(generation("Late", &[], &[])), 4);
    while let Some(resolution) = orch.next_completion().await {
        assert!(!resolution.applied);
    }
    assert!(orch.gallery().is_empty());
    assert_eq!(orch.in_flight(), 0);
}

#[tokio::test]
async fn test_observers_see_every_applied_change() {
    let service = FakeRecipeService::new();
    let mut orch = orchestrator(&service);
    let mut changes = orch.gallery().subscribe();

    let a = orch.submit_new(image("a.jpg", 100));
    let b = orch.submit_new(image("b.jpg", 100));
    orch.remove(b);
    service.succeed("b.jpg", generation("Stale", &[], &[]));
    orch.next_completion().await;
    service.succeed("a.jpg", generation("Fresh", &[], &[]));
    orch.next_completion().await;

    let seen: Vec<_> = std::iter::from_fn(|| changes.try_recv().ok())
        .map(|change| (change.id, change.kind))
        .collect();
    assert_eq!(
        seen,
        vec![
            (a, ChangeKind::Inserted),
            (b, ChangeKind::Inserted),
            (b, ChangeKind::Removed),
            (a, ChangeKind::Resolved),
        ]
    );
    assert_eq!(orch.gallery().revision(), 4);
}

#[tokio::test]
async fn test_panicking_call_resolves_to_error() {
    let camera = MediaCaptureSession::new(Box::new(common::still_backend()), 90);
    let mut orch = Orchestrator::new(Arc::new(PanickingRecipeService), camera).unwrap();

    let id = orch.submit_new(image("a.jpg", 100));
    let resolved = tokio::time::timeout(Duration::from_secs(5), orch.settle())
        .await
        .expect("settle must not hang when a call panics");

    assert_eq!(resolved.len(), 1);
    assert!(resolved[0].applied);
    assert_eq!(orch.in_flight(), 0);
    assert_eq!(orch.gallery().get(id).unwrap().error_detail(), Some("Network error"));
}
