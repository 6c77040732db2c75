//! Panorama viewer: lazy library load, teardown ordering, cancellation while loading.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{harness, harness_with_assets, row, with, FakeAssets, RecordingLibrary};
use folio_core::modal::{CLOSE_TRANSITION_MS, ESCAPE_KEY};
use folio_core::page::VIEWER_FAILED_MESSAGE;
use folio_core::{
    EventKind, FolioError, ModalClick, ModalState, NoticeKind, PanoramaLoader, ViewerKind,
};
use tokio::sync::Semaphore;

fn pano(id: i64) -> serde_json::Value {
    with(
        row(id, "Woonkamer 360"),
        "photo_360_url",
        &format!("https://cdn.example/pano-{}.jpg", id),
    )
}

#[tokio::test]
async fn opens_viewer_into_its_own_target() {
    let h = harness(vec![pano(1)]);
    h.page.ready().await.unwrap();

    let id = h.page.click_card("1").await.unwrap().unwrap();
    assert_eq!(h.assets.script_loads(), 1);
    assert_eq!(h.assets.stylesheets.load(Ordering::SeqCst), 1);

    let created = h.library.created.lock().unwrap().clone();
    assert_eq!(
        created,
        vec![(format!("panorama-{}", id), "https://cdn.example/pano-1.jpg".to_string())]
    );
    h.page.with_state(|s| {
        assert_eq!(s.modals.kind(id), Some(ViewerKind::Panorama));
        let el = s.document.element(s.modals.element(id).unwrap()).unwrap();
        assert!(el.inner_html.contains(&format!(r#"id="panorama-{}""#, id)));
    });
}

#[tokio::test]
async fn destroy_precedes_removal_and_nothing_leaks() {
    let h = harness(vec![pano(1)]);
    h.page.ready().await.unwrap();

    for cycle in 1..=10 {
        let id = h.page.click_card("1").await.unwrap().unwrap();
        let el = h.page.with_state(|s| s.modals.element(id).unwrap());

        assert!(h.page.click_modal(id, ModalClick::CloseButton));
        assert_eq!(h.library.destroyed_count(), cycle);
        h.page.with_state(|s| {
            assert_eq!(s.modals.state(id), ModalState::Closing);
            assert!(s.document.contains(el), "element removed before destroy");
        });

        h.clock.advance_ms(CLOSE_TRANSITION_MS);
        h.page.tick();
        h.page.with_state(|s| {
            assert!(!s.document.contains(el));
            assert_eq!(s.document.listener_count(EventKind::KeyDown), 0);
        });
    }
    assert_eq!(h.library.created_count(), 10);
    assert_eq!(h.assets.script_loads(), 1);
}

#[tokio::test]
async fn escape_also_destroys_viewer() {
    let h = harness(vec![pano(1)]);
    h.page.ready().await.unwrap();
    let id = h.page.click_card("1").await.unwrap().unwrap();
    assert_eq!(h.page.press_key(ESCAPE_KEY), Some(id));
    assert_eq!(h.library.destroyed_count(), 1);
}

#[tokio::test]
async fn concurrent_opens_share_one_library_load() {
    let library = Arc::new(RecordingLibrary::default());
    let gate = Arc::new(Semaphore::new(0));
    let assets = FakeAssets::gated(Arc::clone(&library), Arc::clone(&gate));
    let h = harness_with_assets(vec![pano(1), pano(2)], assets, library);
    h.page.ready().await.unwrap();

    let (first, second, _) = tokio::join!(
        h.page.click_card("1"),
        h.page.click_card("2"),
        async {
            tokio::task::yield_now().await;
            gate.add_permits(1);
        }
    );
    let first = first.unwrap().unwrap();
    let second = second.unwrap().unwrap();
    assert_ne!(first, second);
    assert_eq!(h.assets.script_loads(), 1);
    assert_eq!(h.library.created_count(), 2);
    assert!(h.page.panorama_loader().is_loaded());
}

#[tokio::test]
async fn modal_closed_while_loading_gets_no_viewer() {
    let library = Arc::new(RecordingLibrary::default());
    let gate = Arc::new(Semaphore::new(0));
    let assets = FakeAssets::gated(Arc::clone(&library), Arc::clone(&gate));
    let h = harness_with_assets(vec![pano(1)], assets, library);
    h.page.ready().await.unwrap();

    let (opened, _) = tokio::join!(h.page.click_card("1"), async {
        tokio::task::yield_now().await;
        let id = h.page.with_state(|s| s.modals.active()).unwrap();
        assert!(h.page.click_modal(id, ModalClick::Backdrop));
        gate.add_permits(1);
    });
    let id = opened.unwrap().unwrap();
    assert_eq!(h.library.created_count(), 0);
    assert_eq!(h.library.destroyed_count(), 0);

    h.clock.advance_ms(CLOSE_TRANSITION_MS);
    h.page.tick();
    h.page.with_state(|s| {
        assert_eq!(s.modals.state(id), ModalState::Destroyed);
        assert!(s.document.body().is_empty());
    });
}

#[tokio::test]
async fn load_failure_closes_shell_and_reports() {
    let h = harness(vec![pano(1)]);
    h.assets.fail.store(true, Ordering::SeqCst);
    h.page.ready().await.unwrap();

    let err = h.page.click_card("1").await.unwrap_err();
    assert!(matches!(err, FolioError::ViewerLibraryLoadFailure(_)));
    assert!(!h.page.panorama_loader().is_loaded());
    h.page.with_state(|s| {
        let id = s.modals.active();
        assert_eq!(id, None);
        assert_eq!(s.notices.last(), Some((NoticeKind::Error, VIEWER_FAILED_MESSAGE)));
    });

    // A later open retries the load.
    h.assets.fail.store(false, Ordering::SeqCst);
    h.page.click_card("1").await.unwrap().unwrap();
    assert_eq!(h.assets.script_loads(), 2);
    assert_eq!(h.library.created_count(), 1);
}

#[tokio::test]
async fn preloaded_library_skips_asset_fetch() {
    let h = harness(vec![pano(1)]);
    let library = Arc::new(RecordingLibrary::default());
    let page = h.page.with_panorama_loader(PanoramaLoader::preloaded(
        library.clone(),
        h.assets.clone(),
    ));
    page.ready().await.unwrap();
    page.click_card("1").await.unwrap().unwrap();
    assert_eq!(h.assets.script_loads(), 0);
    assert_eq!(library.created_count(), 1);
}
