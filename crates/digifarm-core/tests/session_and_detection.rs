use std::sync::Arc;

use digifarm_core::auth::{AccessDecision, Role, Session, SessionManager};
use digifarm_core::detection::{
    DetectionState, DetectionWorkflow, DiseaseClassifier, DroppedFile, InMemoryPreviewStore,
    KeywordClassifier, SeededRandom, ThreadRandom,
};
use digifarm_core::disease::DiseaseCatalog;
use digifarm_core::route::{Route, resolve};

fn run_detection(file_name: &str, seed: u64) -> DetectionWorkflow {
    let classifier = KeywordClassifier::new(Arc::new(DiseaseCatalog::builtin()));
    let mut workflow = DetectionWorkflow::new(Arc::new(InMemoryPreviewStore::new()));
    workflow
        .stage_drop(vec![DroppedFile::new(file_name, "image/jpeg", vec![0xFF])])
        .expect("jpeg should be accepted");
    let ticket = workflow.begin_analysis().expect("staged image should analyze");
    let outcome = classifier.classify(ticket.file_name(), &mut SeededRandom::new(seed));
    assert!(workflow.complete(&ticket, outcome));
    workflow
}

#[test]
fn test_gate_blocks_detection_until_user_logs_in() {
    let mut manager = SessionManager::default();
    assert_eq!(
        resolve(manager.session(), Route::DiseaseDetection).resolved,
        Route::Login
    );

    assert!(!manager.login("Jana", "wrong"));
    assert_eq!(manager.authorize(Role::User), AccessDecision::RedirectToLogin);

    assert!(manager.login("Jana", "1234"));
    assert_eq!(
        resolve(manager.session(), Route::DiseaseDetection).resolved,
        Route::DiseaseDetection
    );

    manager.logout();
    assert_eq!(manager.session(), &Session::anonymous());
    assert_eq!(
        resolve(manager.session(), Route::DiseaseDetection).resolved,
        Route::Login
    );
}

#[test]
fn test_admin_is_kept_out_of_detection() {
    let mut manager = SessionManager::default();
    assert!(manager.login("triple charm", "12345"));
    let nav = resolve(manager.session(), Route::DiseaseDetection);
    assert_eq!(nav.decision, AccessDecision::RedirectToHome(Role::Admin));
    assert_eq!(nav.resolved, Route::AdminDashboard);
}

#[test]
fn test_tomato_file_always_resolves_to_tomato() {
    for seed in 0..50 {
        let workflow = run_detection("tomato_leaf.jpg", seed);
        assert_eq!(workflow.state(), DetectionState::Resolved);
        assert_eq!(workflow.result().unwrap().crop, "Tomato");
    }
}

#[test]
fn test_keyword_files_resolve_to_their_crop() {
    for (file, crop) in [
        ("Apple-orchard.png", "Apple"),
        ("garden_rose.gif", "Rose"),
        ("GRAPE.jpeg", "Grape"),
    ] {
        let workflow = run_detection(file, 3);
        assert_eq!(workflow.result().unwrap().crop, crop, "{file}");
    }
}

#[test]
fn test_unknown_file_resolves_to_catalog_member() {
    let catalog = DiseaseCatalog::builtin();
    for seed in 0..50 {
        let workflow = run_detection("unknown.jpg", seed);
        let result = workflow.result().expect("resolved workflow has a result");
        assert!(catalog.contains(result));
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let a = run_detection("field.jpg", 99);
    let b = run_detection("field.jpg", 99);
    assert_eq!(a.result(), b.result());
}

#[test]
fn test_unknown_file_can_hit_every_record() {
    let classifier = KeywordClassifier::new(Arc::new(DiseaseCatalog::builtin()));
    let mut seen = std::collections::HashSet::new();
    let mut rng = ThreadRandom;
    for _ in 0..1000 {
        seen.insert(classifier.classify("unknown.jpg", &mut rng).unwrap().id);
    }
    assert_eq!(seen.len(), 5);
}

#[test]
fn test_preview_lifecycle_across_restaging_and_clear() {
    let store = Arc::new(InMemoryPreviewStore::new());
    let mut workflow = DetectionWorkflow::new(store.clone());

    for name in ["a.jpg", "b.png", "c.gif"] {
        workflow
            .stage_drop(vec![DroppedFile::from_name(name, vec![])])
            .unwrap();
        assert_eq!(store.live_count(), 1);
    }
    assert_eq!(store.revoked_count(), 2);

    workflow.clear();
    assert_eq!(store.live_count(), 0);
    assert_eq!(store.revoked_count(), 3);
    assert_eq!(workflow.state(), DetectionState::Idle);
}
