use super::*;

#[path = "../support.rs"]
mod support;

use support::{FakeLoader, RecordingService, module_text_for};

use crate::compile::cache::MemoryCache;

fn overrides(source: &str) -> BTreeMap<String, String> {
    let mut m = BTreeMap::new();
    m.insert("src/Main.tsx".to_string(), source.to_string());
    m
}

fn compiler() -> SceneCompiler {
    SceneCompiler::new(
        "proj-1",
        Box::new(FakeLoader::new()),
        Box::new(MemoryCache::new()),
    )
}

#[test]
fn compile_now_installs_module() {
    let service = RecordingService::default();
    let mut c = compiler();
    c.compile_now(&service, overrides("v0"));

    assert_eq!(service.calls.borrow().len(), 1);
    assert_eq!(c.generation(), 1);
    let scene = c.scene().unwrap();
    assert_eq!(scene.generation, 1);
    assert_eq!(scene.hash, fingerprint_overrides(&overrides("v0")));
    assert!(c.last_error().is_none());
    assert!(!c.is_compiling());
}

#[test]
fn burst_during_flight_coalesces_to_one_follow_up_with_latest_set() {
    let mut c = compiler();

    // t=0: first change starts compiling.
    let t1 = c.request(overrides("v0")).unwrap();
    assert_eq!(t1.purpose, TicketPurpose::Install);

    // t=10..30: three more changes land while the compile is in flight.
    assert!(c.request(overrides("v1")).is_none());
    assert!(c.request(overrides("v2")).is_none());
    assert!(c.request(overrides("v3")).is_none());

    // Settling yields exactly one follow-up, built from the t=30 set.
    let t2 = c
        .complete(t1, Ok(module_text_for(&overrides("v0"))))
        .unwrap();
    assert_eq!(t2.overrides, overrides("v3"));
    assert_eq!(t2.hash, fingerprint_overrides(&overrides("v3")));

    // The follow-up settles clean: two compiles total for four events.
    assert!(
        c.complete(t2, Ok(module_text_for(&overrides("v3"))))
            .is_none()
    );
    assert_eq!(c.scene().unwrap().hash, fingerprint_overrides(&overrides("v3")));
}

#[test]
fn cache_hit_short_circuits_and_schedules_background_refresh() {
    let service = RecordingService::default();
    let mut c = compiler();

    c.compile_now(&service, overrides("v0"));
    assert_eq!(service.calls.borrow().len(), 1);
    assert_eq!(c.generation(), 1);

    // Same set again: served from cache, plus exactly one refresh call.
    c.compile_now(&service, overrides("v0"));
    assert_eq!(service.calls.borrow().len(), 2);
    assert_eq!(c.generation(), 2);

    // The refresh ticket is marked as such when driven manually.
    let ticket = c.request(overrides("v0")).unwrap();
    assert_eq!(ticket.purpose, TicketPurpose::RefreshCache);
    assert_eq!(c.generation(), 3, "cache hit installs before the refresh");
    c.complete(ticket, Ok(module_text_for(&overrides("v0"))));
}

#[test]
fn background_refresh_failure_is_ignored() {
    let service = RecordingService::default();
    let mut c = compiler();
    c.compile_now(&service, overrides("v0"));

    // Second compile hits the cache; its refresh call fails.
    service.fail.set(true);
    c.compile_now(&service, overrides("v0"));

    assert_eq!(c.generation(), 2);
    assert!(c.scene().is_some());
    assert!(c.last_error().is_none(), "refresh failures never reach the UI");
}

#[test]
fn compile_failure_keeps_previous_scene_and_surfaces_message() {
    let service = RecordingService::default();
    let mut c = compiler();
    c.compile_now(&service, overrides("v0"));
    assert_eq!(c.generation(), 1);

    service.fail.set(true);
    c.compile_now(&service, overrides("v1"));

    assert_eq!(c.generation(), 1, "failed compile must not bump the scene");
    assert_eq!(c.scene().unwrap().hash, fingerprint_overrides(&overrides("v0")));
    assert!(c.last_error().unwrap().contains("service rejected overrides"));

    c.clear_error();
    assert!(c.last_error().is_none());
}

#[test]
fn load_failure_keeps_previous_scene() {
    let service = RecordingService::default();
    let mut c = compiler();
    c.compile_now(&service, overrides("v0"));

    // The fake loader refuses module text containing "unloadable".
    c.compile_now(&service, overrides("unloadable"));

    assert_eq!(c.generation(), 1);
    assert_eq!(c.scene().unwrap().hash, fingerprint_overrides(&overrides("v0")));
    assert!(c.last_error().is_some());
}

#[test]
fn first_load_failure_leaves_no_scene() {
    let service = RecordingService::default();
    let mut c = compiler();
    c.compile_now(&service, overrides("unloadable"));

    assert!(c.scene().is_none());
    assert_eq!(c.generation(), 0);
    assert!(c.last_error().is_some());
}

#[test]
fn successful_install_clears_stale_error() {
    let service = RecordingService::default();
    let mut c = compiler();
    c.compile_now(&service, overrides("unloadable"));
    assert!(c.last_error().is_some());

    c.compile_now(&service, overrides("v1"));
    assert!(c.last_error().is_none());
    assert_eq!(c.generation(), 1);
}
