use super::*;

#[test]
fn idle_guard_grants_flight() {
    let mut g = SingleFlight::new();
    assert!(g.try_begin());
    assert!(g.is_in_flight());
}

#[test]
fn concurrent_requests_coalesce_to_one_follow_up() {
    let mut g = SingleFlight::new();
    assert!(g.try_begin());
    // A burst of requests mid-flight collapses into one pending bit.
    assert!(!g.try_begin());
    assert!(!g.try_begin());
    assert!(!g.try_begin());
    // Settling claims exactly one follow-up and keeps the guard held for it.
    assert!(g.settle());
    assert!(g.is_in_flight());
    // The follow-up settles clean.
    assert!(!g.settle());
    assert!(!g.is_in_flight());
}

#[test]
fn settle_without_pending_releases_guard() {
    let mut g = SingleFlight::new();
    assert!(g.try_begin());
    assert!(!g.settle());
    assert!(g.try_begin());
}

#[test]
fn request_during_follow_up_coalesces_again() {
    let mut g = SingleFlight::new();
    assert!(g.try_begin());
    assert!(!g.try_begin());
    assert!(g.settle());
    // Still in flight (the follow-up); a new request coalesces once more.
    assert!(!g.try_begin());
    assert!(g.settle());
    assert!(!g.settle());
}
