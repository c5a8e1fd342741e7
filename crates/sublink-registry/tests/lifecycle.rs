//! End-to-end lifecycle scenarios across load → discover → apply → persist.

use sublink_registry::discover;
use sublink_registry::{LifecycleConfig, Registry, SubscriptionStatus};

const DAY: u64 = 86_400;

#[test]
fn full_run_over_three_days() {
    let config = LifecycleConfig::new(2);
    let day0 = 1_000 * DAY;

    // Day 0: cold start, two discovered URLs, both healthy.
    let mut registry = Registry::load(None, config);
    let candidates = discover::merge(
        ["https://a.example/sub"],
        ["https://b.example/sub\n# stale comment"],
    );
    registry.absorb(candidates.iter().map(String::as_str));
    assert_eq!(registry.selectable_urls(day0).len(), 2);
    registry.apply("https://a.example/sub", true, day0);
    registry.apply("https://b.example/sub", true, day0);
    let persisted = registry.to_json().unwrap();

    // Day 1: b starts failing.
    let day1 = day0 + DAY;
    let mut registry = Registry::load(Some(&persisted), config);
    registry.apply("https://a.example/sub", true, day1);
    registry.apply("https://b.example/sub", false, day1);
    assert_eq!(registry.active_urls().len(), 2);
    let persisted = registry.to_json().unwrap();

    // Day 4: b has been failing past the 2-day window.
    let day4 = day0 + 4 * DAY;
    let mut registry = Registry::load(Some(&persisted), config);
    // b's streak started on day 1, more than 2 days ago: not probed again.
    let selectable = registry.selectable_urls(day4);
    assert_eq!(selectable, vec!["https://a.example/sub".to_string()]);
    registry.apply("https://a.example/sub", true, day4);
    assert_eq!(registry.active_urls().len(), 2); // b never probed, still nominally active

    // If b were probed once more it would expire.
    registry.apply("https://b.example/sub", false, day4);
    assert_eq!(
        registry.get("https://b.example/sub").unwrap().status,
        SubscriptionStatus::Expired
    );
    assert_eq!(registry.active_urls(), vec!["https://a.example/sub".to_string()]);
}

#[test]
fn recovery_within_window_survives() {
    let config = LifecycleConfig::new(7);
    let now = 1_000 * DAY;

    let mut registry = Registry::new(config);
    registry.absorb(["https://flaky.example/sub"]);
    registry.apply("https://flaky.example/sub", false, now);
    registry.apply("https://flaky.example/sub", false, now + 3 * DAY);
    // Recovers on day 6, inside the window.
    registry.apply("https://flaky.example/sub", true, now + 6 * DAY);

    let rec = registry.get("https://flaky.example/sub").unwrap();
    assert_eq!(rec.status, SubscriptionStatus::Active);
    assert_eq!(rec.failure_count, 0);
    assert!(rec.first_failure.is_none());

    // A new streak starts fresh from here.
    registry.apply("https://flaky.example/sub", false, now + 10 * DAY);
    assert_eq!(
        registry.get("https://flaky.example/sub").unwrap().first_failure,
        Some(now + 10 * DAY)
    );
}

#[test]
fn republished_document_is_stable_without_changes() {
    let config = LifecycleConfig::default();
    let mut registry = Registry::new(config);
    registry.absorb(["https://a.example/sub", "https://b.example/sub"]);
    let first = registry.to_json().unwrap();
    let reloaded = Registry::load(Some(&first), config);
    assert_eq!(reloaded.to_json().unwrap(), first);
}
