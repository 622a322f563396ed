use chrono::{Duration, Utc};

use kino_client::entitlement::grants_access;
use kino_client::models::{
    BundleTier, MediaKind, Movie, Purchase, PurchaseStatus, PurchaseTarget,
};

fn movie(id: &str, kind: MediaKind) -> Movie {
    Movie {
        id: id.to_string(),
        title: format!("Title {id}"),
        poster_url: String::new(),
        stream_url: None,
        trailer_url: None,
        rating: 0.0,
        release_year: 2024,
        kind,
        price: 0,
        episode_urls: Vec::new(),
        overview: String::new(),
        category: None,
    }
}

fn grant(target: PurchaseTarget) -> Purchase {
    Purchase {
        id: "p1".to_string(),
        user_id: "u1".to_string(),
        target,
        status: PurchaseStatus::Paid,
        expires_at: Utc::now() + Duration::days(30),
    }
}

fn unpaid(target: PurchaseTarget) -> Purchase {
    Purchase {
        status: PurchaseStatus::Other("NEW".to_string()),
        ..grant(target)
    }
}

#[test]
fn premium_bundle_unlocks_both_kinds() {
    let purchases = [grant(PurchaseTarget::Bundle(BundleTier::Premium))];
    assert!(grants_access(&purchases, &movie("m1", MediaKind::Movie)));
    assert!(grants_access(&purchases, &movie("s1", MediaKind::Series)));
}

#[test]
fn series_bundle_unlocks_series_only() {
    let purchases = [grant(PurchaseTarget::Bundle(BundleTier::Series))];
    assert!(grants_access(&purchases, &movie("s1", MediaKind::Series)));
    assert!(!grants_access(&purchases, &movie("m1", MediaKind::Movie)));
}

#[test]
fn movies_bundle_unlocks_movies_only() {
    let purchases = [grant(PurchaseTarget::Bundle(BundleTier::Movies))];
    assert!(grants_access(&purchases, &movie("m1", MediaKind::Movie)));
    assert!(!grants_access(&purchases, &movie("s1", MediaKind::Series)));
}

#[test]
fn direct_grant_unlocks_exactly_that_title() {
    let purchases = [grant(PurchaseTarget::Content("m1".to_string()))];
    assert!(grants_access(&purchases, &movie("m1", MediaKind::Movie)));
    assert!(grants_access(&purchases, &movie("m1", MediaKind::Series)));
    assert!(!grants_access(&purchases, &movie("m2", MediaKind::Movie)));
}

#[test]
fn superseded_blanket_subscription_unlocks_nothing() {
    let purchases = [grant(PurchaseTarget::Bundle(BundleTier::AllAccess))];
    assert!(!grants_access(&purchases, &movie("m1", MediaKind::Movie)));
    assert!(!grants_access(&purchases, &movie("s1", MediaKind::Series)));
}

#[test]
fn unpaid_rows_are_ignored() {
    let purchases = [
        unpaid(PurchaseTarget::Bundle(BundleTier::Premium)),
        unpaid(PurchaseTarget::Content("m1".to_string())),
    ];
    assert!(!grants_access(&purchases, &movie("m1", MediaKind::Movie)));
}

#[test]
fn no_purchases_means_no_access() {
    assert!(!grants_access(&[], &movie("m1", MediaKind::Movie)));
}

#[test]
fn mixed_grants_pick_the_first_matching_rule() {
    let purchases = [
        grant(PurchaseTarget::Content("m9".to_string())),
        grant(PurchaseTarget::Bundle(BundleTier::Movies)),
    ];
    // the bundle covers every movie, including ones without a direct grant
    assert!(grants_access(&purchases, &movie("m1", MediaKind::Movie)));
    // but a series still needs its own path
    assert!(!grants_access(&purchases, &movie("s1", MediaKind::Series)));
}
