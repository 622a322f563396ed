// src/entitlement.rs

use crate::models::{BundleTier, MediaKind, Movie, Purchase, PurchaseTarget};

/// Decides whether a set of purchase grants unlocks a title.
///
/// Callers pass the result of `gateway::user_purchases`, which is already
/// filtered to PAID and unexpired rows; expiry is not re-checked here. The
/// paid status is, since individual `Purchase` values can come from anywhere.
///
/// Precedence, first match wins: premium bundle, then the bundle matching the
/// title's kind, then a direct grant for this exact title. The superseded
/// blanket subscription unlocks nothing.
pub fn grants_access(purchases: &[Purchase], movie: &Movie) -> bool {
    if has_bundle(purchases, BundleTier::Premium) {
        return true;
    }

    match movie.kind {
        MediaKind::Series => {
            if has_bundle(purchases, BundleTier::Series) {
                return true;
            }
        }
        MediaKind::Movie => {
            if has_bundle(purchases, BundleTier::Movies) {
                return true;
            }
        }
    }

    // Pre-bundle purchases granted one title at a time.
    purchases.iter().any(|p| {
        p.status.is_paid()
            && matches!(&p.target, PurchaseTarget::Content(id) if *id == movie.id)
    })
}

fn has_bundle(purchases: &[Purchase], tier: BundleTier) -> bool {
    purchases
        .iter()
        .any(|p| p.status.is_paid() && p.target == PurchaseTarget::Bundle(tier))
}
