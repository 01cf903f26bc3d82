use serde::Serialize;

use super::domain::Listing;

/// Aggregate counts and value sums over a listing collection. Never stored;
/// recomputed from scratch whenever the backing collection changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedStats {
    pub active_count: usize,
    pub inactive_count: usize,
    pub total_count: usize,
    pub active_value_sum: f64,
    pub inactive_value_sum: f64,
}

/// Single pass over the collection; no ordering assumption, input untouched.
pub fn derive_stats(listings: &[Listing]) -> DerivedStats {
    let mut stats = DerivedStats {
        active_count: 0,
        inactive_count: 0,
        total_count: listings.len(),
        active_value_sum: 0.0,
        inactive_value_sum: 0.0,
    };

    for listing in listings {
        if listing.is_active {
            stats.active_count += 1;
            stats.active_value_sum += listing.price;
        } else {
            stats.inactive_count += 1;
            stats.inactive_value_sum += listing.price;
        }
    }

    stats
}
