use super::domain::Listing;

/// Rows for the "active properties" table: order-preserving borrow view,
/// recomputed on every call.
pub fn project_active(listings: &[Listing]) -> Vec<&Listing> {
    listings.iter().filter(|listing| listing.is_active).collect()
}

/// Rows for the "inactive properties" table.
pub fn project_inactive(listings: &[Listing]) -> Vec<&Listing> {
    listings
        .iter()
        .filter(|listing| !listing.is_active)
        .collect()
}
