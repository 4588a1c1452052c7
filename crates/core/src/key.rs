//! Composite identity of one tracked item-market.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The (realm, auction-house, item) triple.
///
/// Both the baseline table and the enrichment lookup build keys through
/// [`CompositeKey::new`], so equal triples always hash and compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeKey {
    pub realm_id: i32,
    pub auction_house_id: i32,
    pub item_id: i32,
}

impl CompositeKey {
    pub const fn new(realm_id: i32, auction_house_id: i32, item_id: i32) -> Self {
        Self {
            realm_id,
            auction_house_id,
            item_id,
        }
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.realm_id, self.auction_house_id, self.item_id
        )
    }
}
