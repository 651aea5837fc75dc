//! Optional O(1) coordinate-to-site lookup, built from a [`BuildOutput`]'s
//! site list. Not part of the core algorithm — callers who already track
//! their own site indices have no need for it.

use ahash::AHashMap;
use ordered_float::OrderedFloat;

use crate::driver::BuildOutput;
use crate::hull::SiteId;

type Key = (OrderedFloat<f64>, OrderedFloat<f64>);

/// Maps a (deduplicated) input coordinate back to its [`SiteId`].
pub struct SiteLookup {
    by_coord: AHashMap<Key, SiteId>,
}

impl SiteLookup {
    pub fn build(output: &BuildOutput) -> Self {
        let mut by_coord = AHashMap::with_capacity(output.sites.len());
        for (id, site) in output.sites.iter().enumerate() {
            by_coord.insert((OrderedFloat(site.x), OrderedFloat(site.y)), id);
        }
        SiteLookup { by_coord }
    }

    /// Looks up the site at exactly `(x, y)`. Uses bit-exact equality
    /// rather than the crate's fuzzy tolerance, since the lookup key is the
    /// literal input coordinate, not a derived geometric quantity.
    pub fn get(&self, x: f64, y: f64) -> Option<SiteId> {
        self.by_coord.get(&(OrderedFloat(x), OrderedFloat(y))).copied()
    }
}
