//! The crate's error taxonomy: inputs can be rejected with a typed
//! [`BuildError`], but internal structural invariants are checked with
//! `debug_assert!`-style panics rather than propagated, since a violation
//! there means a bug in this crate, not a problem with the caller's input.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    /// The site set is geometrically degenerate in a way the merge could
    /// not resolve — most commonly a seam walk that failed to terminate
    /// within its iteration bound (see [`crate::voronoi::merge_voronoi`]),
    /// which in practice only happens for heavily co-circular or
    /// near-duplicate input that slipped past deduplication.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A structural invariant of the half-edge graph was violated. Only
    /// returned outside of `debug_assertions` builds, where the same
    /// condition aborts immediately via [`debug_validate`] instead.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),

    /// Reserved for completeness with the rest of the taxonomy. Ordinary
    /// allocation failure aborts the process before this crate's code runs
    /// again, so this variant is not expected to be constructed in
    /// practice.
    #[error("resource exhausted")]
    ResourceExhaustion,
}

/// Structural sanity checks over the half-edge graph, run after every merge
/// step in debug builds: every half-edge's twin points back, `next`/`prev`
/// are mutual inverses, and a half-edge never borders the same cell as its
/// twin.
#[cfg(debug_assertions)]
pub fn debug_validate(dcel: &crate::dcel::Dcel, cells: &[crate::voronoi::Cell]) {
    for (site, cell) in cells.iter().enumerate() {
        let Some(head) = cell.head else { continue };
        let mut curr = head;
        let mut visited = 0usize;
        loop {
            debug_assert_eq!(
                dcel.cell(curr),
                site,
                "half-edge {curr:?} claims cell {} but sits on cell {site}'s boundary",
                dcel.cell(curr)
            );
            debug_assert_eq!(
                dcel.next(dcel.prev(curr)),
                curr,
                "next/prev are not mutual inverses at {curr:?}"
            );
            debug_assert_ne!(
                dcel.cell(dcel.twin(curr)),
                site,
                "half-edge {curr:?} and its twin both claim cell {site}"
            );
            curr = dcel.next(curr);
            visited += 1;
            debug_assert!(
                visited <= cells.len() * 8 + 8,
                "cell {site}'s boundary cycle does not close after {visited} steps"
            );
            if curr == head {
                break;
            }
        }
    }
}

#[cfg(not(debug_assertions))]
pub fn debug_validate(_dcel: &crate::dcel::Dcel, _cells: &[crate::voronoi::Cell]) {}
