//! Selection of the best upstream candidate for a chart name
//!
//! Search backends return loosely matching packages from many publishers.
//! Only exact name matches are considered, then ties are broken in order:
//!
//! 1. Official repository
//! 2. Not deprecated
//! 3. More stars
//! 4. Verified publisher
//!
//! When every criterion ties, the first candidate in input order is kept.

use crate::upstream::UpstreamCandidate;

/// Lexicographic rank; a larger key wins
fn rank_key(candidate: &UpstreamCandidate) -> (bool, bool, u64, bool) {
    (
        candidate.official,
        !candidate.deprecated,
        candidate.stars,
        candidate.verified_publisher,
    )
}

/// Pick the best candidate whose name equals `chart_name` exactly
///
/// Returns `None` when no candidate matches the name.
pub fn select_best<'a>(
    chart_name: &str,
    candidates: &'a [UpstreamCandidate],
) -> Option<&'a UpstreamCandidate> {
    let mut best: Option<&UpstreamCandidate> = None;

    for candidate in candidates.iter().filter(|c| c.name == chart_name) {
        match best {
            // Strictly greater only, so the earliest candidate survives a full tie
            Some(current) if rank_key(candidate) <= rank_key(current) => {}
            _ => best = Some(candidate),
        }
    }

    best
}
