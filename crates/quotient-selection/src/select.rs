//! Supplier ranking and per-region selection.
//!
//! Candidates are ranked by a fixed tier policy combining date-code freshness
//! and quantity sufficiency, then capped per region. An Unknown date code in
//! the selection earns the region one buffer slot for the part.

use crate::aggregate::SupplierCandidate;
use crate::datecode::DateCodeStatus;
use quotient_core::Region;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Selection policy knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Maximum suppliers selected per non-excluded region
    pub cap_per_region: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self { cap_per_region: 3 }
    }
}

/// Why a candidate was left out of the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OmittedReason {
    /// Cut at the cap while every selected candidate in the region covered
    /// the requested quantity
    BelowQuantity,
    /// Dropped because the supplier's minimum order value cannot plausibly
    /// be met by the estimated deal value
    OpportunityFiltered,
    /// Offered only from the excluded region
    RegionExcluded,
    /// Cut at the per-region cap
    CapExceeded,
}

impl fmt::Display for OmittedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::BelowQuantity => "BELOW_QUANTITY",
            Self::OpportunityFiltered => "OPPORTUNITY_FILTERED",
            Self::RegionExcluded => "REGION_EXCLUDED",
            Self::CapExceeded => "CAP_EXCEEDED",
        };
        write!(f, "{text}")
    }
}

/// A candidate left out of the selection, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmittedCandidate {
    /// The candidate that was not selected
    pub candidate: SupplierCandidate,
    /// Why it was left out
    pub reason: OmittedReason,
}

/// Ranking tier, lower is better.
///
/// 1. Fresh, meets quantity
/// 2. Unknown, meets quantity (benefit of the doubt)
/// 3. Fresh, below quantity
/// 4. Unknown, below quantity
/// 5. Old, meets quantity
/// 6. Old, below quantity (still included, just last)
#[must_use]
pub fn tier(candidate: &SupplierCandidate, requested_quantity: u32) -> u8 {
    let meets = candidate.meets(requested_quantity);
    match (candidate.date_code_status, meets) {
        (DateCodeStatus::Fresh, true) => 1,
        (DateCodeStatus::Unknown, true) => 2,
        (DateCodeStatus::Fresh, false) => 3,
        (DateCodeStatus::Unknown, false) => 4,
        (DateCodeStatus::Old, true) => 5,
        (DateCodeStatus::Old, false) => 6,
    }
}

/// Sort key within a region.
///
/// Candidates that meet the requested quantity are mutually equal within a
/// tier (the stable sort preserves aggregation order); below-quantity
/// candidates rank by descending total quantity, closest to demand first.
fn rank_key(candidate: &SupplierCandidate, requested_quantity: u32) -> (u8, u32) {
    let quantity_key = if candidate.meets(requested_quantity) {
        0
    } else {
        u32::MAX - candidate.total_quantity
    };
    (tier(candidate, requested_quantity), quantity_key)
}

/// Rank and cap candidates per region.
///
/// Returns the selected candidates in rank order and everything else as
/// omitted with a reason. Excluded-region candidates are never selected.
#[must_use]
pub fn select_candidates(
    candidates: Vec<SupplierCandidate>,
    requested_quantity: u32,
    policy: &SelectionPolicy,
) -> (Vec<SupplierCandidate>, Vec<OmittedCandidate>) {
    let mut omitted = Vec::new();
    let mut by_region: BTreeMap<Region, Vec<SupplierCandidate>> = BTreeMap::new();

    for candidate in candidates {
        if candidate.region.is_excluded() {
            omitted.push(OmittedCandidate {
                candidate,
                reason: OmittedReason::RegionExcluded,
            });
        } else {
            by_region.entry(candidate.region).or_default().push(candidate);
        }
    }

    let mut selected = Vec::new();

    for (region, mut group) in by_region {
        group.sort_by_key(|c| rank_key(c, requested_quantity));

        let mut cap = policy.cap_per_region.min(group.len());

        // Buffer slot: an Unknown date code in the selection is a gamble, so
        // hedge with one extra supplier in that region.
        if group[..cap]
            .iter()
            .any(|c| c.date_code_status == DateCodeStatus::Unknown)
            && group.len() > cap
        {
            cap += 1;
            tracing::debug!(
                region = %region,
                "unknown date code in selection, adding buffer slot"
            );
        }

        let cut = group.split_off(cap);
        let all_selected_meet = group.iter().all(|c| c.meets(requested_quantity));

        for candidate in cut {
            let reason = if !candidate.meets(requested_quantity) && all_selected_meet {
                OmittedReason::BelowQuantity
            } else {
                OmittedReason::CapExceeded
            };
            omitted.push(OmittedCandidate { candidate, reason });
        }

        selected.extend(group);
    }

    (selected, omitted)
}
