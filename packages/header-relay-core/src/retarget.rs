//! The weighted-median difficulty retargeter (§4.4).
//!
//! No teacher file does this exact computation — `light_client_bitcoin`
//! leans on `bitcoin::BlockHeader`'s target math directly rather than a
//! custom retarget window — so this module is grounded on §4.4's algorithm
//! description directly, read alongside the corpus in
//! `header_sync_test.go`'s `TestGetNextTarget` (whose exact expected value we
//! cannot reproduce here, since its `getNextTarget`/`targetToDiff`
//! implementation isn't in the retrieved source; the hand-computed case
//! below plays the same role with arithmetic we can verify by hand).

use header_relay_common::error::{CoreError, CoreResult};
use primitive_types::U256;

use crate::bigtarget::{compact_to_target, difficulty_to_target};
use crate::config::RetargetConfig;
use crate::header::BlockDiffInfo;

/// Computes the next target from a window of `config.window_size` ancestors
/// in descending block order (index 0 is the newest parent), per §4.4.
pub fn compute_next_target(window: &[BlockDiffInfo], config: &RetargetConfig) -> CoreResult<U256> {
    if window.len() != config.window_size {
        return Err(CoreError::InsufficientHistory {
            have: window.len(),
            need: config.window_size,
        });
    }

    // Step 2: N-1 block-time deltas, floored at 1ms for non-positive gaps.
    let mut block_time = Vec::with_capacity(window.len() - 1);
    for pair in window.windows(2) {
        let (newer, older) = (pair[0].timestamp_ms, pair[1].timestamp_ms);
        let delta = newer.checked_sub(older).filter(|d| *d > 0).unwrap_or(1);
        block_time.push(delta);
    }

    // Step 3: weighted medians. Weight i+1 (1-indexed from the newest
    // sample); the full window is used for diffs (W = N*(N+1)/2), the full
    // block_time vector for times (W = (N-1)*N/2).
    let diff_pairs: Vec<(U256, u64)> = window
        .iter()
        .enumerate()
        .map(|(i, b)| (b.difficulty, (i + 1) as u64))
        .collect();
    let time_pairs: Vec<(u64, u64)> = block_time
        .iter()
        .enumerate()
        .map(|(i, &t)| (t, (i + 1) as u64))
        .collect();

    let median_diff = weighted_median_u256(diff_pairs);
    let median_time = weighted_median_u64(time_pairs);

    // Step 4.
    let median_target = difficulty_to_target(median_diff)?;

    // Step 5: damped next target, clamped to [T/2, 2T] before the division.
    let half = config.time_plan_ms / 2;
    let double = config.time_plan_ms.saturating_mul(2);
    let clamped = median_time.clamp(half.max(1), double);

    let scaled = median_target
        .checked_mul(U256::from(clamped))
        .ok_or_else(|| CoreError::Other("retarget overflow: median_target * clamped_time".into()))?;
    let next_target = scaled / U256::from(config.time_plan_ms);

    // Step 6: cap at MAX_TARGET.
    let max_target = compact_to_target(config.max_target_compact)?;
    Ok(next_target.min(max_target))
}

/// The weighted median of `(value, weight)` pairs: sort by value ascending
/// (stable, so ties keep the earlier/more-recent sample first) and return
/// the first value whose cumulative weight reaches `ceil(total_weight / 2)`.
fn weighted_median_u256(mut items: Vec<(U256, u64)>) -> U256 {
    items.sort_by(|a, b| a.0.cmp(&b.0));
    let total: u64 = items.iter().map(|(_, w)| w).sum();
    let threshold = (total + 1) / 2;
    let mut acc = 0u64;
    for (value, weight) in items {
        acc += weight;
        if acc >= threshold {
            return value;
        }
    }
    unreachable!("cumulative weight always reaches the threshold")
}

fn weighted_median_u64(mut items: Vec<(u64, u64)>) -> u64 {
    items.sort_by(|a, b| a.0.cmp(&b.0));
    let total: u64 = items.iter().map(|(_, w)| w).sum();
    let threshold = (total + 1) / 2;
    let mut acc = 0u64;
    for (value, weight) in items {
        acc += weight;
        if acc >= threshold {
            return value;
        }
    }
    unreachable!("cumulative weight always reaches the threshold")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn window(entries: &[(u64, u64)]) -> Vec<BlockDiffInfo> {
        entries
            .iter()
            .map(|&(ts, diff)| BlockDiffInfo::new(ts, U256::from(diff)))
            .collect()
    }

    #[test]
    fn insufficient_history_is_rejected() {
        let config = RetargetConfig::new(24, 5918);
        let short = window(&[(100, 10), (90, 20)]);
        assert!(matches!(
            compute_next_target(&short, &config),
            Err(CoreError::InsufficientHistory { have: 2, need: 24 })
        ));
    }

    /// Hand-computable case: 4-entry window chosen so the weighted median of
    /// both diffs and times lands on a clean value, and the damped clamp is a
    /// no-op because `median_time == time_plan_ms` exactly. Worked by hand in
    /// this module's doc comment derivation:
    /// - diffs (weights 1..4): (100,1) (200,2) (300,3) (400,4); W=10,
    ///   threshold=5; cumulative 1,3,6 -> median_diff = 300.
    /// - times (weights 1..3): deltas 300,200,400; W=6, threshold=3; sorted
    ///   (200,2) (300,1) (400,3); cumulative 2,3 -> median_time = 300.
    /// - clamp(300, 150, 600) = 300 == time_plan_ms, so
    ///   next_target == difficulty_to_target(300) exactly (no truncation,
    ///   since x*300/300 == x for x = U256::MAX/300, and well under
    ///   MAX_TARGET so the cap never engages).
    #[test]
    fn hand_computed_window_matches_expected_target() {
        let config = RetargetConfig::new(4, 300);
        let blocks = window(&[(1000, 100), (700, 200), (500, 300), (100, 400)]);
        let next_target = compute_next_target(&blocks, &config).unwrap();
        let expected = difficulty_to_target(U256::from(300u64)).unwrap();
        assert_eq!(next_target, expected);
    }

    #[test]
    fn next_target_never_exceeds_max_target() {
        let config = RetargetConfig::new(4, 5918);
        // Extremely low difficulty (large target) and a huge time delta push
        // the raw computation far past MAX_TARGET; the cap must still hold.
        let blocks = window(&[
            (10_000_000, 1),
            (5_000_000, 1),
            (1_000_000, 1),
            (0, 1),
        ]);
        let next_target = compute_next_target(&blocks, &config).unwrap();
        let max_target = compact_to_target(config.max_target_compact).unwrap();
        assert!(next_target <= max_target);
    }

    proptest! {
        #[test]
        fn purity_is_deterministic(
            diffs in proptest::collection::vec(1u64..=1_000_000, 24),
            deltas in proptest::collection::vec(1u64..=10_000, 23),
            time_plan in 1u64..=20_000,
        ) {
            let mut ts = vec![10_000_000u64];
            for d in &deltas {
                ts.push(ts.last().unwrap() - d.min(ts.last().unwrap() - 1));
            }
            let entries: Vec<(u64, u64)> = ts.into_iter().zip(diffs.into_iter()).collect();
            let blocks = window(&entries);
            let config = RetargetConfig::new(24, time_plan);

            let a = compute_next_target(&blocks, &config).unwrap();
            let b = compute_next_target(&blocks, &config).unwrap();
            prop_assert_eq!(a, b);

            let max_target = compact_to_target(config.max_target_compact).unwrap();
            prop_assert!(a <= max_target);
        }
    }
}
