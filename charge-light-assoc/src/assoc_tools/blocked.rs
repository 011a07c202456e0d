use std::ops::Range;

use log::debug;
use ndarray::{s, ArrayViewMut2, Zip};

use crate::assoc_tools::range::{overlap_range_within, span, IndexRange};
use crate::assoc_tools::{AssocParams, COARSE_TOLERANCE};
use crate::errors::Error;
use crate::Timestamps;

/// Windowed matching of the light stream against the charge stream, one block of
/// light events at a time.
pub(super) struct BlockedMatch<'a> {
    pub charge: &'a Timestamps,
    pub light: &'a Timestamps,
    pub params: AssocParams,
    // Backing storage for the per block match matrix, reused across blocks.
    scratch: Vec<bool>,
}

impl<'a> BlockedMatch<'a> {
    pub fn new(charge: &'a Timestamps, light: &'a Timestamps, params: AssocParams) -> Self {
        Self {
            charge,
            light,
            params,
            scratch: Vec::new(),
        }
    }

    /// Returns every `(charge_idx, light_idx)` inside the two ranges that satisfies
    /// both timestamp criteria. Pairs come out ordered by block, then by charge
    /// index, then by light index.
    pub fn compute(
        mut self,
        charge_range: IndexRange,
        light_range: IndexRange,
    ) -> Result<Vec<(usize, usize)>, Error> {
        let block_size = self.params.block_size;
        let light_end = light_range.end + 1;
        let mut pairs = Vec::new();

        for i_light in light_range.as_range().step_by(block_size) {
            let j_light = (i_light + block_size).min(light_end);
            let block = i_light..j_light;

            // Non-empty by construction.
            let (lo, hi) = match span(self.light.coarse().slice(s![block.clone()])) {
                Some(bounds) => bounds,
                None => continue,
            };

            let candidates = match overlap_range_within(
                self.charge.coarse(),
                charge_range,
                lo.saturating_sub(COARSE_TOLERANCE),
                hi.saturating_add(COARSE_TOLERANCE),
            ) {
                Some(candidates) => candidates,
                None => {
                    debug!("light block {:?}: no charge candidates", block);
                    continue;
                }
            };

            let found = self.match_block(candidates.as_range(), block.clone(), &mut pairs)?;
            debug!(
                "light block {:?}: {} charge candidates, {} matches",
                block,
                candidates.len(),
                found
            );
        }
        Ok(pairs)
    }

    /// Fills the dense match matrix for one block and appends its true entries, in
    /// absolute indices, to `pairs`. Returns how many were appended.
    fn match_block(
        &mut self,
        rows: Range<usize>,
        cols: Range<usize>,
        pairs: &mut Vec<(usize, usize)>,
    ) -> Result<usize, Error> {
        let (i_charge, i_light) = (rows.start, cols.start);
        let shape = (rows.len(), cols.len());
        let ts_window = self.params.ts_window as u64;

        let charge_coarse = self.charge.coarse().slice_move(s![rows.clone()]);
        let charge_fine = self.charge.fine().slice_move(s![rows]);
        let light_coarse = self.light.coarse().slice_move(s![cols.clone()]);
        let light_fine = self.light.fine().slice_move(s![cols]);

        self.scratch.clear();
        self.scratch.resize(shape.0 * shape.1, false);
        let mut assoc_mat = ArrayViewMut2::from_shape(shape, &mut self.scratch[..])?;

        Zip::indexed(&mut assoc_mat).for_each(|(r, c), matched| {
            *matched = charge_coarse[r].abs_diff(light_coarse[c]) <= COARSE_TOLERANCE as u64
                && charge_fine[r].abs_diff(light_fine[c]) < ts_window;
        });

        let before = pairs.len();
        pairs.extend(
            assoc_mat
                .indexed_iter()
                .filter(|&(_, &matched)| matched)
                .map(|((r, c), _)| (i_charge + r, i_light + c)),
        );
        Ok(pairs.len() - before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    fn stream(coarse: &[i64], fine: &[i64]) -> Timestamps {
        Timestamps::new(arr1(coarse), arr1(fine)).unwrap()
    }

    fn params(block_size: usize) -> AssocParams {
        AssocParams {
            ts_window: 100,
            block_size,
        }
    }

    #[test]
    fn matches_across_block_boundaries() {
        // Light event 1 sits alone in its block with block_size 1 while its charge
        // partner is one second earlier.
        let charge = stream(&[10], &[50]);
        let light = stream(&[10, 11], &[1_000, 60]);
        let full = IndexRange { start: 0, end: 0 };
        let light_range = IndexRange { start: 0, end: 1 };

        for &block_size in &[1, 2, 256] {
            let pairs = BlockedMatch::new(&charge, &light, params(block_size))
                .compute(full, light_range)
                .unwrap();
            assert_eq!(pairs, vec![(0, 1)], "block_size {}", block_size);
        }
    }

    #[test]
    fn last_event_of_the_range_is_matched() {
        let charge = stream(&[5, 5, 5], &[0, 10, 20]);
        let light = stream(&[5, 5, 5], &[0, 10, 20]);
        let range = IndexRange { start: 0, end: 2 };
        let pairs = BlockedMatch::new(&charge, &light, AssocParams { ts_window: 1, block_size: 2 })
            .compute(range, range)
            .unwrap();
        assert_eq!(pairs, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn candidates_stay_inside_the_charge_range() {
        let charge = stream(&[7, 7, 7], &[0, 0, 0]);
        let light = stream(&[7], &[0]);
        let pairs = BlockedMatch::new(&charge, &light, params(4))
            .compute(IndexRange { start: 1, end: 1 }, IndexRange { start: 0, end: 0 })
            .unwrap();
        assert_eq!(pairs, vec![(1, 0)]);
    }

    #[test]
    fn coarse_gap_of_two_seconds_never_matches() {
        let charge = stream(&[10, 12], &[0, 0]);
        let light = stream(&[10, 12], &[0, 0]);
        let range = IndexRange { start: 0, end: 1 };
        let pairs = BlockedMatch::new(&charge, &light, params(1))
            .compute(range, range)
            .unwrap();
        assert_eq!(pairs, vec![(0, 0), (1, 1)]);
    }
}
