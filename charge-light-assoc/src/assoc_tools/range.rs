use ndarray::ArrayView1;

/// Inclusive range of indices `[start, end]` into an event stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Half-open equivalent, for slicing and iteration.
    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.start..self.end + 1
    }

    fn offset(self, by: usize) -> Self {
        Self {
            start: self.start + by,
            end: self.end + by,
        }
    }
}

/// Smallest and largest coarse timestamp, or `None` for an empty stream.
pub fn span(coarse: ArrayView1<i64>) -> Option<(i64, i64)> {
    coarse.iter().fold(None, |acc, &t| match acc {
        None => Some((t, t)),
        Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
    })
}

/// First and last index whose coarse timestamp lies in `[lo, hi]`.
///
/// The two ends are found by independent scans from the front and from the back,
/// so on an unsorted stream the range may contain indices outside `[lo, hi]`.
/// Returns `None` when no index qualifies.
pub fn overlap_range(coarse: ArrayView1<i64>, lo: i64, hi: i64) -> Option<IndexRange> {
    let inside = |t: &i64| *t >= lo && *t <= hi;
    let start = coarse.iter().position(inside)?;
    let end = coarse.iter().rposition(inside)?;
    Some(IndexRange { start, end })
}

/// Like `overlap_range` but only searching within `within`.
pub fn overlap_range_within(
    coarse: ArrayView1<i64>,
    within: IndexRange,
    lo: i64,
    hi: i64,
) -> Option<IndexRange> {
    let sub = coarse.slice(ndarray::s![within.as_range()]);
    overlap_range(sub, lo, hi).map(|r| r.offset(within.start))
}

/// Indices of stream `a` that can possibly be associated with stream `b`: those
/// whose coarse timestamp lies strictly within `(min(b) - 1, max(b) + 1)`.
pub fn restricted_range(coarse_a: ArrayView1<i64>, coarse_b: ArrayView1<i64>) -> Option<IndexRange> {
    let (lo, hi) = span(coarse_b)?;
    overlap_range(coarse_a, lo, hi)
}
