//! Segment type and range planning.

/// Files smaller than this per connection are not split further.
pub const MIN_SEGMENT_BYTES: u64 = 1024 * 1024;

/// A byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: u64,
    pub end: u64,
}

impl Segment {
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value for curl's `range` option (inclusive end): `start-(end-1)`.
    pub fn curl_range(&self) -> String {
        format!("{}-{}", self.start, self.end.saturating_sub(1))
    }
}

/// Splits `total_size` into at most `max_segments` near-equal ranges, never
/// making a range smaller than `min_segment` (except when the file itself is
/// smaller). Earlier segments take the remainder bytes.
pub fn plan_segments(total_size: u64, max_segments: usize, min_segment: u64) -> Vec<Segment> {
    if total_size == 0 || max_segments == 0 {
        return Vec::new();
    }

    let by_size = (total_size / min_segment.max(1)).max(1);
    let count = by_size.min(max_segments as u64);
    let base = total_size / count;
    let extra = total_size % count;

    let mut start = 0u64;
    (0..count)
        .map(|i| {
            let len = base + u64::from(i < extra);
            let seg = Segment {
                start,
                end: start + len,
            };
            start += len;
            seg
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_split() {
        let segs = plan_segments(1000, 4, 1);
        assert_eq!(
            segs,
            vec![
                Segment { start: 0, end: 250 },
                Segment { start: 250, end: 500 },
                Segment { start: 500, end: 750 },
                Segment { start: 750, end: 1000 },
            ]
        );
    }

    #[test]
    fn remainder_goes_first() {
        let lens: Vec<u64> = plan_segments(10, 4, 1).iter().map(Segment::len).collect();
        assert_eq!(lens, vec![3, 3, 2, 2]);
    }

    #[test]
    fn small_files_use_fewer_segments() {
        let segs = plan_segments(3 * MIN_SEGMENT_BYTES + 5, 8, MIN_SEGMENT_BYTES);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs.last().unwrap().end, 3 * MIN_SEGMENT_BYTES + 5);
        assert_eq!(plan_segments(100, 8, MIN_SEGMENT_BYTES).len(), 1);
    }

    #[test]
    fn empty_inputs() {
        assert!(plan_segments(0, 4, 1).is_empty());
        assert!(plan_segments(100, 0, 1).is_empty());
    }

    #[test]
    fn curl_range_is_inclusive() {
        assert_eq!(Segment { start: 0, end: 100 }.curl_range(), "0-99");
        assert_eq!(Segment { start: 42, end: 43 }.curl_range(), "42-42");
    }
}
