use std::ops::Range;

/// Split `len` records into `nshard` contiguous ranges whose sizes differ by
/// at most one. Shard `t` is processed by worker `t` in both passes.
#[must_use]
pub fn shard_ranges(len: usize, nshard: usize) -> Vec<Range<usize>> {
    if nshard == 0 {
        return Vec::new();
    }
    let base = len / nshard;
    let rem = len % nshard;
    let mut ranges = Vec::with_capacity(nshard);
    let mut start = 0;
    for t in 0..nshard {
        let end = start + base + usize::from(t < rem);
        ranges.push(start..end);
        start = end;
    }
    debug_assert_eq!(start, len);
    ranges
}
