//! Half-open interval utilities

/// Merge `[start, end)` intervals into the minimal sorted set of disjoint
/// intervals covering the same positions.
///
/// Touching intervals (`[0, 5)` and `[5, 9)`) are joined. Empty intervals
/// contribute nothing. Running the merge on its own output returns it
/// unchanged.
pub fn merge_overlapping_regions(regions: &[(i64, i64)]) -> Vec<(i64, i64)> {
    // (location, delta): starts sort ahead of ends at the same location
    let mut events: Vec<(i64, i32)> = regions
        .iter()
        .filter(|(start, end)| start < end)
        .flat_map(|&(start, end)| [(start, 1), (end, -1)])
        .collect();
    events.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut merged = Vec::new();
    let mut depth = 0;
    let mut open = 0;
    for (loc, delta) in events {
        if depth == 0 && delta > 0 {
            open = loc;
        }
        depth += delta;
        if depth == 0 {
            merged.push((open, loc));
        }
    }
    merged
}
