//! Binary search over sorted numeric sequences
//!
//! Two questions come up repeatedly when placing values against a sorted
//! list: where a new value belongs so the list stays sorted (rank-ordered
//! insertion of PSM evidence), and which bin of a sorted list of breaks a
//! value falls into (gene overview binning).
//!
//! | Operation         | Ties                                  | Out of range        |
//! |-------------------|---------------------------------------|---------------------|
//! | `insertion_index` | after every equal element             | `0` or `len`        |
//! | `bin_index`       | value on a break goes to the right bin | clamped to first/last bin |

/// Index at which `value` must be inserted to keep `sorted` ascending.
///
/// Equal elements already present stay ahead of the new one, so repeated
/// insertion of ties preserves arrival order. Values that do not compare
/// (NaN) sort before everything.
pub fn insertion_index<T: PartialOrd>(sorted: &[T], value: &T) -> usize {
    sorted.partition_point(|x| x <= value)
}

/// [`insertion_index`] over the keys of `sorted`.
pub fn insertion_index_by_key<T, K: PartialOrd>(
    sorted: &[T],
    key: &K,
    key_of: impl Fn(&T) -> K,
) -> usize {
    sorted.partition_point(|x| &key_of(x) <= key)
}

/// Insert `value` into `sorted` at its rank and return the index used.
pub fn insert_sorted<T: PartialOrd>(sorted: &mut Vec<T>, value: T) -> usize {
    let idx = insertion_index(sorted, &value);
    sorted.insert(idx, value);
    idx
}

/// Index of the bin `[breaks[i], breaks[i + 1])` that contains `value`.
///
/// `breaks` must be ascending and hold at least two entries; `None` is
/// returned otherwise. Values below the first break land in bin 0 and values
/// at or above the last break land in the last bin.
pub fn bin_index<T: PartialOrd>(breaks: &[T], value: &T) -> Option<usize> {
    if breaks.len() < 2 {
        return None;
    }
    let last_bin = breaks.len() - 2;
    let idx = insertion_index(breaks, value);
    Some(idx.saturating_sub(1).min(last_bin))
}
