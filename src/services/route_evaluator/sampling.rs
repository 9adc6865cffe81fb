/// Indices of `count` evenly spaced points in a path of `len` points.
///
/// Paths no longer than `count` keep every index. Otherwise index `i` (1..=count)
/// is `floor(i * len / (count + 1))`, so the endpoints are usually skipped.
/// Integer division keeps this exact: with `len > count` the stride is at least
/// one, so indices strictly increase, and `count * len / (count + 1) < len`.
pub fn sample_indices(len: usize, count: usize) -> Vec<usize> {
    if len <= count {
        return (0..len).collect();
    }

    (1..=count).map(|i| i * len / (count + 1)).collect()
}

/// Reduce a path to at most `count` representative points, preserving order.
pub fn sample_coordinates<T: Clone>(path: &[T], count: usize) -> Vec<T> {
    if path.len() <= count {
        return path.to_vec();
    }

    sample_indices(path.len(), count)
        .into_iter()
        .map(|idx| path[idx].clone())
        .collect()
}
