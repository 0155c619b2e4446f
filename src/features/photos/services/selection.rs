/// Index into a list of `len` candidates for a 1-based display order.
///
/// Wraps around with Euclidean modulo so orders past the end (or at/below zero)
/// still land inside the list. `None` when there are no candidates.
pub fn candidate_index(display_order: i32, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let index = (i64::from(display_order) - 1).rem_euclid(len as i64);
    Some(index as usize)
}

/// Pick the candidate for `display_order`, see [`candidate_index`]
pub fn select_candidate<T>(candidates: &[T], display_order: i32) -> Option<&T> {
    candidate_index(display_order, candidates.len()).map(|i| &candidates[i])
}
