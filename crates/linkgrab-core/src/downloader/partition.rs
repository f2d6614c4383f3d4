//! Recursive midpoint split of the item list into units of work.

/// Splits `items` in half until every slice holds at most `threshold`
/// elements. The result keeps document order; an empty list yields no slices.
///
/// The threshold controls granularity only; how many slices run at once is
/// decided by the worker count.
pub fn partition<T>(items: &[T], threshold: usize) -> Vec<&[T]> {
    let mut out = Vec::new();
    split(items, threshold.max(1), &mut out);
    out
}

fn split<'a, T>(items: &'a [T], threshold: usize, out: &mut Vec<&'a [T]>) {
    if items.len() > threshold {
        let (left, right) = items.split_at(items.len() / 2);
        split(left, threshold, out);
        split(right, threshold, out);
    } else if !items.is_empty() {
        out.push(items);
    }
}
