//! Copy-on-write array splicing.
//!
//! Every function reads a source slice and returns a freshly allocated boxed
//! slice; the source is never touched, so the result can be handed to a new
//! node while older nodes keep sharing the original.
//!
//! A key/value pair occupies a single cell.

/// Returns a copy of `seq` with `pair` inserted at `index`.
///
/// Elements before `index` keep their position; elements at or after it
/// shift right by one.
#[must_use]
pub fn insert_pair<T: Clone>(seq: &[T], index: usize, pair: T) -> Box<[T]> {
    debug_assert!(index <= seq.len(), "insert index {index} out of bounds");
    let mut out = Vec::with_capacity(seq.len() + 1);
    out.extend_from_slice(&seq[..index]);
    out.push(pair);
    out.extend_from_slice(&seq[index..]);
    out.into_boxed_slice()
}

/// Returns a copy of `seq` with the element at `index` replaced by `item`.
#[must_use]
pub fn replace_at<T: Clone>(seq: &[T], index: usize, item: T) -> Box<[T]> {
    debug_assert!(index < seq.len(), "replace index {index} out of bounds");
    let mut out = Vec::with_capacity(seq.len());
    out.extend_from_slice(&seq[..index]);
    out.push(item);
    out.extend_from_slice(&seq[index + 1..]);
    out.into_boxed_slice()
}

/// Returns a copy of `seq` without the pair at `index`.
#[must_use]
pub fn remove_pair<T: Clone>(seq: &[T], index: usize) -> Box<[T]> {
    debug_assert!(index < seq.len(), "remove index {index} out of bounds");
    let mut out = Vec::with_capacity(seq.len() - 1);
    out.extend_from_slice(&seq[..index]);
    out.extend_from_slice(&seq[index + 1..]);
    out.into_boxed_slice()
}

/// Removes `remove_count` elements starting at `remove_start` and places
/// `items` at `insert_at`, in one pass.
///
/// `insert_at` is a position in the *result*, which has length
/// `seq.len() - remove_count + items.len()`. The surviving source elements
/// keep their relative order and fill every position outside
/// `insert_at..insert_at + items.len()`, so the removal and insertion ranges
/// may overlap or touch.
#[must_use]
pub fn splice_replace<T: Clone>(
    seq: &[T],
    remove_start: usize,
    remove_count: usize,
    insert_at: usize,
    items: &[T],
) -> Box<[T]> {
    debug_assert!(
        remove_start + remove_count <= seq.len(),
        "removal range {remove_start}+{remove_count} out of bounds"
    );
    let len = seq.len() - remove_count + items.len();
    debug_assert!(
        insert_at + items.len() <= len,
        "insertion at {insert_at} out of bounds"
    );

    let mut survivors = seq[..remove_start]
        .iter()
        .chain(&seq[remove_start + remove_count..])
        .cloned();

    let mut out = Vec::with_capacity(len);
    out.extend(survivors.by_ref().take(insert_at));
    out.extend_from_slice(items);
    out.extend(survivors);
    out.into_boxed_slice()
}
