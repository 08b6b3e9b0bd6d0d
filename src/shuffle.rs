//! Computing the `new_indices` argument of [`RepeatedFragment::shuffle`](`crate::RepeatedFragment::shuffle`)
//! for common sequence operations.
//!
//! `new_indices[old_position]` is the entry's position after the operation, or [`None`] if it was removed.

pub type NewIndices = Vec<Option<usize>>;

/// For removing `delete_count` entries at `start` from a sequence of length `len` and inserting `insert_count` new ones in their place.
///
/// `start` and `delete_count` are clamped to the sequence.
#[must_use]
pub fn splice(len: usize, start: usize, delete_count: usize, insert_count: usize) -> NewIndices {
	let start = start.min(len);
	let end = start.saturating_add(delete_count).min(len);
	(0..len)
		.map(|old_index| {
			if old_index < start {
				Some(old_index)
			} else if old_index < end {
				None
			} else {
				Some(old_index - (end - start) + insert_count)
			}
		})
		.collect()
}

/// For a permutation where `order[new_position]` is the entry's old position.
///
/// Old positions that don't appear in `order` count as removed.
/// Returns [`None`] if `order` mentions an old position twice or one that's out of range.
#[must_use]
pub fn from_order(len: usize, order: &[usize]) -> Option<NewIndices> {
	let mut new_indices = vec![None; len];
	for (new_index, &old_index) in order.iter().enumerate() {
		match new_indices.get_mut(old_index) {
			Some(slot) if slot.is_none() => *slot = Some(new_index),
			_ => return None,
		}
	}
	Some(new_indices)
}
