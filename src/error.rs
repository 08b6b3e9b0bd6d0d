use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Everything that can go wrong while building or reordering a repetition site.
///
/// Data never causes an error: a missing or non-collection value simply yields no units.
/// The variants below are either contract violations by the caller or template authoring mistakes.
#[derive(Error, Debug)]
pub enum Error {
	/// A second reorder was issued before the first one was completed by an update.
	#[error("Section was already shuffled! Call `update` before shuffling again.")]
	AlreadyShuffled,

	#[error("Only ordered sequences can be shuffled, but this repetition is bound to a {mode}.")]
	NotASequence { mode: &'static str },

	#[error("Shuffle expected {expected} new indices (one per unit), but received {found}.")]
	ShuffleLength { expected: usize, found: usize },

	#[error("Shuffle maps more than one unit to position {0}.")]
	DuplicateTarget(usize),

	#[error("Shuffle moves a unit to position {target}, but the sequence only has {len} entries.")]
	TargetOutOfRange { target: usize, len: usize },

	#[error("Unrecognised item type {0}")]
	UnrecognizedItemType(u32),

	#[error("{item} template is missing its `{field}` field.")]
	MissingField { item: &'static str, field: &'static str },

	#[error("Invalid template JSON: {0}")]
	Json(#[from] serde_json::Error),
}
