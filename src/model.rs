use core::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// Identifies one entry of a bound collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
	/// A position in an ordered sequence.
	Index(usize),
	/// An own key of a keyed mapping.
	Name(Rc<str>),
}

impl Key {
	#[must_use]
	pub fn name(name: &str) -> Self {
		Self::Name(name.into())
	}

	/// Parses one keypath segment. Canonical decimal numbers (no sign or leading zeros) become [`Key::Index`].
	#[must_use]
	pub fn parse(segment: &str) -> Self {
		let canonical = segment.bytes().all(|b| b.is_ascii_digit()) && (segment == "0" || !segment.starts_with('0'));
		match segment.parse() {
			Ok(index) if canonical => Self::Index(index),
			_ => Self::name(segment),
		}
	}

	#[must_use]
	pub fn as_index(&self) -> Option<usize> {
		match self {
			Self::Index(index) => Some(*index),
			Self::Name(name) => match Self::parse(name) {
				Self::Index(index) => Some(index),
				Self::Name(_) => None,
			},
		}
	}
}

impl Display for Key {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Index(index) => Display::fmt(index, f),
			Self::Name(name) => f.write_str(name),
		}
	}
}

impl From<usize> for Key {
	fn from(index: usize) -> Self {
		Self::Index(index)
	}
}

impl From<&str> for Key {
	fn from(name: &str) -> Self {
		Self::name(name)
	}
}

/// The structural shape of a model's current value, which is all a repetition site needs to know about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
	/// An ordered sequence with this many positions (holes included).
	Sequence(usize),
	/// A keyed mapping with these own keys, in iteration order.
	Mapping(Vec<Rc<str>>),
	/// Anything else, including absent values. Treated as empty.
	Other,
}

impl Shape {
	#[must_use]
	pub fn len(&self) -> usize {
		match self {
			Self::Sequence(len) => *len,
			Self::Mapping(keys) => keys.len(),
			Self::Other => 0,
		}
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// A data model bound to some location in the application's data.
///
/// Cloning a model must be cheap, as every bound unit keeps its own handle.
pub trait Model: Clone {
	/// Inspects the current value.
	fn shape(&self) -> Shape;

	/// The child model for one entry of the current collection.
	#[must_use]
	fn join_key(&self, key: &Key) -> Self;
}
