//! Alias scopes, through which units see their entry's key and position by name.

use crate::model::Key;
use hashbrown::HashMap;
use std::rc::Rc;

/// An immutable, cheaply clonable map from alias name to value.
#[derive(Debug, Clone, Default)]
pub struct Scope(Rc<HashMap<Rc<str>, Key>>);

impl Scope {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns `self` unchanged (sharing storage) if `name` is [`None`],
	/// otherwise a copy of `self` with `name` set to `value`.
	///
	/// `self` is never modified.
	#[must_use]
	pub fn extend(&self, name: Option<&str>, value: Key) -> Self {
		match name {
			None => self.clone(),
			Some(name) => {
				let mut refs = (*self.0).clone();
				refs.insert(name.into(), value);
				Self(Rc::new(refs))
			}
		}
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&Key> {
		self.0.get(name)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Whether both scopes share the same storage.
	#[must_use]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

/// The key and index alias scopes visible to one fragment.
#[derive(Debug, Clone, Default)]
pub struct Scopes {
	pub key_refs: Scope,
	pub index_refs: Scope,
}

impl Scopes {
	/// Looks `name` up as an index alias first, then as a key alias.
	#[must_use]
	pub fn resolve(&self, name: &str) -> Option<&Key> {
		self.index_refs.get(name).or_else(|| self.key_refs.get(name))
	}
}

/// The alias names a repetition site declares for its entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aliases {
	/// Bound to each entry's key.
	pub key: Option<Rc<str>>,
	/// Bound to each entry's position.
	pub index: Option<Rc<str>>,
	/// Bound to each entry's key over mappings, and to its position over sequences.
	pub entry: Option<Rc<str>>,
}

impl Aliases {
	#[must_use]
	pub fn none() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn index(name: &str) -> Self {
		Self {
			index: Some(name.into()),
			..Self::default()
		}
	}

	#[must_use]
	pub fn entry(name: &str) -> Self {
		Self {
			entry: Some(name.into()),
			..Self::default()
		}
	}

	#[must_use]
	pub fn key_and_index(key: &str, index: &str) -> Self {
		Self {
			key: Some(key.into()),
			index: Some(index.into()),
			entry: None,
		}
	}

	/// Reads the template notation: `"k,i"` declares a key alias and an index alias.
	/// A lone `"n"` names the entry, see [`Aliases::entry`].
	///
	/// Empty parts are ignored, so `"k,"` declares only a key alias.
	#[must_use]
	pub fn parse(notation: &str) -> Self {
		let non_empty = |part: &str| Some(part.trim()).filter(|part| !part.is_empty()).map(Rc::from);
		match notation.split_once(',') {
			Some((key, index)) => Self {
				key: non_empty(key),
				index: non_empty(index),
				entry: None,
			},
			None => Self {
				entry: non_empty(notation),
				..Self::default()
			},
		}
	}

	/// The scopes of the unit at `index` with `key`, layered over `parent`.
	///
	/// Mapping entries have [`Key::Name`] keys, which is what the entry alias follows.
	#[must_use]
	pub fn scopes_for(&self, parent: &Scopes, key: &Key, index: usize) -> Scopes {
		let (key_alias, index_alias) = match (&self.entry, key) {
			(Some(entry), Key::Name(_)) => (self.key.as_ref().or(Some(entry)), self.index.as_ref()),
			(Some(entry), Key::Index(_)) => (self.key.as_ref(), self.index.as_ref().or(Some(entry))),
			(None, _) => (self.key.as_ref(), self.index.as_ref()),
		};
		Scopes {
			key_refs: parent.key_refs.extend(key_alias.map(|name| &**name), key.clone()),
			index_refs: parent.index_refs.extend(index_alias.map(|name| &**name), Key::Index(index)),
		}
	}
}
