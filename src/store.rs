//! A JSON-backed data model.

use crate::{
	model::{Key, Model, Shape},
	shuffle::{self, NewIndices},
};
use core::fmt::{self, Display, Formatter};
use serde_json::Value;
use std::{cell::RefCell, rc::Rc};
use tracing::trace;

/// Shared, mutable application data.
///
/// Clones share the same data. Mutations don't notify anything:
/// call [`View::update`](`crate::View::update`) (or the equivalent on your own owner) afterwards.
#[derive(Debug, Clone, Default)]
pub struct Store(Rc<RefCell<Value>>);

impl Store {
	#[must_use]
	pub fn new(value: Value) -> Self {
		Self(Rc::new(RefCell::new(value)))
	}

	#[must_use]
	pub fn root(&self) -> Keypath {
		Keypath {
			store: self.clone(),
			keys: Vec::new().into(),
		}
	}

	/// `path` is dot-separated. All-digit segments are positions.
	#[must_use]
	pub fn keypath(&self, path: &str) -> Keypath {
		Keypath {
			store: self.clone(),
			keys: parse_path(path).into(),
		}
	}

	#[must_use]
	pub fn get(&self, path: &str) -> Option<Value> {
		lookup(&self.0.borrow(), &parse_path(path)).cloned()
	}

	/// Sets the value at `path`. Sequences are padded with `null` if `path` points past their end.
	///
	/// Returns `false` iff the parent of `path` isn't a collection.
	pub fn set(&self, path: &str, value: Value) -> bool {
		let keys = parse_path(path);
		let mut root = self.0.borrow_mut();
		let (last, parent_keys) = match keys.split_last() {
			Some(split) => split,
			None => {
				*root = value;
				return true;
			}
		};

		match lookup_mut(&mut root, parent_keys) {
			Some(Value::Object(map)) => {
				map.insert(last.to_string(), value);
				true
			}
			Some(Value::Array(items)) => match last.as_index() {
				Some(index) => {
					if index >= items.len() {
						items.resize(index + 1, Value::Null);
					}
					items[index] = value;
					true
				}
				None => false,
			},
			_ => false,
		}
	}

	/// Removes an entry, preserving the order of the remaining ones.
	pub fn remove(&self, path: &str) -> Option<Value> {
		let keys = parse_path(path);
		let (last, parent_keys) = keys.split_last()?;
		let mut root = self.0.borrow_mut();
		match lookup_mut(&mut root, parent_keys)? {
			Value::Object(map) => map.shift_remove(&last.to_string()),
			Value::Array(items) => match last.as_index() {
				Some(index) if index < items.len() => Some(items.remove(index)),
				_ => None,
			},
			_ => None,
		}
	}

	/// Appends to the sequence at `path`. Returns `false` iff there's no sequence there.
	///
	/// Appending never moves existing entries, so no shuffle is needed.
	pub fn push(&self, path: &str, values: impl IntoIterator<Item = Value>) -> bool {
		let mut root = self.0.borrow_mut();
		match lookup_mut(&mut root, &parse_path(path)) {
			Some(Value::Array(items)) => {
				items.extend(values);
				true
			}
			_ => false,
		}
	}

	/// Replaces `delete_count` entries at `start` of the sequence at `path` with `values`.
	///
	/// Returns the new indices to shuffle with, or [`None`] if there's no sequence at `path`.
	pub fn splice(&self, path: &str, start: usize, delete_count: usize, values: Vec<Value>) -> Option<NewIndices> {
		let mut root = self.0.borrow_mut();
		let items = match lookup_mut(&mut root, &parse_path(path))? {
			Value::Array(items) => items,
			_ => return None,
		};

		let len = items.len();
		let start = start.min(len);
		let end = start.saturating_add(delete_count).min(len);
		let insert_count = values.len();
		let _removed: Vec<Value> = items.splice(start..end, values).collect();
		trace!(len, start, deleted = end - start, inserted = insert_count, "Spliced sequence.");
		Some(shuffle::splice(len, start, delete_count, insert_count))
	}

	/// Rearranges the sequence at `path` so that `order[new_position]` is the old position of each entry.
	/// Entries not mentioned in `order` are dropped.
	///
	/// Returns the new indices to shuffle with, or [`None`] if there's no sequence at `path` or `order` is invalid.
	pub fn reorder(&self, path: &str, order: &[usize]) -> Option<NewIndices> {
		let mut root = self.0.borrow_mut();
		let items = match lookup_mut(&mut root, &parse_path(path))? {
			Value::Array(items) => items,
			_ => return None,
		};

		let new_indices = shuffle::from_order(items.len(), order)?;
		let mut previous: Vec<Option<Value>> = core::mem::take(items).into_iter().map(Some).collect();
		*items = order.iter().map(|&old_index| previous[old_index].take().unwrap_or(Value::Null)).collect();
		Some(new_indices)
	}
}

/// A location in a [`Store`].
#[derive(Debug, Clone)]
pub struct Keypath {
	store: Store,
	keys: Rc<[Key]>,
}

impl PartialEq for Keypath {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.store.0, &other.store.0) && self.keys == other.keys
	}
}
impl Eq for Keypath {}

impl Keypath {
	#[must_use]
	pub fn store(&self) -> &Store {
		&self.store
	}

	#[must_use]
	pub fn keys(&self) -> &[Key] {
		&self.keys
	}

	/// A keypath relative to this one. `path` is dot-separated.
	#[must_use]
	pub fn join(&self, path: &str) -> Self {
		let mut keys = self.keys.to_vec();
		keys.extend(parse_path(path));
		Self {
			store: self.store.clone(),
			keys: keys.into(),
		}
	}

	#[must_use]
	pub fn get(&self) -> Option<Value> {
		lookup(&self.store.0.borrow(), &self.keys).cloned()
	}

	/// The current value as text: strings verbatim, `null` and absent values as nothing.
	#[must_use]
	pub fn text(&self) -> String {
		lookup(&self.store.0.borrow(), &self.keys).map_or_else(String::new, value_text)
	}
}

impl Display for Keypath {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		for (i, key) in self.keys.iter().enumerate() {
			if i > 0 {
				f.write_str(".")?;
			}
			Display::fmt(key, f)?;
		}
		Ok(())
	}
}

impl Model for Keypath {
	fn shape(&self) -> Shape {
		match lookup(&self.store.0.borrow(), &self.keys) {
			Some(Value::Array(items)) => Shape::Sequence(items.len()),
			Some(Value::Object(map)) => Shape::Mapping(map.keys().map(|key| Rc::from(key.as_str())).collect()),
			_ => Shape::Other,
		}
	}

	fn join_key(&self, key: &Key) -> Self {
		let mut keys = self.keys.to_vec();
		// Keeps keypaths comparable with parsed ones.
		keys.push(match key {
			Key::Name(name) => Key::parse(name),
			Key::Index(_) => key.clone(),
		});
		Self {
			store: self.store.clone(),
			keys: keys.into(),
		}
	}
}

fn parse_path(path: &str) -> Vec<Key> {
	path.split('.').filter(|segment| !segment.is_empty()).map(Key::parse).collect()
}

fn child<'v>(value: &'v Value, key: &Key) -> Option<&'v Value> {
	match value {
		Value::Array(items) => key.as_index().and_then(|index| items.get(index)),
		Value::Object(map) => match key {
			Key::Name(name) => map.get(&**name),
			Key::Index(index) => map.get(&index.to_string()),
		},
		_ => None,
	}
}

fn child_mut<'v>(value: &'v mut Value, key: &Key) -> Option<&'v mut Value> {
	match value {
		Value::Array(items) => key.as_index().and_then(move |index| items.get_mut(index)),
		Value::Object(map) => match key {
			Key::Name(name) => map.get_mut(&**name),
			Key::Index(index) => map.get_mut(&index.to_string()),
		},
		_ => None,
	}
}

fn lookup<'v>(value: &'v Value, keys: &[Key]) -> Option<&'v Value> {
	keys.iter().try_fold(value, child)
}

fn lookup_mut<'v>(value: &'v mut Value, keys: &[Key]) -> Option<&'v mut Value> {
	keys.iter().try_fold(value, child_mut)
}

fn value_text(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(string) => string.clone(),
		Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
		Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
	}
}
