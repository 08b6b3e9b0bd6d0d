//! The host tree seam: where rendered nodes end up.

use core::fmt::Debug;

/// An ordered, detached batch of rendered nodes, inserted into the host tree in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<N>(Vec<N>);

impl<N> Default for Batch<N> {
	fn default() -> Self {
		Self::new()
	}
}

impl<N> Batch<N> {
	#[must_use]
	pub fn new() -> Self {
		Self(Vec::new())
	}

	#[must_use]
	pub fn of(node: N) -> Self {
		Self(vec![node])
	}

	pub fn push(&mut self, node: N) {
		self.0.push(node)
	}

	pub fn append(&mut self, other: Batch<N>) {
		self.0.extend(other.0)
	}

	/// Moves the batch's contents out, leaving it empty.
	#[must_use]
	pub fn take(&mut self) -> Self {
		Self(core::mem::take(&mut self.0))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> core::slice::Iter<'_, N> {
		self.0.iter()
	}

	#[must_use]
	pub fn into_vec(self) -> Vec<N> {
		self.0
	}
}

impl<N> IntoIterator for Batch<N> {
	type Item = N;
	type IntoIter = std::vec::IntoIter<N>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<N> FromIterator<N> for Batch<N> {
	fn from_iter<T: IntoIterator<Item = N>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// The minimal host tree a repetition site needs.
pub trait Host {
	type Node: Clone + PartialEq + Debug;

	/// Inserts `batch` under `parent`, in order, immediately before `anchor`,
	/// or at the end of `parent`'s children if `anchor` is [`None`].
	///
	/// Nodes that are currently attached elsewhere are moved.
	fn insert_before(&mut self, parent: &Self::Node, batch: Batch<Self::Node>, anchor: Option<&Self::Node>);
}

/// Node creation and removal, as used by the bundled render items.
pub trait Dom: Host {
	fn create_element(&mut self, tag: &str) -> Self::Node;
	fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str);
	fn create_text(&mut self, text: &str) -> Self::Node;
	fn set_text(&mut self, text_node: &Self::Node, text: &str);

	/// Detaches `node` from its parent, if any. The node stays valid and can be inserted again.
	fn remove(&mut self, node: &Self::Node);
}

/// The render item that contains a repetition site (or any other child), as seen from that child.
pub trait Owner<N> {
	/// Propagates "I changed" upwards.
	fn bubble(&self);

	/// The host node the child's nodes are (to be) inserted into, if rendered.
	fn find_parent_node(&self) -> Option<N>;

	/// The first host node following the child's own nodes, or [`None`] to append.
	fn find_next_node(&self) -> Option<N>;
}

/// An [`Owner`] for one child among siblings.
///
/// `next` is the first node of the following siblings, if any has one.
/// [`Anchor::sibling`] falls back to the outer owner's next node when there is none,
/// [`Anchor::child`] does not, since it marks the end of an element's content.
pub struct Anchor<'a, N> {
	outer: &'a dyn Owner<N>,
	parent: Option<N>,
	next: Option<N>,
	inherit_next: bool,
}

impl<'a, N: Clone> Anchor<'a, N> {
	#[must_use]
	pub fn sibling(outer: &'a dyn Owner<N>, next: Option<N>) -> Self {
		Self {
			outer,
			parent: outer.find_parent_node(),
			next,
			inherit_next: true,
		}
	}

	#[must_use]
	pub fn child(outer: &'a dyn Owner<N>, parent: Option<N>, next: Option<N>) -> Self {
		Self {
			outer,
			parent,
			next,
			inherit_next: false,
		}
	}
}

impl<'a, N: Clone> Owner<N> for Anchor<'a, N> {
	fn bubble(&self) {
		self.outer.bubble()
	}

	fn find_parent_node(&self) -> Option<N> {
		self.parent.clone()
	}

	fn find_next_node(&self) -> Option<N> {
		match &self.next {
			Some(next) => Some(next.clone()),
			None if self.inherit_next => self.outer.find_next_node(),
			None => None,
		}
	}
}

/// An [`Owner`] for callers that don't track a surrounding tree, for example tests and unattached sites.
#[derive(Debug, Clone, Default)]
pub struct Detached<N> {
	pub parent: Option<N>,
	pub next: Option<N>,
}

impl<N: Clone> Owner<N> for Detached<N> {
	fn bubble(&self) {}

	fn find_parent_node(&self) -> Option<N> {
		self.parent.clone()
	}

	fn find_next_node(&self) -> Option<N> {
		self.next.clone()
	}
}
