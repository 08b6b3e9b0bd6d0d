//! An in-memory host tree, for server-side rendering and tests.

use crate::{
	host::{Batch, Dom, Host},
	html::escape_into,
};
use core::fmt::{self, Display, Formatter};
use tracing::{error, warn};

/// A node handle. Only meaningful for the [`Document`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl Display for NodeId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	/// The document's own root. Never has a parent.
	Root,
	Element { tag: String, attributes: Vec<(String, String)> },
	Text(String),
}

/// Counters for the host operations a [`Document`] has performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
	pub created: usize,
	/// Calls to [`Host::insert_before`].
	pub insertions: usize,
	/// Nodes inserted across all insertions.
	pub inserted_nodes: usize,
	pub removals: usize,
	pub text_updates: usize,
}

#[derive(Debug, Clone)]
struct NodeData {
	kind: NodeKind,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

/// An arena-allocated node tree. Nodes are never freed, only detached.
#[derive(Debug, Clone)]
pub struct Document {
	nodes: Vec<NodeData>,
	stats: Stats,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	#[must_use]
	pub fn new() -> Self {
		Self {
			nodes: vec![NodeData {
				kind: NodeKind::Root,
				parent: None,
				children: Vec::new(),
			}],
			stats: Stats::default(),
		}
	}

	#[must_use]
	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	#[must_use]
	pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
		self.nodes.get(node.0).map(|data| &data.kind)
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.nodes.get(node.0).and_then(|data| data.parent)
	}

	#[must_use]
	pub fn children(&self, node: NodeId) -> &[NodeId] {
		self.nodes.get(node.0).map_or(&[], |data| &data.children)
	}

	/// The concatenated text of all text nodes under `node`, in document order.
	#[must_use]
	pub fn text_content(&self, node: NodeId) -> String {
		let mut text = String::new();
		self.collect_text(node, &mut text);
		text
	}

	fn collect_text(&self, node: NodeId, text: &mut String) {
		match self.kind(node) {
			Some(NodeKind::Text(content)) => text.push_str(content),
			Some(NodeKind::Root | NodeKind::Element { .. }) => {
				for &child in self.children(node) {
					self.collect_text(child, text);
				}
			}
			None => (),
		}
	}

	#[must_use]
	pub fn inner_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		for &child in self.children(node) {
			self.write_html(child, &mut html);
		}
		html
	}

	#[must_use]
	pub fn outer_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		self.write_html(node, &mut html);
		html
	}

	fn write_html(&self, node: NodeId, html: &mut String) {
		match self.kind(node) {
			Some(NodeKind::Root) => {
				for &child in self.children(node) {
					self.write_html(child, html);
				}
			}
			Some(NodeKind::Element { tag, attributes }) => {
				html.push('<');
				html.push_str(tag);
				for (name, value) in attributes {
					html.push(' ');
					html.push_str(name);
					html.push_str("=\"");
					escape_into(html, value);
					html.push('"');
				}
				html.push('>');
				for &child in self.children(node) {
					self.write_html(child, html);
				}
				html.push_str("</");
				html.push_str(tag);
				html.push('>');
			}
			Some(NodeKind::Text(text)) => escape_into(html, text),
			None => (),
		}
	}

	#[must_use]
	pub fn stats(&self) -> Stats {
		self.stats
	}

	pub fn reset_stats(&mut self) {
		self.stats = Stats::default();
	}

	fn push(&mut self, kind: NodeKind) -> NodeId {
		self.stats.created += 1;
		self.nodes.push(NodeData {
			kind,
			parent: None,
			children: Vec::new(),
		});
		NodeId(self.nodes.len() - 1)
	}

	/// Detaches `node` from its parent. Returns whether it had one.
	fn unlink(&mut self, node: NodeId) -> bool {
		let parent = match self.nodes.get_mut(node.0).and_then(|data| data.parent.take()) {
			Some(parent) => parent,
			None => return false,
		};
		if let Some(data) = self.nodes.get_mut(parent.0) {
			data.children.retain(|&child| child != node);
		}
		true
	}
}

impl Host for Document {
	type Node = NodeId;

	fn insert_before(&mut self, parent: &NodeId, batch: Batch<NodeId>, anchor: Option<&NodeId>) {
		let parent = *parent;
		if self.nodes.get(parent.0).is_none() {
			return error!("Tried to insert into unknown node {}. Ignoring.", parent);
		}
		if matches!(self.kind(parent), Some(NodeKind::Text(_))) {
			return error!("Tried to insert into text node {}. Ignoring.", parent);
		}

		let batch: Vec<NodeId> = batch.into_iter().filter(|&node| node != parent && self.nodes.get(node.0).is_some()).collect();
		for &node in &batch {
			self.unlink(node);
		}

		let children = &self.nodes[parent.0].children;
		let position = match anchor {
			None => children.len(),
			Some(anchor) => match children.iter().position(|child| child == anchor) {
				Some(position) => position,
				None => {
					error!("Anchor {} is not a child of {}. Appending instead.", anchor, parent);
					children.len()
				}
			},
		};

		self.stats.insertions += 1;
		self.stats.inserted_nodes += batch.len();
		for &node in &batch {
			self.nodes[node.0].parent = Some(parent);
		}
		let _displaced: Vec<NodeId> = self.nodes[parent.0].children.splice(position..position, batch).collect();
	}
}

impl Dom for Document {
	fn create_element(&mut self, tag: &str) -> NodeId {
		self.push(NodeKind::Element {
			tag: tag.to_owned(),
			attributes: Vec::new(),
		})
	}

	fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) {
		match self.nodes.get_mut(element.0).map(|data| &mut data.kind) {
			Some(NodeKind::Element { attributes, .. }) => match attributes.iter_mut().find(|(existing, _)| existing == name) {
				Some((_, existing)) => value.clone_into(existing),
				None => attributes.push((name.to_owned(), value.to_owned())),
			},
			_ => warn!("Tried to set attribute `{}` on non-element {}. Ignoring.", name, element),
		}
	}

	fn create_text(&mut self, text: &str) -> NodeId {
		self.push(NodeKind::Text(text.to_owned()))
	}

	fn set_text(&mut self, text_node: &NodeId, text: &str) {
		match self.nodes.get_mut(text_node.0).map(|data| &mut data.kind) {
			Some(NodeKind::Text(content)) => {
				text.clone_into(content);
				self.stats.text_updates += 1;
			}
			_ => warn!("Tried to set text of non-text {}. Ignoring.", text_node),
		}
	}

	fn remove(&mut self, node: &NodeId) {
		if self.unlink(*node) {
			self.stats.removals += 1;
		}
	}
}
