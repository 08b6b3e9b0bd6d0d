//! A [`Dom`] over the browser's own document, available with the `"web"` feature.

use crate::host::{Batch, Dom, Host};
use tracing::{error, trace_span, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Node};

/// Renders into a live [`web_sys::Document`].
///
/// Failed DOM calls are logged and otherwise ignored, as there's nobody to report them to mid-update.
#[derive(Debug, Clone)]
pub struct WebDom {
	document: Document,
}

impl WebDom {
	#[must_use]
	pub fn new(document: Document) -> Self {
		Self { document }
	}

	/// The global window's document, if there is one.
	#[must_use]
	pub fn from_window() -> Option<Self> {
		web_sys::window().and_then(|window| window.document()).map(Self::new)
	}

	#[must_use]
	pub fn document(&self) -> &Document {
		&self.document
	}
}

impl Host for WebDom {
	type Node = Node;

	fn insert_before(&mut self, parent: &Node, batch: Batch<Node>, anchor: Option<&Node>) {
		let span = trace_span!("Inserting nodes", count = batch.len());
		let _enter = span.enter();

		// One DOM insertion per batch.
		let fragment = self.document.create_document_fragment();
		for node in batch {
			if let Err(error) = fragment.append_child(&node) {
				error!("Failed to stage node for insertion: {:?}", error);
			}
		}
		if let Err(error) = parent.insert_before(&fragment, anchor) {
			error!("Failed to insert nodes: {:?}", error);
		}
	}
}

impl Dom for WebDom {
	fn create_element(&mut self, tag: &str) -> Node {
		match self.document.create_element(tag) {
			Ok(element) => element.into(),
			Err(error) => {
				error!("Failed to create element <{}>: {:?}. Substituting an empty text node.", tag, error);
				self.document.create_text_node("").into()
			}
		}
	}

	fn set_attribute(&mut self, element: &Node, name: &str, value: &str) {
		match element.dyn_ref::<Element>() {
			Some(element) => {
				if let Err(error) = element.set_attribute(name, value) {
					error!("Failed to set attribute `{}`: {:?}", name, error);
				}
			}
			None => warn!("Tried to set attribute `{}` on a non-element node {:?}. Ignoring.", name, element),
		}
	}

	fn create_text(&mut self, text: &str) -> Node {
		self.document.create_text_node(text).into()
	}

	fn set_text(&mut self, text_node: &Node, text: &str) {
		text_node.set_text_content(Some(text));
	}

	fn remove(&mut self, node: &Node) {
		if let Some(parent) = node.parent_node() {
			if let Err(error) = parent.remove_child(node) {
				error!("Failed to remove node: {:?}", error);
			}
		}
	}
}
