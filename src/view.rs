//! The root of a rendered template.

use crate::{
	error::Result,
	host::{Dom, Owner},
	items::{validate, Fragment, ItemOptions, Partials},
	store::Store,
	template::Template,
	unit::RenderUnit,
};
use core::cell::Cell;
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, instrument, warn};

/// Where a [`View`] is mounted.
#[derive(Debug)]
struct Root<N> {
	target: Option<N>,
	anchor: Option<N>,
	dirty: Cell<bool>,
}

impl<N: Clone> Owner<N> for Root<N> {
	fn bubble(&self) {
		self.dirty.set(true);
	}

	fn find_parent_node(&self) -> Option<N> {
		self.target.clone()
	}

	fn find_next_node(&self) -> Option<N> {
		self.anchor.clone()
	}
}

/// A template bound to a [`Store`] and, once rendered, mounted in a host tree.
///
/// Changes to the store show up on the next [`update`](`View::update`).
/// Sequence reorders made through [`splice`](`View::splice`) or [`reorder`](`View::reorder`)
/// move existing content instead of rebinding it.
#[derive(Debug)]
pub struct View<D: Dom> {
	fragment: Fragment<D>,
	store: Store,
	root: Root<D::Node>,
}

impl<D: Dom> View<D> {
	/// # Errors
	///
	/// Iff `templates` contains an item that can't be created.
	pub fn new(templates: &[Template], store: Store) -> Result<Self> {
		Self::with_partials(templates, Partials::new(), store)
	}

	/// # Errors
	///
	/// Iff `templates` or any of `partials` contains an item that can't be created.
	#[instrument(skip(templates, partials, store))]
	pub fn with_partials(templates: &[Template], partials: Partials, store: Store) -> Result<Self> {
		validate(templates)?;
		for partial in partials.values() {
			validate(partial)?;
		}

		let options = ItemOptions {
			partials: Rc::new(partials),
			..ItemOptions::default()
		};
		let mut fragment = Fragment::new(templates, &options)?;
		fragment.bind(store.root());
		Ok(Self {
			fragment,
			store,
			root: Root {
				target: None,
				anchor: None,
				dirty: Cell::new(false),
			},
		})
	}

	/// Appends the view's content to `target`.
	pub fn render(&mut self, host: &mut D, target: D::Node) {
		self.render_before(host, target, None);
	}

	/// Inserts the view's content into `target`, before `anchor` or at the end.
	#[instrument(skip(self, host))]
	pub fn render_before(&mut self, host: &mut D, target: D::Node, anchor: Option<D::Node>) {
		if self.root.target.is_some() {
			return warn!("View is already rendered. Ignoring.");
		}

		let batch = self.fragment.render(host);
		debug!(nodes = batch.len(), "Mounting view.");
		host.insert_before(&target, batch, anchor.as_ref());
		self.root.target = Some(target);
		self.root.anchor = anchor;
	}

	/// Brings the rendered content in line with the store.
	#[instrument(skip(self, host))]
	pub fn update(&mut self, host: &mut D) {
		self.root.dirty.set(false);
		self.fragment.update(host, &self.root);
	}

	/// Queues a reorder for every section bound to `path`. Returns how many there were.
	///
	/// The store must already reflect the reorder. Nothing moves until the next [`update`](`View::update`).
	///
	/// # Errors
	///
	/// Iff a section bound to `path` rejects the reorder, see [`RepeatedFragment::shuffle`](`crate::RepeatedFragment::shuffle`).
	pub fn shuffle(&mut self, path: &str, new_indices: &[Option<usize>]) -> Result<usize> {
		let target = self.store.keypath(path);
		self.fragment.shuffle(&target, new_indices, &self.root)
	}

	/// Splices the sequence at `path` and queues the matching reorder.
	/// Returns how many sections were shuffled, which is zero if there's no sequence at `path`.
	///
	/// # Errors
	///
	/// As [`shuffle`](`View::shuffle`). The store is modified either way.
	pub fn splice(&mut self, path: &str, start: usize, delete_count: usize, values: Vec<Value>) -> Result<usize> {
		match self.store.splice(path, start, delete_count, values) {
			Some(new_indices) => self.shuffle(path, &new_indices),
			None => Ok(0),
		}
	}

	/// Rearranges the sequence at `path` (see [`Store::reorder`]) and queues the matching reorder.
	/// Returns how many sections were shuffled, which is zero if `path` or `order` is unsuitable.
	///
	/// # Errors
	///
	/// As [`shuffle`](`View::shuffle`). The store is modified either way.
	pub fn reorder(&mut self, path: &str, order: &[usize]) -> Result<usize> {
		match self.store.reorder(path, order) {
			Some(new_indices) => self.shuffle(path, &new_indices),
			None => Ok(0),
		}
	}

	/// Unbinds the view and removes its content from the host tree.
	#[instrument(skip(self, host))]
	pub fn teardown(mut self, host: &mut D) {
		self.fragment.unbind();
		self.fragment.unrender(host, true);
	}

	#[must_use]
	pub fn find(&self, selector: &str) -> Option<D::Node> {
		self.fragment.find(selector)
	}

	#[must_use]
	pub fn find_all(&self, selector: &str) -> Vec<D::Node> {
		let mut found = Vec::new();
		self.fragment.find_all(selector, &mut found);
		found
	}

	#[must_use]
	pub fn find_component(&self, name: &str) -> Option<D::Node> {
		self.fragment.find_component(name)
	}

	#[must_use]
	pub fn find_all_components(&self, name: &str) -> Vec<D::Node> {
		let mut found = Vec::new();
		self.fragment.find_all_components(name, &mut found);
		found
	}

	/// The view's content as HTML, from its bound state. Works whether or not the view is rendered.
	#[must_use]
	pub fn to_html(&self) -> String {
		let mut html = String::new();
		self.fragment.write_html(&mut html, true);
		html
	}

	#[must_use]
	pub fn store(&self) -> &Store {
		&self.store
	}

	#[must_use]
	pub fn fragment(&self) -> &Fragment<D> {
		&self.fragment
	}

	/// Whether a reorder was queued since the last [`update`](`View::update`).
	#[must_use]
	pub fn is_dirty(&self) -> bool {
		self.root.dirty.get()
	}
}
