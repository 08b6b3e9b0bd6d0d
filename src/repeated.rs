//! The collection binder behind a repetition site.

use crate::{
	error::{Error, Result},
	host::{Anchor, Batch, Host, Owner},
	model::{Key, Model, Shape},
	scope::{Aliases, Scopes},
	unit::{NodeOf, RenderUnit, UnitSeed},
};
use core::{
	fmt::{self, Debug, Formatter},
	mem,
};
use hashbrown::{HashMap, HashSet};
use std::rc::Rc;
use tracing::{debug, error, instrument, trace, warn};

/// One bound unit of a [`RepeatedFragment`], with the entry it's bound to.
#[derive(Debug)]
pub struct Iteration<U> {
	unit: U,
	key: Key,
	index: usize,
	dirty: bool,
}

impl<U> Iteration<U> {
	#[must_use]
	pub fn unit(&self) -> &U {
		&self.unit
	}

	pub fn unit_mut(&mut self) -> &mut U {
		&mut self.unit
	}

	#[must_use]
	pub fn key(&self) -> &Key {
		&self.key
	}

	/// The unit's position. Equal to its index in [`RepeatedFragment::iterations`] unless a reorder is pending.
	#[must_use]
	pub fn index(&self) -> usize {
		self.index
	}

	/// Whether a pending reorder moves this unit.
	#[must_use]
	pub fn is_dirty(&self) -> bool {
		self.dirty
	}
}

/// What kind of collection a [`RepeatedFragment`] is currently bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionMode {
	Empty,
	Array,
	Keyed,
}

#[derive(Debug)]
enum Mode {
	Empty,
	Array,
	Keyed(HashMap<Rc<str>, usize>),
}

impl Mode {
	fn kind(&self) -> CollectionMode {
		match self {
			Self::Empty => CollectionMode::Empty,
			Self::Array => CollectionMode::Array,
			Self::Keyed(_) => CollectionMode::Keyed,
		}
	}

	fn describe(&self) -> &'static str {
		match self {
			Self::Empty => "non-collection value",
			Self::Array => "sequence",
			Self::Keyed(_) => "keyed mapping",
		}
	}
}

#[derive(Debug)]
enum Reorder<U> {
	Idle,
	/// Survivors are already in [`RepeatedFragment::iterations`], at their new positions.
	Pending {
		new_indices: Vec<Option<usize>>,
		/// In old position order.
		removed: Vec<Iteration<U>>,
	},
}

/// Keeps one bound [`RenderUnit`] per entry of a collection.
///
/// The binder doesn't hold on to its owner. Operations that need to locate the binder
/// in the host tree take an [`Owner`] instead, which answers for the position the binder's output occupies.
pub struct RepeatedFragment<U: RenderUnit> {
	template: Rc<U::Template>,
	aliases: Aliases,
	scopes: Scopes,
	context: Option<U::Model>,
	iterations: Vec<Iteration<U>>,
	mode: Mode,
	reorder: Reorder<U>,
	/// Units replaced by a repeated [`bind`](`RepeatedFragment::bind`), still in the host tree.
	discarded: Vec<Iteration<U>>,
	rendered: bool,
}

impl<U: RenderUnit> Debug for RepeatedFragment<U> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("RepeatedFragment")
			.field("aliases", &self.aliases)
			.field("mode", &self.mode.kind())
			.field("units", &self.iterations.len())
			.field("reorder_pending", &self.is_reorder_pending())
			.field("rendered", &self.rendered)
			.finish_non_exhaustive()
	}
}

impl<U: RenderUnit> RepeatedFragment<U> {
	/// `scopes` are the alias scopes of the fragment containing the repetition site.
	#[must_use]
	pub fn new(template: Rc<U::Template>, aliases: Aliases, scopes: Scopes) -> Self {
		Self {
			template,
			aliases,
			scopes,
			context: None,
			iterations: Vec::new(),
			mode: Mode::Empty,
			reorder: Reorder::Idle,
			discarded: Vec::new(),
			rendered: false,
		}
	}

	/// Creates one unit per entry of `context`.
	///
	/// Units left over from an earlier binding are unbound here and destroyed by the next
	/// [`update`](`RepeatedFragment::update`) or [`unrender`](`RepeatedFragment::unrender`),
	/// which is also when a rendered binder renders the new units.
	#[instrument(skip(self, context))]
	pub fn bind(&mut self, context: U::Model) {
		if !self.iterations.is_empty() || self.is_reorder_pending() {
			debug!("Binding a repetition that still has {} unit(s). Discarding them.", self.iterations.len());
			self.unbind();
			let mut discarded = mem::take(&mut self.iterations);
			if let Reorder::Pending { removed, .. } = mem::replace(&mut self.reorder, Reorder::Idle) {
				discarded.extend(removed);
			}
			self.discarded.append(&mut discarded);
		}

		let shape = context.shape();
		let iterations = match &shape {
			// Iterating by index gives every hole of a sparse sequence its own unit.
			Shape::Sequence(len) => (0..*len).map(|index| self.create_iteration(&context, Key::Index(index), index)).collect(),
			Shape::Mapping(keys) => keys.iter().enumerate().map(|(index, key)| self.create_iteration(&context, Key::Name(key.clone()), index)).collect(),
			Shape::Other => Vec::new(),
		};
		self.iterations = iterations;
		self.mode = self.mode_for(&shape);
		self.context = Some(context);
		debug!(units = self.iterations.len(), mode = ?self.mode.kind(), "Bound repetition.");
	}

	fn create_iteration(&self, context: &U::Model, key: Key, index: usize) -> Iteration<U> {
		if cfg!(feature = "dangerous-logging") {
			trace!(%key, index, "Creating unit.");
		} else {
			trace!(index, "Creating unit.");
		}

		let scopes = self.aliases.scopes_for(&self.scopes, &key, index);
		let mut unit = U::create(
			&self.template,
			UnitSeed {
				key: key.clone(),
				index,
				scopes,
				is_iteration: true,
			},
		);
		unit.bind(context.join_key(&key));
		Iteration { unit, key, index, dirty: false }
	}

	fn mode_for(&self, shape: &Shape) -> Mode {
		match shape {
			Shape::Sequence(_) => Mode::Array,
			Shape::Mapping(_) => Mode::Keyed(
				self.iterations
					.iter()
					.filter_map(|iteration| match &iteration.key {
						Key::Name(name) => Some((name.clone(), iteration.index)),
						Key::Index(_) => None,
					})
					.collect(),
			),
			Shape::Other => Mode::Empty,
		}
	}

	/// Points every unit at the matching entry of `context`.
	///
	/// Membership changes are picked up by the next [`update`](`RepeatedFragment::update`).
	#[instrument(skip(self, context))]
	pub fn rebind(&mut self, context: U::Model) {
		for iteration in &mut self.iterations {
			let scopes = self.aliases.scopes_for(&self.scopes, &iteration.key, iteration.index);
			iteration.unit.rebind(context.join_key(&iteration.key), scopes);
		}
		self.context = Some(context);
	}

	/// Replaces the scopes the binder layers its aliases over.
	/// Takes effect for existing units on the next [`rebind`](`RepeatedFragment::rebind`).
	pub fn set_parent_scopes(&mut self, scopes: Scopes) {
		self.scopes = scopes;
	}

	#[instrument(skip(self, host))]
	pub fn render(&mut self, host: &mut U::Host) -> Batch<NodeOf<U>> {
		self.rendered = true;
		let mut batch = Batch::new();
		for iteration in &mut self.iterations {
			batch.append(iteration.unit.render(host));
		}
		batch
	}

	#[instrument(skip(self, host))]
	pub fn detach(&mut self, host: &mut U::Host) -> Batch<NodeOf<U>> {
		let mut batch = Batch::new();
		for iteration in &mut self.iterations {
			batch.append(iteration.unit.detach(host));
		}
		batch
	}

	#[instrument(skip(self))]
	pub fn unbind(&mut self) {
		for iteration in &mut self.iterations {
			iteration.unit.unbind();
		}
		if let Reorder::Pending { removed, .. } = &mut self.reorder {
			for iteration in removed {
				iteration.unit.unbind();
			}
		}
	}

	/// With `destroy`, the units' nodes are removed from the host tree.
	/// Otherwise they're left for the caller (usually a removed ancestor) to dispose of.
	///
	/// A pending reorder is dropped.
	#[instrument(skip(self, host))]
	pub fn unrender(&mut self, host: &mut U::Host, destroy: bool) {
		for iteration in &mut self.iterations {
			iteration.unit.unrender(host, destroy);
		}
		for mut iteration in self.discarded.drain(..) {
			iteration.unit.unrender(host, destroy);
		}
		if let Reorder::Pending { removed, .. } = mem::replace(&mut self.reorder, Reorder::Idle) {
			for mut iteration in removed {
				iteration.unit.unrender(host, destroy);
			}
			for (index, iteration) in self.iterations.iter_mut().enumerate() {
				iteration.key = Key::Index(index);
				iteration.index = index;
				iteration.dirty = false;
			}
		}
		self.rendered = false;
	}

	/// Reconciles the units with the bound collection's current contents.
	///
	/// Completes a pending [`shuffle`](`RepeatedFragment::shuffle`), if there is one.
	#[instrument(skip(self, host, owner))]
	pub fn update(&mut self, host: &mut U::Host, owner: &dyn Owner<NodeOf<U>>) {
		let context = match &self.context {
			Some(context) => context.clone(),
			None => return warn!("Updated an unbound repetition. Ignoring."),
		};

		if !self.discarded.is_empty() {
			self.replace_discarded(host, owner);
		}

		if matches!(self.reorder, Reorder::Pending { .. }) {
			return self.update_post_shuffle(host, owner, &context);
		}

		let shape = context.shape();
		let mut removed = Vec::new();
		let mut surviving_keys = HashSet::new();
		match (&shape, &self.mode) {
			(Shape::Sequence(len), Mode::Array) => {
				if self.iterations.len() > *len {
					removed = self.iterations.split_off(*len);
				}
			}
			(Shape::Mapping(keys), Mode::Keyed(_)) => {
				let present: HashSet<&str> = keys.iter().map(|key| &**key).collect();
				let mut i = self.iterations.len();
				while i > 0 {
					i -= 1;
					let surviving = match &self.iterations[i].key {
						Key::Name(name) if present.contains(&**name) => Some(name.clone()),
						_ => None,
					};
					match surviving {
						Some(name) => {
							surviving_keys.insert(name);
						}
						None => removed.push(self.iterations.remove(i)),
					}
				}

				for (index, iteration) in self.iterations.iter_mut().enumerate() {
					if iteration.index != index {
						iteration.index = index;
						let scopes = self.aliases.scopes_for(&self.scopes, &iteration.key, index);
						iteration.unit.rebind(context.join_key(&iteration.key), scopes);
					}
				}
			}
			(_, mode) => {
				if !self.iterations.is_empty() {
					debug!(from = mode.describe(), to = ?shape_kind(&shape), "Collection shape changed. Rebuilding all units.");
				}
				removed = mem::take(&mut self.iterations);
			}
		}

		if !removed.is_empty() {
			trace!("Removing {} unit(s).", removed.len());
		}
		for iteration in removed {
			destroy(iteration, host);
		}

		self.update_units(host, owner);

		let mut batch = Batch::new();
		match &shape {
			Shape::Sequence(len) => {
				for index in self.iterations.len()..*len {
					let mut iteration = self.create_iteration(&context, Key::Index(index), index);
					if self.rendered {
						batch.append(iteration.unit.render(host));
					}
					self.iterations.push(iteration);
				}
			}
			Shape::Mapping(keys) => {
				for key in keys {
					if !surviving_keys.contains(key) {
						let index = self.iterations.len();
						let mut iteration = self.create_iteration(&context, Key::Name(key.clone()), index);
						if self.rendered {
							batch.append(iteration.unit.render(host));
						}
						self.iterations.push(iteration);
					}
				}
			}
			Shape::Other => (),
		}
		self.mode = self.mode_for(&shape);

		flush(host, owner, batch, None);
	}

	fn replace_discarded(&mut self, host: &mut U::Host, owner: &dyn Owner<NodeOf<U>>) {
		trace!("Replacing {} discarded unit(s).", self.discarded.len());
		for iteration in mem::take(&mut self.discarded) {
			destroy(iteration, host);
		}
		if self.rendered {
			let mut batch = Batch::new();
			for iteration in &mut self.iterations {
				batch.append(iteration.unit.render(host));
			}
			flush(host, owner, batch, None);
		}
	}

	fn update_units(&mut self, host: &mut U::Host, owner: &dyn Owner<NodeOf<U>>) {
		for i in 0..self.iterations.len() {
			let (head, tail) = self.iterations.split_at_mut(i + 1);
			let next = tail.iter().find_map(|iteration| iteration.unit.first_node());
			let anchor = Anchor::sibling(owner, next);
			head[i].unit.update(host, &anchor);
		}
	}

	/// Queues a reorder: `new_indices[old_position]` is the unit's new position,
	/// or [`None`] if the unit is removed.
	///
	/// Units are moved to their new positions in [`iterations`](`RepeatedFragment::iterations`) immediately,
	/// but the host tree isn't touched until the next [`update`](`RepeatedFragment::update`).
	/// Only `owner` is notified, through [`Owner::bubble`].
	///
	/// # Errors
	///
	/// Iff a reorder is already pending or the binder isn't bound to a sequence.
	/// Also iff `new_indices` doesn't have one entry per unit, maps two units to the same position
	/// or targets a position past the end of the bound sequence as it is now.
	/// The binder is left unchanged in that case.
	#[instrument(skip(self, new_indices, owner))]
	pub fn shuffle(&mut self, new_indices: Vec<Option<usize>>, owner: &dyn Owner<NodeOf<U>>) -> Result<()> {
		if matches!(self.reorder, Reorder::Pending { .. }) {
			return Err(Error::AlreadyShuffled);
		}
		if !matches!(self.mode, Mode::Array) {
			return Err(Error::NotASequence { mode: self.mode.describe() });
		}
		if new_indices.len() != self.iterations.len() {
			return Err(Error::ShuffleLength {
				expected: self.iterations.len(),
				found: new_indices.len(),
			});
		}
		let len = match self.context.as_ref().map(Model::shape) {
			Some(Shape::Sequence(len)) => Some(len),
			Some(Shape::Mapping(_) | Shape::Other) | None => None,
		};
		let mut targets = HashSet::with_capacity(new_indices.len());
		for &new_index in new_indices.iter().flatten() {
			if let Some(len) = len.filter(|&len| new_index >= len) {
				return Err(Error::TargetOutOfRange { target: new_index, len });
			}
			if !targets.insert(new_index) {
				return Err(Error::DuplicateTarget(new_index));
			}
		}

		let previous = mem::take(&mut self.iterations);
		let mut removed = Vec::new();
		for (old_index, (mut iteration, new_index)) in previous.into_iter().zip(&new_indices).enumerate() {
			match *new_index {
				None => removed.push(iteration),
				Some(new_index) => {
					iteration.dirty = new_index != old_index;
					iteration.index = new_index;
					self.iterations.push(iteration);
				}
			}
		}
		self.iterations.sort_unstable_by_key(|iteration| iteration.index);

		debug!(
			removed = removed.len(),
			moved = self.iterations.iter().filter(|iteration| iteration.dirty).count(),
			"Shuffled repetition."
		);
		self.reorder = Reorder::Pending { new_indices, removed };
		owner.bubble();
		Ok(())
	}

	#[instrument(skip(self, host, owner, context))]
	fn update_post_shuffle(&mut self, host: &mut U::Host, owner: &dyn Owner<NodeOf<U>>, context: &U::Model) {
		let (new_indices, removed) = match mem::replace(&mut self.reorder, Reorder::Idle) {
			Reorder::Pending { new_indices, removed } => (new_indices, removed),
			Reorder::Idle => return,
		};

		let mut removed = removed.into_iter();
		for (old_index, new_index) in new_indices.iter().enumerate() {
			match *new_index {
				None => {
					if let Some(iteration) = removed.next() {
						trace!(old_index, "Destroying removed unit.");
						destroy(iteration, host);
					}
				}
				Some(new_index) => match self.iterations.binary_search_by_key(&new_index, |iteration| iteration.index) {
					Ok(position) => {
						let iteration = &mut self.iterations[position];
						iteration.key = Key::Index(new_index);
						let scopes = self.aliases.scopes_for(&self.scopes, &iteration.key, new_index);
						iteration.unit.rebind(context.join_key(&iteration.key), scopes);
					}
					Err(_) => error!(old_index, new_index, "repeat-dom bug: Shuffled unit went missing."),
				},
			}
		}

		let shape = context.shape();
		let len = match shape {
			Shape::Sequence(len) => len,
			Shape::Mapping(_) | Shape::Other => 0,
		};

		let mut survivors = mem::take(&mut self.iterations).into_iter().peekable();
		let mut iterations = Vec::with_capacity(len);
		let mut queued = Batch::new();
		for index in 0..len {
			match survivors.next_if(|iteration| iteration.index == index) {
				Some(mut iteration) => {
					if self.rendered {
						if iteration.dirty {
							queued.append(iteration.unit.detach(host));
						} else if !queued.is_empty() {
							if let Some(first_node) = iteration.unit.first_node() {
								flush(host, owner, queued.take(), Some(first_node));
							}
						}
					}
					iteration.dirty = false;
					iterations.push(iteration);
				}
				None => {
					let mut iteration = self.create_iteration(context, Key::Index(index), index);
					if self.rendered {
						queued.append(iteration.unit.render(host));
					}
					iterations.push(iteration);
				}
			}
		}
		for excess in survivors {
			trace!(index = excess.index, "Destroying unit past the end of the shuffled sequence.");
			destroy(excess, host);
		}
		self.iterations = iterations;
		flush(host, owner, queued, None);

		if let Shape::Sequence(_) = shape {
			self.update_units(host, owner);
		} else {
			debug!(to = ?shape_kind(&shape), "Collection stopped being a sequence during a shuffle. Rebuilding all units.");
			self.mode = Mode::Empty;
			self.update(host, owner);
		}
	}

	/// The first node after the unit at `index`, which is where that unit's content ends.
	#[must_use]
	pub fn find_next_node(&self, index: usize, owner: &dyn Owner<NodeOf<U>>) -> Option<NodeOf<U>> {
		self.iterations
			.get(index + 1..)
			.and_then(|following| following.iter().find_map(|iteration| iteration.unit.first_node()))
			.or_else(|| owner.find_next_node())
	}

	#[must_use]
	pub fn first_node(&self) -> Option<NodeOf<U>> {
		self.iterations.iter().find_map(|iteration| iteration.unit.first_node())
	}

	#[must_use]
	pub fn find(&self, selector: &str) -> Option<NodeOf<U>> {
		self.iterations.iter().find_map(|iteration| iteration.unit.find(selector))
	}

	pub fn find_all(&self, selector: &str, found: &mut Vec<NodeOf<U>>) {
		for iteration in &self.iterations {
			iteration.unit.find_all(selector, found);
		}
	}

	#[must_use]
	pub fn find_component(&self, name: &str) -> Option<NodeOf<U>> {
		self.iterations.iter().find_map(|iteration| iteration.unit.find_component(name))
	}

	pub fn find_all_components(&self, name: &str, found: &mut Vec<NodeOf<U>>) {
		for iteration in &self.iterations {
			iteration.unit.find_all_components(name, found);
		}
	}

	pub fn write_html(&self, out: &mut String, escape: bool) {
		for iteration in &self.iterations {
			iteration.unit.write_html(out, escape);
		}
	}

	#[must_use]
	pub fn stringify(&self, escape: bool) -> String {
		let mut out = String::new();
		self.write_html(&mut out, escape);
		out
	}

	#[must_use]
	pub fn iterations(&self) -> &[Iteration<U>] {
		&self.iterations
	}

	/// Access to the units themselves. Keys and positions stay under the binder's control.
	pub fn iterations_mut(&mut self) -> &mut [Iteration<U>] {
		&mut self.iterations
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.iterations.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.iterations.is_empty()
	}

	#[must_use]
	pub fn mode(&self) -> CollectionMode {
		self.mode.kind()
	}

	/// The position of the unit bound to `key`, in keyed mode.
	#[must_use]
	pub fn index_of_key(&self, key: &str) -> Option<usize> {
		match &self.mode {
			Mode::Keyed(index_by_key) => index_by_key.get(key).copied(),
			Mode::Empty | Mode::Array => None,
		}
	}

	#[must_use]
	pub fn is_reorder_pending(&self) -> bool {
		matches!(self.reorder, Reorder::Pending { .. })
	}

	#[must_use]
	pub fn is_rendered(&self) -> bool {
		self.rendered
	}

	#[must_use]
	pub fn context(&self) -> Option<&U::Model> {
		self.context.as_ref()
	}

	#[must_use]
	pub fn aliases(&self) -> &Aliases {
		&self.aliases
	}
}

fn destroy<U: RenderUnit>(mut iteration: Iteration<U>, host: &mut U::Host) {
	iteration.unit.unbind();
	iteration.unit.unrender(host, true);
}

/// Inserts `batch` where the binder's output belongs: before `anchor`, or before whatever follows the binder.
fn flush<H: Host>(host: &mut H, owner: &dyn Owner<H::Node>, batch: Batch<H::Node>, anchor: Option<H::Node>) {
	if batch.is_empty() {
		return;
	}

	match owner.find_parent_node() {
		Some(parent) => {
			let anchor = anchor.or_else(|| owner.find_next_node());
			trace!(nodes = batch.len(), ?anchor, "Inserting rendered nodes.");
			host.insert_before(&parent, batch, anchor.as_ref());
		}
		None => error!("Rendered repetition has no parent node. Dropping {} rendered node(s).", batch.len()),
	}
}

fn shape_kind(shape: &Shape) -> &'static str {
	match shape {
		Shape::Sequence(_) => "sequence",
		Shape::Mapping(_) => "keyed mapping",
		Shape::Other => "non-collection value",
	}
}
