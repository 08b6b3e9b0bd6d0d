use super::{create_item, Item, ItemOptions, Partials};
use crate::{
	error::Result,
	host::{Anchor, Batch, Dom, Owner},
	scope::Scopes,
	store::Keypath,
	template::Template,
	unit::{RenderUnit, UnitSeed},
};
use std::rc::Rc;
use tracing::{error, trace_span};

/// What every unit of one section is created from.
#[derive(Debug, Clone)]
pub struct FragmentTemplate {
	pub body: Rc<[Template]>,
	pub partials: Rc<Partials>,
	/// Remaining nesting depth for the units' content.
	pub depth_limit: usize,
}

/// An ordered list of render items sharing one context.
///
/// Fragments are the content of elements and partials, and the units of sections.
#[derive(Debug)]
pub struct Fragment<D: Dom> {
	items: Vec<Item<D>>,
	model: Option<Keypath>,
	scopes: Scopes,
	is_iteration: bool,
}

impl<D: Dom> Fragment<D> {
	/// # Errors
	///
	/// Iff an item can't be created, see [`create_item`].
	pub fn new(templates: &[Template], options: &ItemOptions) -> Result<Self> {
		let items = if options.depth_limit == 0 {
			error!("Depth limit reached. Not instantiating further content.");
			Vec::new()
		} else {
			templates.iter().map(|template| create_item(template, options)).collect::<Result<_>>()?
		};
		Ok(Self {
			items,
			model: None,
			scopes: options.scopes.clone(),
			is_iteration: false,
		})
	}

	#[must_use]
	pub fn items(&self) -> &[Item<D>] {
		&self.items
	}

	/// Whether this fragment is a unit of a section.
	#[must_use]
	pub fn is_iteration(&self) -> bool {
		self.is_iteration
	}

	/// The context the fragment is bound to, if any.
	#[must_use]
	pub fn model(&self) -> Option<&Keypath> {
		self.model.as_ref()
	}

	#[must_use]
	pub fn scopes(&self) -> &Scopes {
		&self.scopes
	}

	/// Forwards a reorder of `target` to every section bound to it. Returns how many there were.
	///
	/// # Errors
	///
	/// On the first section that rejects the reorder.
	pub fn shuffle(&mut self, target: &Keypath, new_indices: &[Option<usize>], owner: &dyn Owner<D::Node>) -> Result<usize> {
		let mut count = 0;
		for i in 0..self.items.len() {
			let (head, tail) = self.items.split_at_mut(i + 1);
			let next = tail.iter().find_map(Item::first_node);
			count += head[i].shuffle(target, new_indices, &Anchor::sibling(owner, next))?;
		}
		Ok(count)
	}
}

impl<D: Dom> RenderUnit for Fragment<D> {
	type Model = Keypath;
	type Host = D;
	type Template = FragmentTemplate;

	fn create(template: &FragmentTemplate, seed: UnitSeed) -> Self {
		let options = ItemOptions {
			scopes: seed.scopes,
			partials: template.partials.clone(),
			depth_limit: template.depth_limit,
		};

		let items = if options.depth_limit == 0 {
			error!("Depth limit reached. Not instantiating further content.");
			Vec::new()
		} else {
			let _span = trace_span!("Creating unit content", index = seed.index).entered();
			template
				.body
				.iter()
				.filter_map(|template| match create_item(template, &options) {
					Ok(item) => Some(item),
					Err(error) => {
						error!(%error, "Could not create item. Skipping it.");
						None
					}
				})
				.collect()
		};

		Self {
			items,
			model: None,
			scopes: options.scopes,
			is_iteration: seed.is_iteration,
		}
	}

	fn bind(&mut self, model: Keypath) {
		for item in &mut self.items {
			item.bind(&model);
		}
		self.model = Some(model);
	}

	fn rebind(&mut self, model: Keypath, scopes: Scopes) {
		for item in &mut self.items {
			item.rebind(&model, &scopes);
		}
		self.model = Some(model);
		self.scopes = scopes;
	}

	fn render(&mut self, host: &mut D) -> Batch<D::Node> {
		let mut batch = Batch::new();
		for item in &mut self.items {
			batch.append(item.render(host));
		}
		batch
	}

	fn detach(&mut self, host: &mut D) -> Batch<D::Node> {
		let mut batch = Batch::new();
		for item in &mut self.items {
			batch.append(item.detach(host));
		}
		batch
	}

	fn unbind(&mut self) {
		for item in &mut self.items {
			item.unbind();
		}
		self.model = None;
	}

	fn unrender(&mut self, host: &mut D, destroy: bool) {
		for item in &mut self.items {
			item.unrender(host, destroy);
		}
	}

	fn update(&mut self, host: &mut D, owner: &dyn Owner<D::Node>) {
		for i in 0..self.items.len() {
			let (head, tail) = self.items.split_at_mut(i + 1);
			let next = tail.iter().find_map(Item::first_node);
			head[i].update(host, &Anchor::sibling(owner, next));
		}
	}

	fn find(&self, selector: &str) -> Option<D::Node> {
		self.items.iter().find_map(|item| item.find(selector))
	}

	fn find_all(&self, selector: &str, found: &mut Vec<D::Node>) {
		for item in &self.items {
			item.find_all(selector, found);
		}
	}

	fn find_component(&self, name: &str) -> Option<D::Node> {
		self.items.iter().find_map(|item| item.find_component(name))
	}

	fn find_all_components(&self, name: &str, found: &mut Vec<D::Node>) {
		for item in &self.items {
			item.find_all_components(name, found);
		}
	}

	fn first_node(&self) -> Option<D::Node> {
		self.items.iter().find_map(Item::first_node)
	}

	fn write_html(&self, out: &mut String, escape: bool) {
		for item in &self.items {
			item.write_html(out, escape);
		}
	}
}
