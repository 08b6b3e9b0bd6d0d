use super::{resolve_model, validate, Fragment, FragmentTemplate, ItemOptions, RenderItem};
use crate::{
	error::Result,
	host::{Anchor, Batch, Dom, Owner},
	repeated::RepeatedFragment,
	scope::{Aliases, Scopes},
	store::Keypath,
	template::TemplateNode,
};
use std::rc::Rc;
use tracing::trace;

/// Repeats its body once per entry of the referenced collection.
///
/// The body is validated up front, so units can always be created from it later.
#[derive(Debug)]
pub struct Section<D: Dom> {
	reference: String,
	binder: RepeatedFragment<Fragment<D>>,
}

impl<D: Dom> Section<D> {
	pub(super) fn new(template: &TemplateNode, options: &ItemOptions) -> Result<Self> {
		validate(&template.fragment)?;

		let aliases = template.aliases.as_deref().map_or_else(Aliases::none, Aliases::parse);
		let body = Rc::new(FragmentTemplate {
			body: template.fragment.clone().into(),
			partials: options.partials.clone(),
			depth_limit: options.nested().depth_limit,
		});
		Ok(Self {
			reference: template.reference.clone().unwrap_or_default(),
			binder: RepeatedFragment::new(body, aliases, options.scopes.clone()),
		})
	}

	#[must_use]
	pub fn reference(&self) -> &str {
		&self.reference
	}

	#[must_use]
	pub fn binder(&self) -> &RepeatedFragment<Fragment<D>> {
		&self.binder
	}

	pub fn binder_mut(&mut self) -> &mut RepeatedFragment<Fragment<D>> {
		&mut self.binder
	}
}

impl<D: Dom> RenderItem<D> for Section<D> {
	fn bind(&mut self, model: &Keypath) {
		self.binder.bind(resolve_model(&self.reference, model));
	}

	fn rebind(&mut self, model: &Keypath, scopes: &Scopes) {
		self.binder.set_parent_scopes(scopes.clone());
		self.binder.rebind(resolve_model(&self.reference, model));
	}

	fn render(&mut self, host: &mut D) -> Batch<D::Node> {
		self.binder.render(host)
	}

	fn detach(&mut self, host: &mut D) -> Batch<D::Node> {
		self.binder.detach(host)
	}

	fn unbind(&mut self) {
		self.binder.unbind();
	}

	fn unrender(&mut self, host: &mut D, destroy: bool) {
		self.binder.unrender(host, destroy);
	}

	fn update(&mut self, host: &mut D, owner: &dyn Owner<D::Node>) {
		self.binder.update(host, owner);
	}

	fn first_node(&self) -> Option<D::Node> {
		self.binder.first_node()
	}

	fn write_html(&self, out: &mut String, escape: bool) {
		self.binder.write_html(out, escape);
	}

	fn find(&self, selector: &str) -> Option<D::Node> {
		self.binder.find(selector)
	}

	fn find_all(&self, selector: &str, found: &mut Vec<D::Node>) {
		self.binder.find_all(selector, found);
	}

	fn find_component(&self, name: &str) -> Option<D::Node> {
		self.binder.find_component(name)
	}

	fn find_all_components(&self, name: &str, found: &mut Vec<D::Node>) {
		self.binder.find_all_components(name, found);
	}

	fn shuffle(&mut self, target: &Keypath, new_indices: &[Option<usize>], owner: &dyn Owner<D::Node>) -> Result<usize> {
		if self.binder.context() == Some(target) {
			trace!(reference = %self.reference, "Shuffling section.");
			self.binder.shuffle(new_indices.to_vec(), owner)?;
			return Ok(1);
		}

		// Nested sections bound to `target` are only reachable through the units.
		let mut count = 0;
		for i in 0..self.binder.len() {
			let next = self.binder.find_next_node(i, owner);
			let anchor = Anchor::sibling(owner, next);
			count += self.binder.iterations_mut()[i].unit_mut().shuffle(target, new_indices, &anchor)?;
		}
		Ok(count)
	}
}
