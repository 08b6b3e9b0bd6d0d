use super::{Fragment, ItemOptions, RenderItem};
use crate::{
	error::Result,
	host::{Batch, Dom, Owner},
	scope::Scopes,
	store::Keypath,
	template::TemplateNode,
	unit::RenderUnit,
};
use tracing::warn;

/// Inlines a named template from the [`Partials`](`super::Partials`) registry.
#[derive(Debug)]
pub struct Partial<D: Dom> {
	name: String,
	content: Fragment<D>,
}

impl<D: Dom> Partial<D> {
	pub(super) fn new(template: &TemplateNode, options: &ItemOptions) -> Result<Self> {
		let name = template.reference.clone().unwrap_or_default();
		let content = match options.partials.get(&name) {
			Some(templates) => Fragment::new(templates, &options.nested())?,
			None => {
				warn!(partial = %name, "Could not find partial. Rendering nothing in its place.");
				Fragment::new(&[], options)?
			}
		};
		Ok(Self { name, content })
	}

	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}
}

impl<D: Dom> RenderItem<D> for Partial<D> {
	fn bind(&mut self, model: &Keypath) {
		self.content.bind(model.clone());
	}

	fn rebind(&mut self, model: &Keypath, scopes: &Scopes) {
		self.content.rebind(model.clone(), scopes.clone());
	}

	fn render(&mut self, host: &mut D) -> Batch<D::Node> {
		self.content.render(host)
	}

	fn detach(&mut self, host: &mut D) -> Batch<D::Node> {
		self.content.detach(host)
	}

	fn unbind(&mut self) {
		self.content.unbind();
	}

	fn unrender(&mut self, host: &mut D, destroy: bool) {
		self.content.unrender(host, destroy);
	}

	fn update(&mut self, host: &mut D, owner: &dyn Owner<D::Node>) {
		self.content.update(host, owner);
	}

	fn first_node(&self) -> Option<D::Node> {
		self.content.first_node()
	}

	fn write_html(&self, out: &mut String, escape: bool) {
		self.content.write_html(out, escape)
	}

	fn find(&self, selector: &str) -> Option<D::Node> {
		self.content.find(selector)
	}

	fn find_all(&self, selector: &str, found: &mut Vec<D::Node>) {
		self.content.find_all(selector, found);
	}

	fn find_component(&self, name: &str) -> Option<D::Node> {
		self.content.find_component(name)
	}

	fn find_all_components(&self, name: &str, found: &mut Vec<D::Node>) {
		self.content.find_all_components(name, found);
	}

	fn shuffle(&mut self, target: &Keypath, new_indices: &[Option<usize>], owner: &dyn Owner<D::Node>) -> Result<usize> {
		self.content.shuffle(target, new_indices, owner)
	}
}
