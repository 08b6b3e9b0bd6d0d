use super::{Fragment, ItemOptions, RenderItem};
use crate::{
	error::Result,
	host::{Anchor, Batch, Dom, Owner},
	html::escape_into,
	scope::Scopes,
	store::Keypath,
	template::TemplateNode,
	unit::RenderUnit,
};

/// An element with static attributes and templated content.
///
/// Elements whose name contains a hyphen (custom elements) count as components for
/// [`find_component`](`crate::RepeatedFragment::find_component`) queries.
#[derive(Debug)]
pub struct Element<D: Dom> {
	tag: String,
	attributes: Vec<(String, String)>,
	children: Fragment<D>,
	node: Option<D::Node>,
}

impl<D: Dom> Element<D> {
	pub(super) fn new(template: &TemplateNode, options: &ItemOptions) -> Result<Self> {
		Ok(Self {
			tag: template.element.clone().unwrap_or_default(),
			attributes: template.attributes.iter().map(|(name, value)| (name.clone(), value.clone())).collect(),
			children: Fragment::new(&template.fragment, &options.nested())?,
			node: None,
		})
	}

	#[must_use]
	pub fn tag(&self) -> &str {
		&self.tag
	}

	#[must_use]
	pub fn children(&self) -> &Fragment<D> {
		&self.children
	}

	fn matches(&self, selector: &str) -> bool {
		self.tag.eq_ignore_ascii_case(selector)
	}

	fn is_component(&self, name: &str) -> bool {
		self.tag.contains('-') && self.matches(name)
	}
}

impl<D: Dom> RenderItem<D> for Element<D> {
	fn bind(&mut self, model: &Keypath) {
		self.children.bind(model.clone());
	}

	fn rebind(&mut self, model: &Keypath, scopes: &Scopes) {
		self.children.rebind(model.clone(), scopes.clone());
	}

	fn render(&mut self, host: &mut D) -> Batch<D::Node> {
		let element = host.create_element(&self.tag);
		for (name, value) in &self.attributes {
			host.set_attribute(&element, name, value);
		}
		let content = self.children.render(host);
		host.insert_before(&element, content, None);
		self.node = Some(element.clone());
		Batch::of(element)
	}

	fn detach(&mut self, host: &mut D) -> Batch<D::Node> {
		match &self.node {
			Some(node) => {
				host.remove(node);
				Batch::of(node.clone())
			}
			None => Batch::new(),
		}
	}

	fn unbind(&mut self) {
		self.children.unbind();
	}

	fn unrender(&mut self, host: &mut D, destroy: bool) {
		if let Some(node) = self.node.take() {
			if destroy {
				host.remove(&node)
			}
		}
		// Removing the element already took care of its content.
		self.children.unrender(host, false);
	}

	fn update(&mut self, host: &mut D, owner: &dyn Owner<D::Node>) {
		let anchor = Anchor::child(owner, self.node.clone(), None);
		self.children.update(host, &anchor);
	}

	fn first_node(&self) -> Option<D::Node> {
		self.node.clone()
	}

	fn write_html(&self, out: &mut String, escape: bool) {
		out.push('<');
		out.push_str(&self.tag);
		for (name, value) in &self.attributes {
			out.push(' ');
			out.push_str(name);
			out.push_str("=\"");
			escape_into(out, value);
			out.push('"');
		}
		out.push('>');
		self.children.write_html(out, escape);
		out.push_str("</");
		out.push_str(&self.tag);
		out.push('>');
	}

	fn find(&self, selector: &str) -> Option<D::Node> {
		match &self.node {
			Some(node) if self.matches(selector) => Some(node.clone()),
			_ => self.children.find(selector),
		}
	}

	fn find_all(&self, selector: &str, found: &mut Vec<D::Node>) {
		if let Some(node) = self.node.as_ref().filter(|_| self.matches(selector)) {
			found.push(node.clone());
		}
		self.children.find_all(selector, found);
	}

	fn find_component(&self, name: &str) -> Option<D::Node> {
		match &self.node {
			Some(node) if self.is_component(name) => Some(node.clone()),
			_ => self.children.find_component(name),
		}
	}

	fn find_all_components(&self, name: &str, found: &mut Vec<D::Node>) {
		if let Some(node) = self.node.as_ref().filter(|_| self.is_component(name)) {
			found.push(node.clone());
		}
		self.children.find_all_components(name, found);
	}

	fn shuffle(&mut self, target: &Keypath, new_indices: &[Option<usize>], owner: &dyn Owner<D::Node>) -> Result<usize> {
		let anchor = Anchor::child(owner, self.node.clone(), None);
		self.children.shuffle(target, new_indices, &anchor)
	}
}
