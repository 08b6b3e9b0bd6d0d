use super::RenderItem;
use crate::{
	host::{Batch, Dom, Owner},
	html::push_text,
	scope::Scopes,
	store::Keypath,
};

/// Literal text.
#[derive(Debug)]
pub struct Text<D: Dom> {
	text: String,
	node: Option<D::Node>,
}

impl<D: Dom> Text<D> {
	#[must_use]
	pub fn new(text: &str) -> Self {
		Self {
			text: text.to_owned(),
			node: None,
		}
	}

	#[must_use]
	pub fn text(&self) -> &str {
		&self.text
	}
}

impl<D: Dom> RenderItem<D> for Text<D> {
	fn bind(&mut self, _model: &Keypath) {}

	fn rebind(&mut self, _model: &Keypath, _scopes: &Scopes) {}

	fn render(&mut self, host: &mut D) -> Batch<D::Node> {
		let node = host.create_text(&self.text);
		self.node = Some(node.clone());
		Batch::of(node)
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

	fn unbind(&mut self) {}

	fn unrender(&mut self, host: &mut D, destroy: bool) {
		if let Some(node) = self.node.take() {
			if destroy {
				host.remove(&node)
			}
		}
	}

	fn update(&mut self, _host: &mut D, _owner: &dyn Owner<D::Node>) {}

	fn first_node(&self) -> Option<D::Node> {
		self.node.clone()
	}

	fn write_html(&self, out: &mut String, escape: bool) {
		push_text(out, &self.text, escape)
	}
}
