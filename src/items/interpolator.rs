use super::{resolve, RenderItem, Source};
use crate::{
	host::{Batch, Dom, Owner},
	html::push_text,
	items::ItemOptions,
	scope::Scopes,
	store::Keypath,
	template::TemplateNode,
};
use tracing::trace;

/// A text node showing the current value of a reference.
#[derive(Debug)]
pub struct Interpolator<D: Dom> {
	reference: String,
	scopes: Scopes,
	source: Option<Source>,
	value: String,
	node: Option<D::Node>,
}

impl<D: Dom> Interpolator<D> {
	pub(super) fn new(template: &TemplateNode, options: &ItemOptions) -> Self {
		Self {
			reference: template.reference.clone().unwrap_or_default(),
			scopes: options.scopes.clone(),
			source: None,
			value: String::new(),
			node: None,
		}
	}

	#[must_use]
	pub fn reference(&self) -> &str {
		&self.reference
	}

	/// The text as of the last bind or update.
	#[must_use]
	pub fn value(&self) -> &str {
		&self.value
	}

	fn current(&self) -> Option<String> {
		match self.source.as_ref()? {
			Source::Alias(value) => Some(value.clone()),
			Source::Model(model) => Some(model.text()),
		}
	}
}

impl<D: Dom> RenderItem<D> for Interpolator<D> {
	fn bind(&mut self, model: &Keypath) {
		self.source = Some(resolve(&self.reference, model, &self.scopes));
		if let Some(value) = self.current() {
			self.value = value;
		}
	}

	/// The displayed value is left alone, so that the next update sees the difference.
	fn rebind(&mut self, model: &Keypath, scopes: &Scopes) {
		self.scopes = scopes.clone();
		self.source = Some(resolve(&self.reference, model, &self.scopes));
	}

	fn render(&mut self, host: &mut D) -> Batch<D::Node> {
		let node = host.create_text(&self.value);
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

	fn unbind(&mut self) {
		self.source = None;
	}

	fn unrender(&mut self, host: &mut D, destroy: bool) {
		if let Some(node) = self.node.take() {
			if destroy {
				host.remove(&node)
			}
		}
	}

	fn update(&mut self, host: &mut D, _owner: &dyn Owner<D::Node>) {
		let value = match self.current() {
			Some(value) if value != self.value => value,
			_ => return,
		};

		if cfg!(feature = "dangerous-logging") {
			trace!(reference = %self.reference, from = %self.value, to = %value, "Updating interpolator.");
		} else {
			trace!(reference = %self.reference, "Updating interpolator.");
		}
		if let Some(node) = &self.node {
			host.set_text(node, &value);
		}
		self.value = value;
	}

	fn first_node(&self) -> Option<D::Node> {
		self.node.clone()
	}

	fn write_html(&self, out: &mut String, escape: bool) {
		push_text(out, &self.value, escape)
	}
}
