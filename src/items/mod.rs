//! The bundled render items and the factory that picks between them.

mod element;
mod fragment;
mod interpolator;
mod partial;
mod section;
mod text;

pub use element::Element;
pub use fragment::{Fragment, FragmentTemplate};
pub use interpolator::Interpolator;
pub use partial::Partial;
pub use section::Section;
pub use text::Text;

use crate::{
	error::{Error, Result},
	host::{Batch, Dom, Owner},
	scope::Scopes,
	store::Keypath,
	template::{types, Template, TemplateNode},
};
use hashbrown::HashMap;
use std::rc::Rc;

/// Named template fragments that [`Partial`] items inline.
pub type Partials = HashMap<String, Rc<[Template]>>;

/// Nesting depth after which fragments stop instantiating content, which guards against recursive partials.
pub const DEFAULT_DEPTH_LIMIT: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
	Interpolator,
	Section,
	Element,
	Partial,
}

impl ItemType {
	/// The dispatch table from template tags to item types.
	#[must_use]
	pub fn from_tag(tag: u32) -> Option<Self> {
		match tag {
			types::INTERPOLATOR => Some(Self::Interpolator),
			types::SECTION => Some(Self::Section),
			types::ELEMENT => Some(Self::Element),
			types::PARTIAL => Some(Self::Partial),
			_ => None,
		}
	}

	#[must_use]
	pub fn name(self) -> &'static str {
		match self {
			Self::Interpolator => "Interpolator",
			Self::Section => "Section",
			Self::Element => "Element",
			Self::Partial => "Partial",
		}
	}

	/// Checks `node`'s tag and the fields its item type requires.
	fn check(node: &TemplateNode) -> Result<Self> {
		let item_type = Self::from_tag(node.kind).ok_or(Error::UnrecognizedItemType(node.kind))?;
		let missing = match item_type {
			Self::Element if node.element.is_none() => Some("e"),
			Self::Interpolator | Self::Section | Self::Partial if node.reference.is_none() => Some("r"),
			_ => None,
		};
		match missing {
			Some(field) => Err(Error::MissingField { item: item_type.name(), field }),
			None => Ok(item_type),
		}
	}
}

/// Construction context shared by the items of one fragment.
#[derive(Debug, Clone)]
pub struct ItemOptions {
	pub scopes: Scopes,
	pub partials: Rc<Partials>,
	pub depth_limit: usize,
}

impl Default for ItemOptions {
	fn default() -> Self {
		Self {
			scopes: Scopes::default(),
			partials: Rc::default(),
			depth_limit: DEFAULT_DEPTH_LIMIT,
		}
	}
}

impl ItemOptions {
	/// The options for content nested one level deeper.
	#[must_use]
	pub fn nested(&self) -> Self {
		Self {
			depth_limit: self.depth_limit.saturating_sub(1),
			..self.clone()
		}
	}
}

/// Creates the render item for `template`.
///
/// # Errors
///
/// Iff `template` (or, for sections, any part of its body) has an unrecognised item type or lacks a required field.
pub fn create_item<D: Dom>(template: &Template, options: &ItemOptions) -> Result<Item<D>> {
	let node = match template {
		Template::Text(text) => return Ok(Item::Text(Text::new(text))),
		Template::Node(node) => node,
	};

	Ok(match ItemType::check(node)? {
		ItemType::Interpolator => Item::Interpolator(Interpolator::new(node, options)),
		ItemType::Section => Item::Section(Section::new(node, options)?),
		ItemType::Element => Item::Element(Element::new(node, options)?),
		ItemType::Partial => Item::Partial(Partial::new(node, options)?),
	})
}

/// Checks a whole template tree without creating anything.
///
/// # Errors
///
/// On the first item [`create_item`] would reject.
pub fn validate(templates: &[Template]) -> Result<()> {
	for template in templates {
		if let Template::Node(node) = template {
			ItemType::check(node)?;
			validate(&node.fragment)?;
		}
	}
	Ok(())
}

/// One render item. The variant is chosen by [`create_item`].
#[derive(Debug)]
pub enum Item<D: Dom> {
	Text(Text<D>),
	Interpolator(Interpolator<D>),
	Element(Element<D>),
	Partial(Partial<D>),
	Section(Section<D>),
}

/// The operations every item variant supports. Structural ones default to "nothing here".
pub(crate) trait RenderItem<D: Dom> {
	fn bind(&mut self, model: &Keypath);
	fn rebind(&mut self, model: &Keypath, scopes: &Scopes);
	fn render(&mut self, host: &mut D) -> Batch<D::Node>;
	fn detach(&mut self, host: &mut D) -> Batch<D::Node>;
	fn unbind(&mut self);
	fn unrender(&mut self, host: &mut D, destroy: bool);
	fn update(&mut self, host: &mut D, owner: &dyn Owner<D::Node>);
	fn first_node(&self) -> Option<D::Node>;
	fn write_html(&self, out: &mut String, escape: bool);

	fn find(&self, _selector: &str) -> Option<D::Node> {
		None
	}

	fn find_all(&self, _selector: &str, _found: &mut Vec<D::Node>) {}

	fn find_component(&self, _name: &str) -> Option<D::Node> {
		None
	}

	fn find_all_components(&self, _name: &str, _found: &mut Vec<D::Node>) {}

	/// Forwards a reorder to the sections bound to `target`. Returns how many there were.
	fn shuffle(&mut self, _target: &Keypath, _new_indices: &[Option<usize>], _owner: &dyn Owner<D::Node>) -> Result<usize> {
		Ok(0)
	}
}

macro_rules! dispatch {
	($self:expr, $item:ident => $body:expr) => {
		match $self {
			Item::Text($item) => $body,
			Item::Interpolator($item) => $body,
			Item::Element($item) => $body,
			Item::Partial($item) => $body,
			Item::Section($item) => $body,
		}
	};
}

impl<D: Dom> Item<D> {
	/// [`None`] for literal text.
	#[must_use]
	pub fn item_type(&self) -> Option<ItemType> {
		match self {
			Self::Text(_) => None,
			Self::Interpolator(_) => Some(ItemType::Interpolator),
			Self::Element(_) => Some(ItemType::Element),
			Self::Partial(_) => Some(ItemType::Partial),
			Self::Section(_) => Some(ItemType::Section),
		}
	}

	pub fn bind(&mut self, model: &Keypath) {
		dispatch!(self, item => item.bind(model))
	}

	pub fn rebind(&mut self, model: &Keypath, scopes: &Scopes) {
		dispatch!(self, item => item.rebind(model, scopes))
	}

	pub fn render(&mut self, host: &mut D) -> Batch<D::Node> {
		dispatch!(self, item => item.render(host))
	}

	pub fn detach(&mut self, host: &mut D) -> Batch<D::Node> {
		dispatch!(self, item => item.detach(host))
	}

	pub fn unbind(&mut self) {
		dispatch!(self, item => item.unbind())
	}

	pub fn unrender(&mut self, host: &mut D, destroy: bool) {
		dispatch!(self, item => item.unrender(host, destroy))
	}

	pub fn update(&mut self, host: &mut D, owner: &dyn Owner<D::Node>) {
		dispatch!(self, item => item.update(host, owner))
	}

	#[must_use]
	pub fn first_node(&self) -> Option<D::Node> {
		dispatch!(self, item => item.first_node())
	}

	#[must_use]
	pub fn find(&self, selector: &str) -> Option<D::Node> {
		dispatch!(self, item => item.find(selector))
	}

	pub fn find_all(&self, selector: &str, found: &mut Vec<D::Node>) {
		dispatch!(self, item => item.find_all(selector, found))
	}

	#[must_use]
	pub fn find_component(&self, name: &str) -> Option<D::Node> {
		dispatch!(self, item => item.find_component(name))
	}

	pub fn find_all_components(&self, name: &str, found: &mut Vec<D::Node>) {
		dispatch!(self, item => item.find_all_components(name, found))
	}

	pub fn write_html(&self, out: &mut String, escape: bool) {
		dispatch!(self, item => item.write_html(out, escape))
	}

	/// # Errors
	///
	/// If a section bound to `target` rejects the reorder, see [`RepeatedFragment::shuffle`](`crate::RepeatedFragment::shuffle`).
	pub fn shuffle(&mut self, target: &Keypath, new_indices: &[Option<usize>], owner: &dyn Owner<D::Node>) -> Result<usize> {
		dispatch!(self, item => item.shuffle(target, new_indices, owner))
	}
}

/// What a reference resolves to in a given context.
#[derive(Debug, Clone)]
enum Source {
	/// An alias from the surrounding repetition sites.
	Alias(String),
	Model(Keypath),
}

/// `.` and `this` refer to the context itself, alias names to their value, anything else is a keypath relative to the context.
fn resolve(reference: &str, model: &Keypath, scopes: &Scopes) -> Source {
	if let Some(value) = scopes.resolve(reference) {
		return Source::Alias(value.to_string());
	}
	match reference {
		"." | "this" => Source::Model(model.clone()),
		path => Source::Model(model.join(path.trim_start_matches("./"))),
	}
}

fn resolve_model(reference: &str, model: &Keypath) -> Keypath {
	match reference {
		"." | "this" => model.clone(),
		path => model.join(path.trim_start_matches("./")),
	}
}
