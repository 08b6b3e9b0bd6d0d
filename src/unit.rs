use crate::{
	host::{Batch, Host, Owner},
	model::{Key, Model},
	scope::Scopes,
};

/// Shorthand for the host node type of a [`RenderUnit`].
pub type NodeOf<U> = <<U as RenderUnit>::Host as Host>::Node;

/// Everything a repetition site knows about a unit before it's bound.
#[derive(Debug, Clone)]
pub struct UnitSeed {
	pub key: Key,
	pub index: usize,
	pub scopes: Scopes,
	/// Always `true` for units created by a [`RepeatedFragment`](`crate::RepeatedFragment`).
	pub is_iteration: bool,
}

/// One child render subtree of a repetition site.
///
/// # Lifecycle
///
/// [`create`](`RenderUnit::create`) → [`bind`](`RenderUnit::bind`) → ([`render`](`RenderUnit::render`) →
/// ([`update`](`RenderUnit::update`) | [`rebind`](`RenderUnit::rebind`) | [`detach`](`RenderUnit::detach`))*)? →
/// [`unbind`](`RenderUnit::unbind`) → [`unrender`](`RenderUnit::unrender`)
pub trait RenderUnit: Sized {
	type Model: Model;
	type Host: Host;
	/// Shared by all units of one repetition site.
	type Template;

	fn create(template: &Self::Template, seed: UnitSeed) -> Self;

	fn bind(&mut self, model: Self::Model);

	/// Moves the unit to another entry without recreating it.
	fn rebind(&mut self, model: Self::Model, scopes: Scopes);

	/// Creates the unit's host nodes, returned detached and in order.
	fn render(&mut self, host: &mut Self::Host) -> Batch<NodeOf<Self>>;

	/// Removes the unit's top-level host nodes from their parent and returns them, in order.
	fn detach(&mut self, host: &mut Self::Host) -> Batch<NodeOf<Self>>;

	fn unbind(&mut self);

	/// Forgets the unit's host nodes. With `destroy`, they are also removed from the host tree.
	fn unrender(&mut self, host: &mut Self::Host, destroy: bool);

	/// Refreshes the unit from its model. `owner` locates the unit in the host tree.
	fn update(&mut self, host: &mut Self::Host, owner: &dyn Owner<NodeOf<Self>>);

	fn find(&self, selector: &str) -> Option<NodeOf<Self>>;
	fn find_all(&self, selector: &str, found: &mut Vec<NodeOf<Self>>);
	fn find_component(&self, name: &str) -> Option<NodeOf<Self>>;
	fn find_all_components(&self, name: &str, found: &mut Vec<NodeOf<Self>>);

	fn first_node(&self) -> Option<NodeOf<Self>>;

	/// Appends the unit's HTML to `out`, with text content escaped if `escape` is set.
	fn write_html(&self, out: &mut String, escape: bool);
}
