//! Pre-parsed templates, in the compact JSON notation used by template compilers:
//!
//! ```json
//! [{"t": 7, "e": "ul", "f": [{"t": 4, "r": "items", "i": "i", "f": [{"t": 7, "e": "li", "f": [{"t": 2, "r": "."}]}]}]}]
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Item type tags.
pub mod types {
	pub const INTERPOLATOR: u32 = 2;
	pub const SECTION: u32 = 4;
	pub const ELEMENT: u32 = 7;
	pub const PARTIAL: u32 = 8;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Template {
	/// Literal text.
	Text(String),
	Node(TemplateNode),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateNode {
	/// The item type tag, see [`types`].
	#[serde(rename = "t")]
	pub kind: u32,
	/// Element name.
	#[serde(rename = "e", default, skip_serializing_if = "Option::is_none")]
	pub element: Option<String>,
	/// Interpolated or iterated reference, or partial name.
	#[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
	pub reference: Option<String>,
	/// Section aliases: `"index"` or `"key,index"`.
	#[serde(rename = "i", default, skip_serializing_if = "Option::is_none")]
	pub aliases: Option<String>,
	/// Static element attributes.
	#[serde(rename = "a", default, skip_serializing_if = "BTreeMap::is_empty")]
	pub attributes: BTreeMap<String, String>,
	/// Child content.
	#[serde(rename = "f", default, skip_serializing_if = "Vec::is_empty")]
	pub fragment: Vec<Template>,
}

impl Template {
	/// Deserializes a template fragment (a JSON array of template items).
	///
	/// # Errors
	///
	/// Iff `json` isn't a valid template fragment. Unknown item types are only detected once items are created.
	pub fn from_json(json: &str) -> Result<Vec<Self>> {
		Ok(serde_json::from_str(json)?)
	}

	#[must_use]
	pub fn text(text: &str) -> Self {
		Self::Text(text.to_owned())
	}

	#[must_use]
	pub fn interpolator(reference: &str) -> Self {
		Self::Node(TemplateNode {
			kind: types::INTERPOLATOR,
			reference: Some(reference.to_owned()),
			..TemplateNode::default()
		})
	}

	#[must_use]
	pub fn element(tag: &str, attributes: &[(&str, &str)], fragment: Vec<Self>) -> Self {
		Self::Node(TemplateNode {
			kind: types::ELEMENT,
			element: Some(tag.to_owned()),
			attributes: attributes.iter().map(|&(name, value)| (name.to_owned(), value.to_owned())).collect(),
			fragment,
			..TemplateNode::default()
		})
	}

	/// `aliases` uses the template notation, see [`Aliases::parse`](`crate::Aliases::parse`).
	#[must_use]
	pub fn section(reference: &str, aliases: Option<&str>, fragment: Vec<Self>) -> Self {
		Self::Node(TemplateNode {
			kind: types::SECTION,
			reference: Some(reference.to_owned()),
			aliases: aliases.map(str::to_owned),
			fragment,
			..TemplateNode::default()
		})
	}

	#[must_use]
	pub fn partial(name: &str) -> Self {
		Self::Node(TemplateNode {
			kind: types::PARTIAL,
			reference: Some(name.to_owned()),
			..TemplateNode::default()
		})
	}
}
