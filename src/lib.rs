#![doc(html_root_url = "https://docs.rs/repeat-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Keeps one bound render unit per entry of a collection in sync with that collection.
//!
//! The core is [`RepeatedFragment`], which is generic over its [`RenderUnit`]s and their [`Model`].
//! [`View`] puts it to work with the bundled [`items`], a JSON [`Store`] and any [`Dom`],
//! for example the in-memory [`Document`].

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod document;
pub mod error;
pub mod host;
mod html;
pub mod items;
pub mod model;
pub mod repeated;
pub mod scope;
pub mod shuffle;
pub mod store;
pub mod template;
pub mod unit;
pub mod view;
#[cfg(feature = "web")]
pub mod web;

pub use document::Document;
pub use error::{Error, Result};
pub use host::{Batch, Dom, Host, Owner};
pub use model::{Key, Model, Shape};
pub use repeated::{CollectionMode, Iteration, RepeatedFragment};
pub use scope::{Aliases, Scope, Scopes};
pub use store::{Keypath, Store};
pub use template::Template;
pub use unit::{RenderUnit, UnitSeed};
pub use view::View;
