use repeat_dom::{
	document::Stats,
	items::{create_item, ItemOptions, Partials},
	template::TemplateNode,
	Dom, Document, Error, Host, Store, Template, View,
};
use serde_json::json;
use std::rc::Rc;

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

fn list_template(reference: &str, aliases: Option<&str>, item: Vec<Template>) -> Vec<Template> {
	vec![Template::element("ul", &[], vec![Template::section(reference, aliases, vec![Template::element("li", &[], item)])])]
}

fn mount(templates: &[Template], data: serde_json::Value) -> (Document, View<Document>) {
	init_tracing();
	let mut document = Document::new();
	let root = document.root();
	let mut view = View::new(templates, Store::new(data)).unwrap();
	view.render(&mut document, root);
	(document, view)
}

fn html(document: &Document) -> String {
	document.inner_html(document.root())
}

#[test]
fn index_aliases() {
	let templates = list_template("fruit", Some("i"), vec![Template::interpolator("i"), Template::text(": "), Template::interpolator(".")]);
	let (document, view) = mount(&templates, json!({ "fruit": ["apple", "banana"] }));
	assert_eq!(html(&document), "<ul><li>0: apple</li><li>1: banana</li></ul>");
	assert_eq!(view.to_html(), html(&document));
}

#[test]
fn templates_from_json() {
	let templates = Template::from_json(r#"[{"t": 7, "e": "p", "a": {"class": "greeting"}, "f": ["Hello, ", {"t": 2, "r": "name"}, "!"]}]"#).unwrap();
	let (document, _view) = mount(&templates, json!({ "name": "World" }));
	assert_eq!(html(&document), r#"<p class="greeting">Hello, World!</p>"#);

	assert!(matches!(Template::from_json("[{"), Err(Error::Json(_))));
}

#[test]
fn keyed_sections_rebind_moved_units() {
	let templates = list_template(
		"people",
		Some("k,i"),
		vec![Template::interpolator("i"), Template::text(":"), Template::interpolator("k"), Template::text(":"), Template::interpolator("age")],
	);
	let (mut document, mut view) = mount(&templates, json!({ "people": { "ann": { "age": 3 }, "bob": { "age": 5 } } }));
	assert_eq!(html(&document), "<ul><li>0:ann:3</li><li>1:bob:5</li></ul>");
	let bob = view.find_all("li")[1];

	view.store().remove("people.ann");
	view.update(&mut document);
	assert_eq!(html(&document), "<ul><li>0:bob:5</li></ul>");
	assert_eq!(view.find_all("li"), [bob]);

	view.store().set("people.cy", json!({ "age": 7 }));
	view.update(&mut document);
	assert_eq!(html(&document), "<ul><li>0:bob:5</li><li>1:cy:7</li></ul>");
}

#[test]
fn a_lone_alias_names_mapping_keys() {
	let templates = list_template("people", Some("k"), vec![Template::interpolator("k"), Template::text(";")]);
	let (mut document, mut view) = mount(&templates, json!({ "people": { "ann": 1, "bob": 2 } }));
	assert_eq!(html(&document), "<ul><li>ann;</li><li>bob;</li></ul>");

	view.store().remove("people.ann");
	view.update(&mut document);
	assert_eq!(html(&document), "<ul><li>bob;</li></ul>");
}

#[test]
fn splice_keeps_surviving_nodes() {
	let templates = list_template("list", None, vec![Template::interpolator(".")]);
	let (mut document, mut view) = mount(&templates, json!({ "list": ["a", "b", "c"] }));
	let before = view.find_all("li");

	assert_eq!(view.splice("list", 1, 1, vec![json!("x"), json!("y")]).unwrap(), 1);
	assert!(view.is_dirty());
	assert_eq!(html(&document), "<ul><li>a</li><li>b</li><li>c</li></ul>");

	view.update(&mut document);
	assert!(!view.is_dirty());
	assert_eq!(html(&document), "<ul><li>a</li><li>x</li><li>y</li><li>c</li></ul>");
	let after = view.find_all("li");
	assert_eq!(after[0], before[0]);
	assert_eq!(after[3], before[2]);
	assert!(!after.contains(&before[1]));
}

#[test]
fn reorder_moves_nodes() {
	let templates = list_template("list", Some("i"), vec![Template::interpolator("i"), Template::interpolator(".")]);
	let (mut document, mut view) = mount(&templates, json!({ "list": ["a", "b", "c"] }));
	let before = view.find_all("li");

	assert_eq!(view.reorder("list", &[2, 0, 1]).unwrap(), 1);
	view.update(&mut document);
	assert_eq!(html(&document), "<ul><li>0c</li><li>1a</li><li>2b</li></ul>");
	assert_eq!(view.find_all("li"), [before[2], before[0], before[1]]);
	// One element and two text nodes per entry, plus the list itself. Nothing new after the reorder.
	assert_eq!(document.stats().created, 1 + 3 * 3);
}

#[test]
fn shuffles_reach_nested_sections() {
	let templates = vec![Template::element(
		"table",
		&[],
		vec![Template::section(
			"rows",
			None,
			vec![Template::element("tr", &[], vec![Template::section("cells", None, vec![Template::element("td", &[], vec![Template::interpolator(".")])])])],
		)],
	)];
	let (mut document, mut view) = mount(&templates, json!({ "rows": [{ "cells": [1, 2] }, { "cells": [3] }] }));

	assert_eq!(view.reorder("rows.0.cells", &[1, 0]).unwrap(), 1);
	assert_eq!(view.reorder("rows.1.cells", &[0]).unwrap(), 1);
	assert_eq!(view.reorder("nowhere", &[0]).unwrap(), 0);
	view.update(&mut document);
	assert_eq!(html(&document), "<table><tr><td>2</td><td>1</td></tr><tr><td>3</td></tr></table>");
}

#[test]
fn second_shuffle_before_update_fails() {
	let templates = list_template("list", None, vec![Template::interpolator(".")]);
	let (mut document, mut view) = mount(&templates, json!({ "list": ["a", "b"] }));

	view.shuffle("list", &[Some(1), Some(0)]).unwrap();
	assert!(matches!(view.shuffle("list", &[Some(0), Some(1)]), Err(Error::AlreadyShuffled)));

	view.store().set("list", json!(["b", "a"]));
	view.update(&mut document);
	assert_eq!(html(&document), "<ul><li>b</li><li>a</li></ul>");
}

#[test]
fn render_before_an_anchor() {
	init_tracing();
	let mut document = Document::new();
	let root = document.root();
	let footer = document.create_element("footer");
	document.insert_before(&root, repeat_dom::Batch::of(footer), None);

	let templates = vec![Template::section("list", None, vec![Template::element("p", &[], vec![Template::interpolator(".")])])];
	let mut view = View::new(&templates, Store::new(json!({ "list": [1] }))).unwrap();
	view.render_before(&mut document, root, Some(footer));
	assert_eq!(html(&document), "<p>1</p><footer></footer>");

	view.store().push("list", [json!(2)]);
	view.update(&mut document);
	assert_eq!(html(&document), "<p>1</p><p>2</p><footer></footer>");
}

#[test]
fn text_is_only_rewritten_when_it_changes() {
	let templates = list_template("list", None, vec![Template::interpolator(".")]);
	let (mut document, mut view) = mount(&templates, json!({ "list": ["a", "b"] }));
	document.reset_stats();

	view.update(&mut document);
	assert_eq!(document.stats(), Stats::default());

	view.store().set("list.1", json!("c"));
	view.update(&mut document);
	assert_eq!(document.stats().text_updates, 1);
	assert_eq!(html(&document), "<ul><li>a</li><li>c</li></ul>");
}

#[test]
fn partials() {
	init_tracing();
	let mut partials = Partials::new();
	partials.insert("item".to_owned(), vec![Template::element("li", &[], vec![Template::interpolator(".")])].into());
	let templates = vec![Template::section("list", None, vec![Template::partial("item"), Template::partial("missing")])];

	let view = View::<Document>::with_partials(&templates, partials, Store::new(json!({ "list": ["a", "b"] }))).unwrap();
	assert_eq!(view.to_html(), "<li>a</li><li>b</li>");
}

#[test]
fn recursive_partials_stop_at_the_depth_limit() {
	init_tracing();
	let mut partials = Partials::new();
	partials.insert("loop".to_owned(), vec![Template::element("b", &[], vec![Template::partial("loop")])].into());

	let view = View::<Document>::with_partials(&[Template::partial("loop")], partials, Store::default()).unwrap();
	assert_eq!(view.to_html().matches("<b>").count(), 128);
}

#[test]
fn queries() {
	let templates = vec![Template::element(
		"div",
		&[],
		vec![
			Template::section("list", None, vec![Template::element("my-item", &[], vec![Template::interpolator(".")])]),
			Template::element("span", &[], vec![]),
		],
	)];
	let (document, view) = mount(&templates, json!({ "list": [1, 2] }));

	let span = view.find("span").unwrap();
	assert_eq!(document.outer_html(span), "<span></span>");
	assert_eq!(view.find("SPAN"), Some(span));
	assert_eq!(view.find("nope"), None);
	assert_eq!(view.find_all("my-item").len(), 2);
	assert_eq!(view.find_component("my-item"), view.find("my-item"));
	assert_eq!(view.find_all_components("my-item").len(), 2);
	assert_eq!(view.find_component("span"), None);
}

#[test]
fn text_is_escaped() {
	let templates = vec![Template::element("p", &[("title", "\"quoted\"")], vec![Template::interpolator("v")])];
	let (document, view) = mount(&templates, json!({ "v": "<b>&" }));
	assert_eq!(html(&document), "<p title=\"&quot;quoted&quot;\">&lt;b&gt;&amp;</p>");
	assert_eq!(view.to_html(), html(&document));
	assert_eq!(document.text_content(document.root()), "<b>&");
}

#[test]
fn teardown_removes_everything() {
	let templates = list_template("list", None, vec![Template::interpolator(".")]);
	let (mut document, view) = mount(&templates, json!({ "list": ["a"] }));
	view.teardown(&mut document);
	assert_eq!(html(&document), "");
}

#[test]
fn factory_errors() {
	init_tracing();
	let unknown = Template::Node(TemplateNode {
		kind: 99,
		..TemplateNode::default()
	});
	assert!(matches!(create_item::<Document>(&unknown, &ItemOptions::default()), Err(Error::UnrecognizedItemType(99))));
	assert_eq!(Error::UnrecognizedItemType(99).to_string(), "Unrecognised item type 99");

	let nameless = Template::Node(TemplateNode {
		kind: repeat_dom::template::types::ELEMENT,
		..TemplateNode::default()
	});
	assert!(matches!(
		create_item::<Document>(&nameless, &ItemOptions::default()),
		Err(Error::MissingField { item: "Element", field: "e" })
	));

	// Section bodies are checked up front.
	let section = Template::section("list", None, vec![unknown]);
	assert!(matches!(View::<Document>::new(&[section], Store::default()), Err(Error::UnrecognizedItemType(99))));

	let mut partials = Partials::new();
	partials.insert("broken".to_owned(), Rc::from(vec![nameless]));
	assert!(matches!(
		View::<Document>::with_partials(&[], partials, Store::default()),
		Err(Error::MissingField { .. })
	));
}
