#![cfg(all(target_arch = "wasm32", feature = "web"))]

use repeat_dom::{web::WebDom, Store, Template, View};
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

static mut LOG_INITIALIZED: bool = false;

fn container() -> (WebDom, HtmlElement) {
	unsafe {
		if !LOG_INITIALIZED {
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}

	let dom = WebDom::from_window().unwrap();
	let container = dom.document().create_element("div").unwrap().dyn_into::<HtmlElement>().unwrap();
	dom.document().body().unwrap().append_child(&container).unwrap();
	(dom, container)
}

fn list() -> Vec<Template> {
	vec![Template::element("ul", &[], vec![Template::section("list", Some("i"), vec![Template::element("li", &[], vec![Template::interpolator("i"), Template::interpolator(".")])])])]
}

#[wasm_bindgen_test]
fn render_and_update() {
	let (mut dom, container) = container();
	let mut view = View::new(&list(), Store::new(json!({ "list": ["a", "b"] }))).unwrap();
	view.render(&mut dom, container.clone().into());
	assert_eq!(container.inner_html(), "<ul><li>0a</li><li>1b</li></ul>");

	view.store().push("list", [json!("c")]);
	view.update(&mut dom);
	assert_eq!(container.inner_html(), "<ul><li>0a</li><li>1b</li><li>2c</li></ul>");

	view.teardown(&mut dom);
	assert_eq!(container.inner_html(), "");
}

#[wasm_bindgen_test]
fn reorder_moves_elements() {
	let (mut dom, container) = container();
	let mut view = View::new(&list(), Store::new(json!({ "list": ["a", "b", "c"] }))).unwrap();
	view.render(&mut dom, container.clone().into());
	let first = view.find_all("li")[0].clone();

	view.reorder("list", &[1, 2, 0]).unwrap();
	view.update(&mut dom);
	assert_eq!(container.inner_html(), "<ul><li>0b</li><li>1c</li><li>2a</li></ul>");
	assert_eq!(view.find_all("li")[2], first);
}
