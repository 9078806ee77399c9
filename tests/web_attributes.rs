#![cfg(target_arch = "wasm32")]

use std::sync::Once;

use js_sys::{Function, Object, Reflect};
use patchwork_dom::{
	dom::XLINK_NAMESPACE,
	web::{value_from_js, WebDom, WebNode},
	ElementStack, Reconciler, Value,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, Element, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

type V<'v> = Value<'v, JsValue>;

struct Fixture {
	dom: WebDom,
	reconciler: Reconciler<WebDom>,
	element: Element,
	node: WebNode,
	tag: &'static str,
}

impl Fixture {
	fn new(tag: &'static str) -> Self {
		static LOGGING: Once = Once::new();
		LOGGING.call_once(tracing_wasm::set_as_global_default);

		let document = window().unwrap().document().unwrap();
		let element = if tag == "svg" {
			document.create_element_ns(Some("http://www.w3.org/2000/svg"), tag).unwrap()
		} else {
			document.create_element(tag).unwrap()
		};
		document.body().unwrap().append_child(&element).unwrap();

		let mut dom = WebDom::new();
		let node = dom.adopt(element.clone());
		Self {
			dom,
			reconciler: Reconciler::new(),
			element,
			node,
			tag,
		}
	}

	fn render(&mut self, declarations: Vec<(&str, V<'_>)>) {
		let mut cursor = ElementStack::new();
		cursor.open(self.node, self.tag);
		self.reconciler.reconcile(&mut self.dom, &cursor, declarations).unwrap();
	}

	fn style(&self, property: &str) -> String {
		self.element.unchecked_ref::<HtmlElement>().style().get_property_value(property).unwrap()
	}
}

impl Drop for Fixture {
	fn drop(&mut self) {
		self.element.remove();
	}
}

#[wasm_bindgen_test]
fn conditional_attributes() {
	let mut f = Fixture::new("div");
	f.render(vec![("data-expanded", "hello".into()), ("hidden", false.into()), ("id", V::Undefined)]);
	assert_eq!(f.element.get_attribute("data-expanded").as_deref(), Some("hello"));
	assert_eq!(f.element.get_attribute("hidden").as_deref(), Some("false"));
	assert!(!f.element.has_attribute("id"));

	f.render(vec![("data-bar", "foo".into())]);
	assert_eq!(f.element.get_attribute("data-bar").as_deref(), Some("foo"));
	assert!(!f.element.has_attribute("data-expanded"));
	assert!(!f.element.has_attribute("hidden"));
}

#[wasm_bindgen_test]
fn functions_and_objects_are_properties() {
	let function = Function::new_no_args("");
	let object = Object::new();
	let mut f = Fixture::new("div");
	f.render(vec![
		("fn", value_from_js("fn", &function)),
		("obj", value_from_js("obj", &object)),
	]);
	assert!(!f.element.has_attribute("fn"));
	assert!(!f.element.has_attribute("obj"));
	assert_eq!(Reflect::get(&f.element, &"fn".into()).unwrap(), JsValue::from(function));
	assert_eq!(Reflect::get(&f.element, &"obj".into()).unwrap(), JsValue::from(object));

	f.render(vec![]);
	assert!(Reflect::get(&f.element, &"obj".into()).unwrap().is_undefined());
}

#[wasm_bindgen_test]
fn style_objects() {
	let mut f = Fixture::new("div");
	f.render(vec![("style", V::style(&[("color", "white"), ("backgroundColor", "red")]))]);
	assert_eq!(f.style("color"), "white");
	assert_eq!(f.style("background-color"), "red");

	f.render(vec![("style", V::style(&[("backgroundColor", "blue")]))]);
	assert_eq!(f.style("color"), "");
	assert_eq!(f.style("background-color"), "blue");
}

fn js_style(pairs: &[(&str, &str)]) -> Object {
	let style = Object::new();
	for (key, value) in pairs {
		Reflect::set(&style, &(*key).into(), &(*value).into()).unwrap();
	}
	style
}

#[wasm_bindgen_test]
fn style_objects_from_js() {
	let mut f = Fixture::new("div");
	let style = js_style(&[("color", "white"), ("backgroundColor", "red")]);
	f.render(vec![("style", value_from_js("style", &style))]);
	assert!(matches!(value_from_js("style", &style), Value::Style(_)));
	assert_eq!(f.style("color"), "white");
	assert_eq!(f.style("background-color"), "red");

	let style = js_style(&[("backgroundColor", "blue")]);
	f.render(vec![("style", value_from_js("style", &style))]);
	assert_eq!(f.style("color"), "");
	assert_eq!(f.style("background-color"), "blue");

	f.render(vec![("style", value_from_js("style", &JsValue::NULL))]);
	assert_eq!(f.style("background-color"), "");
}

#[wasm_bindgen_test]
fn objects_elsewhere_stay_properties() {
	let object = js_style(&[("color", "white")]);
	assert!(matches!(value_from_js("data", &object), Value::Object(_)));
}

#[wasm_bindgen_test]
fn style_strings() {
	let mut f = Fixture::new("div");
	f.render(vec![("style", "color: white; background-color: red;".into())]);
	assert_eq!(f.style("color"), "white");
	assert_eq!(f.style("background-color"), "red");

	f.render(vec![]);
	assert_eq!(f.style("color"), "");
}

#[wasm_bindgen_test]
fn svg_class() {
	let mut f = Fixture::new("svg");
	f.render(vec![("class", "foo".into())]);
	assert_eq!(f.element.get_attribute("class").as_deref(), Some("foo"));
}

#[wasm_bindgen_test]
fn svg_xlink() {
	let mut f = Fixture::new("svg");
	f.render(vec![("xlink:href", "#star".into())]);
	assert_eq!(f.element.get_attribute_ns(Some(XLINK_NAMESPACE), "href").as_deref(), Some("#star"));

	f.render(vec![]);
	assert!(!f.element.has_attribute_ns(Some(XLINK_NAMESPACE), "href"));
}

#[wasm_bindgen_test]
fn load_server_rendered_attributes() {
	let mut f = Fixture::new("div");
	f.element.set_attribute("class", "ssr").unwrap();
	f.element.set_attribute("id", "server").unwrap();
	f.reconciler.load(&f.dom, f.node).unwrap();

	f.render(vec![("id", "client".into())]);
	assert_eq!(f.element.get_attribute("id").as_deref(), Some("client"));
	assert!(!f.element.has_attribute("class"));
}

#[wasm_bindgen_test]
fn adopting_twice_gives_same_handle() {
	let f = Fixture::new("div");
	let mut dom = WebDom::new();
	let node = dom.adopt(f.element.clone());
	assert_eq!(dom.adopt(f.element.clone()), node);
	assert!(dom.release(node).is_some());
	assert!(dom.element(node).is_none());
}
