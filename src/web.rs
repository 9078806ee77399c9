//! The browser backend: [`web_sys::Element`]s behind stable [`WebNode`] handles.

use crate::{
	classify::STYLE,
	dom::{Dom, LoadedAttribute, PropertyValue},
	load::load_element_attributes,
	Error, StyleMap, Value,
};
use js_sys::{Array, Object, Reflect};
use tracing::{trace, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CssStyleDeclaration, Element, HtmlElement, SvgElement};

/// Stable handle of an element adopted by a [`WebDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WebNode(u32);

/// Live browser elements, mutated through their DOM APIs.
///
/// [***JavaScript***](https://developer.mozilla.org/en-US/docs/Web/JavaScript) values are compared by identity (`===`),
/// so re-declaring the same function or object doesn't touch the element.
#[derive(Debug, Default)]
pub struct WebDom {
	elements: Vec<Option<Element>>,
}

impl PropertyValue for JsValue {
	fn is_same(&self, other: &Self) -> bool {
		self == other
	}
}

/// Converts an arbitrary [***JavaScript***](https://developer.mozilla.org/en-US/docs/Web/JavaScript) value declared as `name`,
/// classifying it the way `typeof` would.
///
/// `null` is an [`Object`](`Value::Object`), like `typeof null === "object"`.
/// Under `style`, `null` clears the inline style and any other non-function object is read as [`Style`](`Value::Style`) mapping
/// from its own enumerable properties.
#[must_use]
pub fn value_from_js(name: &str, value: &JsValue) -> Value<'static, JsValue> {
	if value.is_undefined() {
		Value::Undefined
	} else if let Some(bool) = value.as_bool() {
		Value::Bool(bool)
	} else if let Some(number) = value.as_f64() {
		Value::Number(number)
	} else if let Some(string) = value.as_string() {
		Value::from(string)
	} else if value.is_function() {
		Value::Function(value.clone())
	} else if name == STYLE && value.is_null() {
		Value::from("")
	} else if name == STYLE && value.is_object() {
		Value::Style(style_from_js(value.unchecked_ref()))
	} else {
		Value::Object(value.clone())
	}
}

/// Own enumerable `[key, value]` pairs. `null` and `undefined` values clear their property.
fn style_from_js(object: &Object) -> StyleMap<'static> {
	Object::entries(object)
		.iter()
		.filter_map(|entry| {
			let entry: Array = entry.unchecked_into();
			let key = entry.get(0).as_string()?;
			let value = entry.get(1);
			let value = if value.is_null() || value.is_undefined() {
				String::new()
			} else if let Some(value) = value_from_js(&key, &value).to_attribute_string() {
				value.into_owned()
			} else {
				warn!(property = %key, "Skipped style property that isn't a string, number or boolean.");
				return None;
			};
			Some((key, value))
		})
		.collect::<Vec<_>>()
		.into()
}

impl WebDom {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the handle for `element`, issuing a new one if it wasn't adopted before.
	///
	/// Elements are compared by identity in a linear scan over all adopted ones,
	/// so adopt each element once and keep its handle rather than re-adopting it per render pass.
	#[allow(clippy::cast_possible_truncation)]
	pub fn adopt(&mut self, element: Element) -> WebNode {
		let js: &JsValue = element.as_ref();
		if let Some(i) = self
			.elements
			.iter()
			.position(|slot| slot.as_ref().map_or(false, |adopted| AsRef::<JsValue>::as_ref(adopted) == js))
		{
			return WebNode(i as u32);
		}

		let node = WebNode(self.elements.len() as u32);
		self.elements.push(Some(element));
		node
	}

	#[must_use]
	pub fn element(&self, node: WebNode) -> Option<&Element> {
		self.elements.get(node.0 as usize)?.as_ref()
	}

	/// Gives up the handle. The element itself is left untouched.
	pub fn release(&mut self, node: WebNode) -> Option<Element> {
		self.elements.get_mut(node.0 as usize)?.take()
	}

	fn get(&self, node: WebNode, operation: &'static str, name: &str) -> Result<&Element, Error> {
		self.element(node).ok_or_else(|| Error::dom(operation, name, format!("unknown or released node {:?}", node)))
	}
}

fn js_error<'a>(operation: &'static str, name: &'a str) -> impl FnOnce(JsValue) -> Error + 'a {
	move |error| Error::dom(operation, name, format!("{:?}", error))
}

fn inline_style(element: &Element, operation: &'static str, name: &str) -> Result<CssStyleDeclaration, Error> {
	if let Some(element) = element.dyn_ref::<HtmlElement>() {
		Ok(element.style())
	} else if let Some(element) = element.dyn_ref::<SvgElement>() {
		Ok(element.style())
	} else {
		warn!("Element {:?} has no inline style.", element);
		Err(Error::dom(operation, name, "element has no inline style"))
	}
}

impl Dom for WebDom {
	type Node = WebNode;
	type Object = JsValue;

	fn set_attribute(&mut self, node: WebNode, namespace: Option<&str>, name: &str, value: &str) -> Result<(), Error> {
		let element = self.get(node, "setAttribute", name)?;
		let result = match namespace {
			Some(namespace) => element.set_attribute_ns(Some(namespace), name, value),
			None => element.set_attribute(name, value),
		};
		result.map_err(js_error("setAttribute", name))?;
		trace!(?node, attribute = name, "Set attribute.");
		Ok(())
	}

	fn remove_attribute(&mut self, node: WebNode, namespace: Option<&str>, name: &str) -> Result<(), Error> {
		let element = self.get(node, "removeAttribute", name)?;
		let result = match namespace {
			Some(namespace) => element.remove_attribute_ns(Some(namespace), name.split_once(':').map_or(name, |(_, local)| local)),
			None => element.remove_attribute(name),
		};
		result.map_err(js_error("removeAttribute", name))?;
		trace!(?node, attribute = name, "Removed attribute.");
		Ok(())
	}

	fn set_property(&mut self, node: WebNode, name: &str, value: &JsValue) -> Result<(), Error> {
		let element = self.get(node, "Reflect.set", name)?;
		if Reflect::set(element, &JsValue::from_str(name), value).map_err(js_error("Reflect.set", name))? {
			Ok(())
		} else {
			Err(Error::dom("Reflect.set", name, "property is read-only"))
		}
	}

	fn remove_property(&mut self, node: WebNode, name: &str) -> Result<(), Error> {
		let element = self.get(node, "Reflect.deleteProperty", name)?;
		let key = JsValue::from_str(name);
		let object: &Object = element.as_ref();
		if Object::has_own(object, &key) {
			Reflect::delete_property(object, &key).map_err(js_error("Reflect.deleteProperty", name))?;
		} else {
			// Accessors on the prototype, like `value`, can only be reset.
			Reflect::set(element, &key, &JsValue::UNDEFINED).map_err(js_error("Reflect.set", name))?;
		}
		Ok(())
	}

	fn set_style_property(&mut self, node: WebNode, property: &str, value: &str) -> Result<(), Error> {
		let style = inline_style(self.get(node, "style.setProperty", property)?, "style.setProperty", property)?;
		if value.is_empty() {
			style.remove_property(property).map(drop).map_err(js_error("style.removeProperty", property))
		} else {
			style.set_property(property, value).map_err(js_error("style.setProperty", property))
		}
	}

	fn set_style_text(&mut self, node: WebNode, text: &str) -> Result<(), Error> {
		let style = inline_style(self.get(node, "style.cssText", "style")?, "style.cssText", "style")?;
		style.set_css_text(text);
		Ok(())
	}

	fn attributes(&self, node: WebNode) -> Result<Vec<LoadedAttribute>, Error> {
		Ok(load_element_attributes(self.get(node, "attributes", "")?))
	}
}
