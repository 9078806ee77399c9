//! Reading attributes back from browser elements.

use crate::dom::LoadedAttribute;
use web_sys::{Attr, Element, NamedNodeMap};

#[must_use]
pub fn load_element_attributes(element: &Element) -> Vec<LoadedAttribute> {
	load_attributes(&element.attributes())
}

#[must_use]
pub fn load_attributes(attributes: &NamedNodeMap) -> Vec<LoadedAttribute> {
	(0..attributes.length())
		.filter_map(|i| attributes.item(i))
		.map(|attribute| load_attribute(&attribute))
		.collect()
}

#[must_use]
pub fn load_attribute(attribute: &Attr) -> LoadedAttribute {
	LoadedAttribute {
		namespace: attribute.namespace_uri(),
		name: attribute.name(),
		value: attribute.value(),
	}
}
