use crate::Error;
use core::{fmt::Debug, hash::Hash};

/// Opaque host objects stored as node properties.
pub trait PropertyValue: Clone {
	/// Identity comparison, used to skip writes of the very same object.
	fn is_same(&self, other: &Self) -> bool;
}

/// An attribute read back from a live element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedAttribute {
	pub namespace: Option<String>,
	/// The qualified name, i.e. including any prefix.
	pub name: String,
	pub value: String,
}

/// The mutations the reconciler performs on live elements.
///
/// Elements are addressed through stable handles.
/// Implementations must make each call's effect visible before returning.
pub trait Dom {
	type Node: Copy + Eq + Hash + Debug;
	type Object: PropertyValue;

	/// Sets the attribute `name` to `value`, in `namespace` if one is given.
	///
	/// # Errors
	///
	/// Iff the live tree rejects the mutation.
	fn set_attribute(&mut self, node: Self::Node, namespace: Option<&str>, name: &str, value: &str) -> Result<(), Error>;

	/// # Errors
	///
	/// Iff the live tree rejects the mutation.
	fn remove_attribute(&mut self, node: Self::Node, namespace: Option<&str>, name: &str) -> Result<(), Error>;

	/// Stores `value` as property `name` of the element object itself.
	///
	/// # Errors
	///
	/// Iff the live tree rejects the mutation.
	fn set_property(&mut self, node: Self::Node, name: &str, value: &Self::Object) -> Result<(), Error>;

	/// # Errors
	///
	/// Iff the live tree rejects the mutation.
	fn remove_property(&mut self, node: Self::Node, name: &str) -> Result<(), Error>;

	/// Sets a single inline style property by CSS name. An empty `value` clears it.
	///
	/// # Errors
	///
	/// Iff the live tree rejects the mutation.
	fn set_style_property(&mut self, node: Self::Node, property: &str, value: &str) -> Result<(), Error>;

	/// Replaces the element's entire inline style. An empty `text` clears it.
	///
	/// # Errors
	///
	/// Iff the live tree rejects the mutation.
	fn set_style_text(&mut self, node: Self::Node, text: &str) -> Result<(), Error>;

	/// Reads all attributes currently present on `node`.
	///
	/// # Errors
	///
	/// Iff `node` can't be read.
	fn attributes(&self, node: Self::Node) -> Result<Vec<LoadedAttribute>, Error>;
}

/// What the reconciler needs to know from the tree-walking side.
pub trait TreeCursor {
	type Node;

	/// The element currently open for attribute declarations.
	fn current_element(&self) -> Option<Self::Node>;

	/// Whether the current element is in SVG context, which enables `xlink:`/`xml:` attribute namespaces.
	fn is_svg_context(&self) -> bool;
}

pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// The namespace a qualified attribute name is applied in.
///
/// Only prefixed names in SVG context have one. Everything else, `class` included, is applied exactly as on HTML elements.
#[must_use]
pub fn attribute_namespace(name: &str, svg: bool) -> Option<&'static str> {
	if !svg {
		None
	} else if name.starts_with("xlink:") {
		Some(XLINK_NAMESPACE)
	} else if name.starts_with("xml:") {
		Some(XML_NAMESPACE)
	} else {
		None
	}
}

#[cfg(test)]
mod tests {
	use super::{attribute_namespace, XLINK_NAMESPACE, XML_NAMESPACE};

	#[test]
	fn namespaces() {
		assert_eq!(attribute_namespace("class", true), None);
		assert_eq!(attribute_namespace("xlink:href", true), Some(XLINK_NAMESPACE));
		assert_eq!(attribute_namespace("xml:lang", true), Some(XML_NAMESPACE));
		assert_eq!(attribute_namespace("xlink:href", false), None);
	}
}
