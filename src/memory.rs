//! An in-memory live tree, for rendering without a browser and for tests.
//!
//! Only what attribute reconciliation touches is modelled: tag names, namespaced attributes, properties and inline style.
//! Inline style is kept as declaration list and isn't reflected into a `style` attribute.

use crate::{
	dom::{Dom, LoadedAttribute, PropertyValue},
	style::parse_declarations,
	Error,
};
use core::{
	any::Any,
	fmt::{self, Debug, Formatter},
};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::trace;

/// Stable handle of an element in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A shared opaque object, compared by identity.
#[derive(Clone)]
pub struct Object(Rc<dyn Any>);

impl Object {
	pub fn new<T: Any>(value: T) -> Self {
		Self(Rc::new(value))
	}

	#[must_use]
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.0.downcast_ref()
	}

	fn address(&self) -> *const u8 {
		Rc::as_ptr(&self.0).cast()
	}
}

impl PropertyValue for Object {
	fn is_same(&self, other: &Self) -> bool {
		self.address() == other.address()
	}
}

impl Debug for Object {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "Object({:p})", self.address())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
	Html,
	Svg,
}

#[derive(Debug, Clone)]
struct Attribute {
	namespace: Option<String>,
	/// Qualified.
	name: String,
	value: String,
}

impl Attribute {
	/// Namespaced attributes are identified by local name, others by qualified name.
	fn matches(&self, namespace: Option<&str>, name: &str) -> bool {
		self.namespace.as_deref() == namespace
			&& match namespace {
				Some(_) => local_part(&self.name) == local_part(name),
				None => self.name == name,
			}
	}
}

#[derive(Debug)]
struct ElementData {
	tag: String,
	namespace: Namespace,
	attributes: Vec<Attribute>,
	properties: HashMap<String, Object>,
	style: Vec<(String, String)>,
}

/// An arena of elements, addressed by [`NodeId`].
#[derive(Debug, Default)]
pub struct MemoryDom {
	elements: Vec<ElementData>,
	mutations: usize,
}

impl MemoryDom {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn create_element(&mut self, tag: &str) -> NodeId {
		self.create_element_ns(Namespace::Html, tag)
	}

	pub fn create_element_ns(&mut self, namespace: Namespace, tag: &str) -> NodeId {
		self.elements.push(ElementData {
			tag: tag.to_owned(),
			namespace,
			attributes: Vec::new(),
			properties: HashMap::new(),
			style: Vec::new(),
		});
		NodeId(self.elements.len() - 1)
	}

	#[must_use]
	pub fn tag_name(&self, node: NodeId) -> Option<&str> {
		self.elements.get(node.0).map(|element| element.tag.as_str())
	}

	#[must_use]
	pub fn namespace(&self, node: NodeId) -> Option<Namespace> {
		self.elements.get(node.0).map(|element| element.namespace)
	}

	/// Looks up an attribute by qualified name, like `Element.getAttribute`.
	#[must_use]
	pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
		self.elements
			.get(node.0)?
			.attributes
			.iter()
			.find(|attribute| attribute.name == name)
			.map(|attribute| attribute.value.as_str())
	}

	/// Looks up an attribute by namespace and local name, like `Element.getAttributeNS`.
	#[must_use]
	pub fn get_attribute_ns(&self, node: NodeId, namespace: Option<&str>, local_name: &str) -> Option<&str> {
		self.elements
			.get(node.0)?
			.attributes
			.iter()
			.find(|attribute| attribute.namespace.as_deref() == namespace && local_part(&attribute.name) == local_name)
			.map(|attribute| attribute.value.as_str())
	}

	#[must_use]
	pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
		self.get_attribute(node, name).is_some()
	}

	/// Qualified attribute names, in insertion order.
	#[must_use]
	pub fn attribute_names(&self, node: NodeId) -> Vec<&str> {
		self.elements
			.get(node.0)
			.map(|element| element.attributes.iter().map(|attribute| attribute.name.as_str()).collect())
			.unwrap_or_default()
	}

	#[must_use]
	pub fn property(&self, node: NodeId, name: &str) -> Option<&Object> {
		self.elements.get(node.0)?.properties.get(name)
	}

	/// The value of an inline style property by CSS name, or `""` if it isn't set.
	#[must_use]
	pub fn style_property(&self, node: NodeId, property: &str) -> &str {
		self.elements
			.get(node.0)
			.and_then(|element| element.style.iter().find(|(name, _)| name == property))
			.map_or("", |(_, value)| value.as_str())
	}

	/// The inline style serialised as declaration string.
	#[must_use]
	pub fn style_text(&self, node: NodeId) -> String {
		self.elements.get(node.0).map_or_else(String::new, |element| {
			element
				.style
				.iter()
				.map(|(property, value)| format!("{}: {};", property, value))
				.collect::<Vec<_>>()
				.join(" ")
		})
	}

	/// How many mutations were applied through [`Dom`] so far.
	#[must_use]
	pub fn mutation_count(&self) -> usize {
		self.mutations
	}

	fn element_mut(&mut self, node: NodeId, operation: &'static str, name: &str) -> Result<&mut ElementData, Error> {
		let element = self
			.elements
			.get_mut(node.0)
			.ok_or_else(|| Error::dom(operation, name, format!("unknown node {:?}", node)))?;
		self.mutations += 1;
		Ok(element)
	}

	/// Adds an attribute without going through [`Dom`], as parsed markup would.
	pub fn insert_attribute(&mut self, node: NodeId, namespace: Option<&str>, name: &str, value: &str) {
		if let Some(element) = self.elements.get_mut(node.0) {
			element.attributes.retain(|attribute| !attribute.matches(namespace, name));
			element.attributes.push(Attribute {
				namespace: namespace.map(ToOwned::to_owned),
				name: name.to_owned(),
				value: value.to_owned(),
			});
		}
	}
}

fn local_part(qualified_name: &str) -> &str {
	qualified_name.split_once(':').map_or(qualified_name, |(_, local)| local)
}

fn upsert_style(style: &mut Vec<(String, String)>, property: &str, value: &str) {
	match style.iter_mut().find(|(name, _)| name == property) {
		Some((_, applied)) => value.clone_into(applied),
		None => style.push((property.to_owned(), value.to_owned())),
	}
}

impl Dom for MemoryDom {
	type Node = NodeId;
	type Object = Object;

	fn set_attribute(&mut self, node: NodeId, namespace: Option<&str>, name: &str, value: &str) -> Result<(), Error> {
		let element = self.element_mut(node, "set_attribute", name)?;
		match element.attributes.iter_mut().find(|attribute| attribute.matches(namespace, name)) {
			Some(attribute) => value.clone_into(&mut attribute.value),
			None => element.attributes.push(Attribute {
				namespace: namespace.map(ToOwned::to_owned),
				name: name.to_owned(),
				value: value.to_owned(),
			}),
		}
		trace!(?node, attribute = name, "Set attribute.");
		Ok(())
	}

	fn remove_attribute(&mut self, node: NodeId, namespace: Option<&str>, name: &str) -> Result<(), Error> {
		let element = self.element_mut(node, "remove_attribute", name)?;
		element.attributes.retain(|attribute| !attribute.matches(namespace, name));
		trace!(?node, attribute = name, "Removed attribute.");
		Ok(())
	}

	fn set_property(&mut self, node: NodeId, name: &str, value: &Object) -> Result<(), Error> {
		let element = self.element_mut(node, "set_property", name)?;
		element.properties.insert(name.to_owned(), value.clone());
		Ok(())
	}

	fn remove_property(&mut self, node: NodeId, name: &str) -> Result<(), Error> {
		let element = self.element_mut(node, "remove_property", name)?;
		element.properties.remove(name);
		Ok(())
	}

	fn set_style_property(&mut self, node: NodeId, property: &str, value: &str) -> Result<(), Error> {
		let element = self.element_mut(node, "set_style_property", property)?;
		if value.is_empty() {
			element.style.retain(|(name, _)| name != property);
		} else {
			upsert_style(&mut element.style, property, value);
		}
		Ok(())
	}

	fn set_style_text(&mut self, node: NodeId, text: &str) -> Result<(), Error> {
		let element = self.element_mut(node, "set_style_text", "style")?;
		element.style.clear();
		for (property, value) in parse_declarations(text) {
			upsert_style(&mut element.style, &property, value);
		}
		Ok(())
	}

	fn attributes(&self, node: NodeId) -> Result<Vec<LoadedAttribute>, Error> {
		let element = self
			.elements
			.get(node.0)
			.ok_or_else(|| Error::dom("attributes", "", format!("unknown node {:?}", node)))?;
		Ok(element
			.attributes
			.iter()
			.map(|attribute| LoadedAttribute {
				namespace: attribute.namespace.clone(),
				name: attribute.name.clone(),
				value: attribute.value.clone(),
			})
			.collect())
	}
}
