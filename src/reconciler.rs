use crate::{
	classify::{classify, Strategy},
	dom::{attribute_namespace, Dom, LoadedAttribute, PropertyValue, TreeCursor, XLINK_NAMESPACE, XML_NAMESPACE},
	record::{Applied, AttributeRecord, Entry},
	style::css_property_name,
	value::StyleMap,
	Error, Value,
};
use core::fmt::{self, Debug, Formatter};
use hashbrown::HashMap;
use std::borrow::Cow;
use tracing::{error, instrument, level_filters::STATIC_MAX_LEVEL, trace, warn, Level};

/// A custom attribute mutator, which replaces value classification for the name it is registered for.
///
/// It is called with the declared value when applying and with [`Value::Undefined`] when the name is removed again.
pub type Mutator<D> = fn(&mut D, <D as Dom>::Node, &str, &Value<'_, <D as Dom>::Object>) -> Result<(), Error>;

/// Converges live elements' attributes, properties and inline styles to what is declared during each render pass.
///
/// # Correct Use
///
/// For each element, in tree order:
///
/// 1. Open the element in the [`TreeCursor`].
/// 2. Call [`declare_attribute`](`Reconciler::declare_attribute`) once per declaration, in declaration order.
/// 3. Call [`finalize_attributes`](`Reconciler::finalize_attributes`), which removes whatever the previous pass applied but this one didn't declare.
/// 4. Render the element's children, then close it.
///
/// Only one element's declarations can be open at a time, so 3. must happen before any child element is declared into.
///
/// If the render pass is abandoned between 2. and 3., call [`abort`](`Reconciler::abort`).
/// When the tree cursor destroys an element, call [`forget`](`Reconciler::forget`).
pub struct Reconciler<D: Dom> {
	records: HashMap<D::Node, AttributeRecord<D::Object>>,
	mutators: HashMap<Box<str>, Mutator<D>>,
	pass: Option<Pass<D::Node>>,
}

/// The element currently receiving declarations.
///
/// `position` partitions its record: Entries before it were declared during this pass.
#[derive(Debug, Clone, Copy)]
struct Pass<N> {
	node: N,
	position: usize,
}

/// A classified declaration with its payload.
enum Declaration<'d, 'v, D: Dom> {
	Custom(Mutator<D>, &'d Value<'v, D::Object>),
	Attribute(Cow<'d, str>),
	Property(&'d D::Object),
	StyleObject(&'d StyleMap<'v>),
	StyleText(&'d str),
}

impl<'d, 'v, D: Dom> Declaration<'d, 'v, D> {
	/// [`None`] means nothing is applied.
	fn new(name: &str, value: &'d Value<'v, D::Object>, mutator: Option<Mutator<D>>) -> Result<Option<Self>, Error> {
		if let Some(mutator) = mutator {
			return Ok(if value.is_undefined() { None } else { Some(Declaration::Custom(mutator, value)) });
		}

		Ok(Some(match (classify(name, value)?, value) {
			(Strategy::Skip, _) => return Ok(None),
			(Strategy::NodeProperty, Value::Function(object) | Value::Object(object)) => Declaration::Property(object),
			(Strategy::StyleObject, Value::Style(style)) => Declaration::StyleObject(style),
			(Strategy::StyleString, Value::Str(text)) => Declaration::StyleText(&**text),
			(Strategy::PlainAttribute, value) => match value.to_attribute_string() {
				Some(text) => Declaration::Attribute(text),
				None => return Err(Error::UnsupportedValue { name: name.to_owned() }),
			},
			_ => return Err(Error::UnsupportedValue { name: name.to_owned() }),
		}))
	}
}

impl<D: Dom> Default for Reconciler<D> {
	fn default() -> Self {
		Self::new()
	}
}

impl<D: Dom> Debug for Reconciler<D> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Reconciler")
			.field("records.len()", &self.records.len())
			.field("mutators", &self.mutators.keys().collect::<Vec<_>>())
			.field("pass", &self.pass)
			.finish()
	}
}

impl<D: Dom> Reconciler<D> {
	#[must_use]
	pub fn new() -> Self {
		Self {
			records: HashMap::new(),
			mutators: HashMap::new(),
			pass: None,
		}
	}

	/// Registers `mutator` for all declarations named `name`, replacing any previous registration.
	#[must_use]
	pub fn with_mutator(mut self, name: impl Into<Box<str>>, mutator: Mutator<D>) -> Self {
		self.mutators.insert(name.into(), mutator);
		self
	}

	/// What the latest render pass applied to `node`, if it was ever reconciled or loaded.
	#[must_use]
	pub fn record(&self, node: D::Node) -> Option<&AttributeRecord<D::Object>> {
		self.records.get(&node)
	}

	/// Drops all bookkeeping for `node`. Call this when the element is destroyed.
	pub fn forget(&mut self, node: D::Node) -> Option<AttributeRecord<D::Object>> {
		if self.pass.map_or(false, |pass| pass.node == node) {
			self.pass = None;
		}
		self.records.remove(&node)
	}

	/// Abandons the current element's render pass without removing anything.
	///
	/// The element keeps whatever was applied so far, and its record still matches it.
	pub fn abort(&mut self) {
		if let Some(pass) = self.pass.take() {
			warn!(node = ?pass.node, position = pass.position, "Aborted render pass.");
		}
	}

	/// Adopts the attributes currently present on `node`, e.g. from server-rendered markup,
	/// so that the next render pass updates or removes them like rendered ones.
	///
	/// Names that are already recorded keep their bookkeeping.
	///
	/// # Errors
	///
	/// Iff `node` is in a render pass or its attributes can't be read.
	#[instrument(skip(self, dom))]
	pub fn load(&mut self, dom: &D, node: D::Node) -> Result<(), Error> {
		if self.pass.map_or(false, |pass| pass.node == node) {
			error!("Tried to load attributes in the middle of a render pass.");
			return Err(inconsistent(node, "attributes can't be loaded during the element's render pass"));
		}

		let attributes = dom.attributes(node)?;
		let record = self.records.entry(node).or_default();
		for LoadedAttribute { namespace, name, value } in attributes {
			let namespace = match namespace.as_deref() {
				None => None,
				Some(XLINK_NAMESPACE) => Some(XLINK_NAMESPACE),
				Some(XML_NAMESPACE) => Some(XML_NAMESPACE),
				Some(other) => {
					warn!(attribute = %name, namespace = other, "Not loading attribute in unrecognised namespace. It won't be managed.");
					continue;
				}
			};
			if record.get(&name).is_some() {
				continue;
			}
			record.entries.push(Entry {
				name: name.into(),
				applied: Applied::Attribute { namespace, value },
			});
		}
		trace!("Loaded {} attribute(s).", record.len());
		Ok(())
	}

	/// Applies one declaration to the cursor's current element.
	///
	/// Declaring [`Value::Undefined`] is the same as not declaring `name` at all.
	///
	/// # Errors
	///
	/// - [`Error::NoCurrentElement`] if the cursor has no open element.
	/// - [`Error::InconsistentRecord`] if another element's pass wasn't finalized.
	/// - [`Error::UnsupportedValue`] if `value` has no strategy for `name`.
	/// - [`Error::Dom`] if the live tree rejects a mutation.
	#[instrument(skip(self, dom, cursor, value), fields(value = ?value))]
	pub fn declare_attribute<C>(&mut self, dom: &mut D, cursor: &C, name: &str, value: Value<'_, D::Object>) -> Result<(), Error>
	where
		C: TreeCursor<Node = D::Node> + ?Sized,
	{
		let node = cursor.current_element().ok_or(Error::NoCurrentElement)?;
		let mut position = self.open_pass(node)?;
		let svg = cursor.is_svg_context();

		let Self { records, mutators, pass } = self;
		let result = Declaration::new(name, &value, mutators.get(name).copied()).and_then(|declaration| {
			let record = records.entry(node).or_default();
			declare(dom, node, svg, mutators, record, &mut position, name, declaration)
		});
		*pass = Some(Pass { node, position });
		result
	}

	/// Ends the cursor's current element's render pass,
	/// removing each previously applied name that wasn't declared again with the strategy it was applied with.
	///
	/// # Errors
	///
	/// - [`Error::NoCurrentElement`] if the cursor has no open element.
	/// - [`Error::InconsistentRecord`] if another element's pass wasn't finalized, or a custom mutator went missing.
	/// - [`Error::Dom`] if the live tree rejects a removal. Removals done until then are recorded.
	#[instrument(skip(self, dom, cursor))]
	pub fn finalize_attributes<C>(&mut self, dom: &mut D, cursor: &C) -> Result<(), Error>
	where
		C: TreeCursor<Node = D::Node> + ?Sized,
	{
		let node = cursor.current_element().ok_or(Error::NoCurrentElement)?;
		let position = self.open_pass(node)?;
		self.pass = None;

		let Self { records, mutators, .. } = self;
		let mutators = &*mutators;
		let record = match records.get_mut(&node) {
			Some(record) => record,
			None => {
				trace!("Nothing was ever applied.");
				return Ok(());
			}
		};

		let mut removed = 0;
		let result = record.entries[position..].iter().try_for_each(|entry| -> Result<(), Error> {
			revert(dom, node, mutators, entry)?;
			removed += 1;
			Ok(())
		});
		record.entries.drain(position..position + removed);
		trace!("Removed {} trailing attribute(s).", removed);

		if STATIC_MAX_LEVEL >= Level::WARN && record.len() >= 100 {
			warn!(
				"The attribute record for {:?} is large ({} entries).\n\
				Each declaration that doesn't match in order is a linear search through it.",
				node,
				record.len()
			);
		}
		result
	}

	/// Declares each of `declarations` in order, then finalizes.
	///
	/// On error, the render pass is [aborted](`Reconciler::abort`).
	///
	/// # Errors
	///
	/// See [`declare_attribute`](`Reconciler::declare_attribute`) and [`finalize_attributes`](`Reconciler::finalize_attributes`).
	pub fn reconcile<'v, C, I>(&mut self, dom: &mut D, cursor: &C, declarations: I) -> Result<(), Error>
	where
		C: TreeCursor<Node = D::Node> + ?Sized,
		I: IntoIterator<Item = (&'v str, Value<'v, D::Object>)>,
		D::Object: 'v,
	{
		let result = declarations
			.into_iter()
			.try_for_each(|(name, value)| self.declare_attribute(dom, cursor, name, value))
			.and_then(|()| self.finalize_attributes(dom, cursor));
		if result.is_err() {
			self.abort();
		}
		result
	}

	fn open_pass(&mut self, node: D::Node) -> Result<usize, Error> {
		match self.pass {
			None => {
				self.pass = Some(Pass { node, position: 0 });
				Ok(0)
			}
			Some(pass) if pass.node == node => Ok(pass.position),
			Some(pass) => {
				error!(open = ?pass.node, current = ?node, "Render pass of another element wasn't finalized.");
				Err(inconsistent(node, format!("the render pass of {:?} wasn't finalized", pass.node)))
			}
		}
	}
}

fn inconsistent(node: impl Debug, reason: impl Into<String>) -> Error {
	Error::InconsistentRecord {
		node: format!("{:?}", node),
		reason: reason.into(),
	}
}

#[allow(clippy::too_many_arguments)]
fn declare<D: Dom>(
	dom: &mut D,
	node: D::Node,
	svg: bool,
	mutators: &HashMap<Box<str>, Mutator<D>>,
	record: &mut AttributeRecord<D::Object>,
	position: &mut usize,
	name: &str,
	declaration: Option<Declaration<'_, '_, D>>,
) -> Result<(), Error> {
	let found = record.find(name, *position);

	let declaration = match declaration {
		Some(declaration) => declaration,
		None => {
			match found {
				Some(i) if i < *position => {
					trace!("Declared away after an earlier declaration in this pass. Removing.");
					revert(dom, node, mutators, &record.entries[i])?;
					record.entries.remove(i);
					*position -= 1;
				}
				_ => trace!("Skipped."),
			}
			return Ok(());
		}
	};

	let declaration = match found {
		None => declaration,
		Some(i) => {
			// Declared this pass even if the update below fails, so finalization must not remove it.
			let i = if i >= *position {
				record.entries.swap(i, *position);
				*position += 1;
				*position - 1
			} else {
				i
			};

			match update(dom, node, svg, name, declaration, &mut record.entries[i].applied)? {
				None => return Ok(()),
				Some(declaration) => {
					let entry = &record.entries[i];
					warn!(previous = ?entry.applied.strategy(), "Mutation strategy changed. Reverting the previous one.");
					revert(dom, node, mutators, entry)?;
					record.entries.remove(i);
					*position -= 1;
					declaration
				}
			}
		}
	};

	let (applied, result) = apply(dom, node, svg, name, declaration);
	if let Some(applied) = applied {
		record.entries.insert(*position, Entry { name: name.into(), applied });
		*position += 1;
	}
	result
}

/// Updates `applied` in place if the declaration is compatible with it.
///
/// Hands the declaration back otherwise.
fn update<'d, 'v, D: Dom>(dom: &mut D, node: D::Node, svg: bool, name: &str, declaration: Declaration<'d, 'v, D>, applied: &mut Applied<D::Object>) -> Result<Option<Declaration<'d, 'v, D>>, Error> {
	match (declaration, applied) {
		(Declaration::Custom(mutator, value), Applied::Custom) => mutator(dom, node, name, value)?,

		(Declaration::Attribute(text), Applied::Attribute { namespace, value }) if *namespace == attribute_namespace(name, svg) => {
			if *value == text {
				trace!("Attribute unchanged.");
			} else {
				dom.set_attribute(node, *namespace, name, &text)?;
				trace!("Updated attribute.");
				*value = text.into_owned();
			}
		}

		(Declaration::Property(object), Applied::Property(applied)) => {
			if applied.is_same(object) {
				trace!("Property unchanged.");
			} else {
				dom.set_property(node, name, object)?;
				trace!("Updated property.");
				*applied = object.clone();
			}
		}

		(Declaration::StyleText(text), Applied::StyleText(applied)) => {
			if *applied == text {
				trace!("Style text unchanged.");
			} else {
				dom.set_style_text(node, text)?;
				trace!("Updated style text.");
				*applied = text.to_owned();
			}
		}

		// Setting the text replaces all properties anyway.
		(Declaration::StyleText(text), applied @ Applied::StyleObject(_)) => {
			dom.set_style_text(node, text)?;
			trace!("Replaced style mapping with style text.");
			*applied = Applied::StyleText(text.to_owned());
		}

		(Declaration::StyleObject(style), Applied::StyleObject(properties)) => apply_style_object(dom, node, properties, style)?,

		(declaration, _) => return Ok(Some(declaration)),
	}
	Ok(None)
}

/// Applies `declaration` to an element that has nothing applied under its name.
///
/// If anything was applied, the returned record entry describes it, even on error.
fn apply<D: Dom>(dom: &mut D, node: D::Node, svg: bool, name: &str, declaration: Declaration<'_, '_, D>) -> (Option<Applied<D::Object>>, Result<(), Error>) {
	let result = match declaration {
		Declaration::Custom(mutator, value) => mutator(dom, node, name, value).map(|()| Applied::Custom),
		Declaration::Attribute(text) => {
			let namespace = attribute_namespace(name, svg);
			dom.set_attribute(node, namespace, name, &text).map(|()| Applied::Attribute {
				namespace,
				value: text.into_owned(),
			})
		}
		Declaration::Property(object) => dom.set_property(node, name, object).map(|()| Applied::Property(object.clone())),
		Declaration::StyleText(text) => dom.set_style_text(node, text).map(|()| Applied::StyleText(text.to_owned())),
		Declaration::StyleObject(style) => {
			let mut properties = Vec::with_capacity(style.len());
			let result = apply_style_object(dom, node, &mut properties, style);
			return (Some(Applied::StyleObject(properties)), result);
		}
	};

	match result {
		Ok(applied) => {
			trace!(strategy = ?applied.strategy(), "Applied.");
			(Some(applied), Ok(()))
		}
		Err(error) => (None, Err(error)),
	}
}

/// Sets every property of `style` and clears the ones in `properties` that it doesn't mention.
///
/// `properties` is kept in sync with the live element after each write.
fn apply_style_object<D: Dom>(dom: &mut D, node: D::Node, properties: &mut Vec<(String, String)>, style: &StyleMap<'_>) -> Result<(), Error> {
	let mut kept = 0;
	for (key, value) in style.iter() {
		let property = css_property_name(key);
		let (seen, rest) = properties.split_at(kept);
		let found = rest
			.iter()
			.position(|(applied, _)| *applied == property)
			.map(|i| kept + i)
			.or_else(|| seen.iter().position(|(applied, _)| *applied == property));

		match found {
			Some(i) => {
				if properties[i].1 != value {
					dom.set_style_property(node, &property, value)?;
					properties[i].1 = value.to_owned();
				}
				if i >= kept {
					properties.swap(i, kept);
					kept += 1;
				}
			}
			None => {
				dom.set_style_property(node, &property, value)?;
				properties.insert(kept, (property.into_owned(), value.to_owned()));
				kept += 1;
			}
		}
	}

	while properties.len() > kept {
		dom.set_style_property(node, &properties[properties.len() - 1].0, "")?;
		properties.pop();
	}
	trace!("Style mapping has {} propert(y/ies).", kept);
	Ok(())
}

/// Reverses `entry` with the strategy it was applied with.
fn revert<D: Dom>(dom: &mut D, node: D::Node, mutators: &HashMap<Box<str>, Mutator<D>>, entry: &Entry<D::Object>) -> Result<(), Error> {
	let name = &*entry.name;
	match &entry.applied {
		Applied::Attribute { namespace, .. } => dom.remove_attribute(node, *namespace, name)?,
		Applied::Property(_) => dom.remove_property(node, name)?,
		Applied::StyleObject(properties) => {
			for (property, _) in properties {
				dom.set_style_property(node, property, "")?;
			}
		}
		Applied::StyleText(_) => dom.set_style_text(node, "")?,
		Applied::Custom => match mutators.get(name) {
			Some(mutator) => mutator(dom, node, name, &Value::Undefined)?,
			None => {
				error!(attribute = name, "No mutator to remove custom-applied attribute with.");
				return Err(inconsistent(node, format!("no mutator is registered to remove {:?}", name)));
			}
		},
	}
	trace!(attribute = name, "Removed.");
	Ok(())
}
