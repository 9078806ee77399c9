use crate::classify::Strategy;

/// Per-element bookkeeping of what the most recent render pass applied.
///
/// Entries are kept in declaration order of the latest pass, which makes the steady state (same names in the same order) a straight walk.
#[derive(Debug, Clone)]
pub struct AttributeRecord<O> {
	pub(crate) entries: Vec<Entry<O>>,
}

impl<O> Default for AttributeRecord<O> {
	fn default() -> Self {
		Self { entries: Vec::new() }
	}
}

impl<O> AttributeRecord<O> {
	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn entries(&self) -> impl ExactSizeIterator<Item = &Entry<O>> {
		self.entries.iter()
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&Applied<O>> {
		self.entries.iter().find(|entry| &*entry.name == name).map(|entry| &entry.applied)
	}

	/// Finds `name`, checking `from..` before `..from`.
	pub(crate) fn find(&self, name: &str, from: usize) -> Option<usize> {
		let (seen, rest) = self.entries.split_at(from);
		rest.iter()
			.position(|entry| &*entry.name == name)
			.map(|i| from + i)
			.or_else(|| seen.iter().position(|entry| &*entry.name == name))
	}
}

#[derive(Debug, Clone)]
pub struct Entry<O> {
	pub name: Box<str>,
	pub applied: Applied<O>,
}

/// A mutation as it was applied, with enough information to reverse it.
#[derive(Debug, Clone)]
pub enum Applied<O> {
	Attribute {
		namespace: Option<&'static str>,
		value: String,
	},
	Property(O),
	/// `(css_property_name, value)` pairs, in declaration order.
	StyleObject(Vec<(String, String)>),
	StyleText(String),
	/// Applied through a registered mutator, which is also responsible for removal.
	Custom,
}

impl<O> Applied<O> {
	#[must_use]
	pub fn strategy(&self) -> Option<Strategy> {
		Some(match self {
			Applied::Attribute { .. } => Strategy::PlainAttribute,
			Applied::Property(_) => Strategy::NodeProperty,
			Applied::StyleObject(_) => Strategy::StyleObject,
			Applied::StyleText(_) => Strategy::StyleString,
			Applied::Custom => return None,
		})
	}

	/// The attribute value, if this was applied as plain attribute.
	#[must_use]
	pub fn attribute_value(&self) -> Option<&str> {
		match self {
			Applied::Attribute { value, .. } => Some(value.as_str()),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{Applied, AttributeRecord, Entry};

	fn record(names: &[&str]) -> AttributeRecord<()> {
		AttributeRecord {
			entries: names
				.iter()
				.map(|&name| Entry {
					name: name.into(),
					applied: Applied::Attribute { namespace: None, value: String::new() },
				})
				.collect(),
		}
	}

	#[test]
	fn find_prefers_unseen() {
		let record = record(&["a", "b", "c"]);
		assert_eq!(record.find("c", 1), Some(2));
		assert_eq!(record.find("a", 1), Some(0));
		assert_eq!(record.find("d", 1), None);
		assert_eq!(record.find("a", 3), Some(0));
	}
}
