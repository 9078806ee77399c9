use crate::{Error, Value};

/// How a declaration is applied to (and later removed from) the live element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
	/// String-coerced, namespace-aware attribute.
	PlainAttribute,
	/// Stored as-is as property of the element object. Never visible as attribute.
	NodeProperty,
	/// `style` as structured mapping, diffed per CSS property.
	StyleObject,
	/// `style` as pre-formatted declaration string, applied wholesale.
	StyleString,
	/// Nothing is applied. A previously applied value of the same name is removed on finalization.
	Skip,
}

/// The name under which inline styles are declared.
pub const STYLE: &str = "style";

/// Selects the mutation strategy for a declaration.
///
/// Pure: Looks only at `name` and the kind of `value`.
///
/// # Errors
///
/// Iff `value` is a [`Value::Style`] mapping but `name` isn't `"style"`.
pub fn classify<O>(name: &str, value: &Value<'_, O>) -> Result<Strategy, Error> {
	Ok(match value {
		Value::Undefined => Strategy::Skip,
		Value::Style(_) if name == STYLE => Strategy::StyleObject,
		Value::Style(_) => return Err(Error::UnsupportedValue { name: name.to_owned() }),
		Value::Str(_) if name == STYLE => Strategy::StyleString,
		Value::Function(_) | Value::Object(_) => Strategy::NodeProperty,
		Value::Bool(_) | Value::Number(_) | Value::Str(_) => Strategy::PlainAttribute,
	})
}
