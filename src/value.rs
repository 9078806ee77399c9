use core::fmt::{self, Debug, Formatter};
use std::borrow::Cow;

/// A structured inline style mapping, as pairs of camel-case-like property names and values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleMap<'a> {
	/// `&[("color", "white"), ("backgroundColor", "red")]`
	Borrowed(&'a [(&'a str, &'a str)]),
	/// Collected at runtime, e.g. from a host object's own properties.
	Owned(Vec<(String, String)>),
}

impl<'a> StyleMap<'a> {
	#[must_use]
	pub fn len(&self) -> usize {
		match self {
			StyleMap::Borrowed(pairs) => pairs.len(),
			StyleMap::Owned(pairs) => pairs.len(),
		}
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// The `(key, value)` pairs in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
		(0..self.len()).map(move |i| match self {
			StyleMap::Borrowed(pairs) => pairs[i],
			StyleMap::Owned(pairs) => (pairs[i].0.as_str(), pairs[i].1.as_str()),
		})
	}
}

impl<'a> From<&'a [(&'a str, &'a str)]> for StyleMap<'a> {
	fn from(pairs: &'a [(&'a str, &'a str)]) -> Self {
		Self::Borrowed(pairs)
	}
}

impl<'a> From<Vec<(String, String)>> for StyleMap<'a> {
	fn from(pairs: Vec<(String, String)>) -> Self {
		Self::Owned(pairs)
	}
}

/// The value half of an attribute declaration.
///
/// `O` is the host's opaque object type, e.g. [`JsValue`](`wasm_bindgen::JsValue`) for [`WebDom`](`crate::web::WebDom`).
#[derive(Clone)]
pub enum Value<'a, O> {
	/// Declares the name absent. Equivalent to not declaring it at all.
	Undefined,
	Bool(bool),
	Number(f64),
	Str(Cow<'a, str>),
	/// A callable, stored as node property.
	Function(O),
	/// Any other host object, stored as node property.
	Object(O),
	/// Only valid for `style`.
	Style(StyleMap<'a>),
}

impl<'a, O> Value<'a, O> {
	/// A [`Style`](`Value::Style`) mapping borrowed from `pairs`.
	#[must_use]
	pub fn style(pairs: &'a [(&'a str, &'a str)]) -> Self {
		Self::Style(StyleMap::Borrowed(pairs))
	}

	#[must_use]
	pub fn is_undefined(&self) -> bool {
		matches!(self, Self::Undefined)
	}

	/// The attribute-string form of this value, or [`None`] for values that are never string-coerced.
	///
	/// Booleans become their literal word, so `false` is *present* as `"false"`.
	#[must_use]
	pub fn to_attribute_string(&self) -> Option<Cow<'_, str>> {
		match self {
			Value::Undefined | Value::Function(_) | Value::Object(_) | Value::Style(_) => None,
			Value::Bool(true) => Some(Cow::Borrowed("true")),
			Value::Bool(false) => Some(Cow::Borrowed("false")),
			Value::Number(number) => Some(number_to_string(*number)),
			Value::Str(str) => Some(Cow::Borrowed(&**str)),
		}
	}

	/// Short kind name for log events.
	#[must_use]
	pub fn kind(&self) -> &'static str {
		match self {
			Value::Undefined => "undefined",
			Value::Bool(_) => "boolean",
			Value::Number(_) => "number",
			Value::Str(_) => "string",
			Value::Function(_) => "function",
			Value::Object(_) => "object",
			Value::Style(_) => "style mapping",
		}
	}
}

/// ECMAScript `Number::prototype.toString()`, i.e. the shortest round-tripping digits,
/// in exponent form below `1e-6` and from `1e21` on.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn number_to_string(number: f64) -> Cow<'static, str> {
	if number.is_nan() {
		return Cow::Borrowed("NaN");
	} else if number.is_infinite() {
		return Cow::Borrowed(if number > 0.0 { "Infinity" } else { "-Infinity" });
	} else if number == 0.0 {
		// Also catches -0.
		return Cow::Borrowed("0");
	}

	// `{:e}` already yields the shortest digits, e.g. `1.5e-7`.
	let scientific = format!("{:e}", number.abs());
	let (digits, exponent) = match scientific
		.split_once('e')
		.and_then(|(mantissa, exponent)| Some((mantissa.replace('.', ""), exponent.parse::<i32>().ok()?)))
	{
		Some(parsed) => parsed,
		None => return Cow::Owned(number.to_string()),
	};
	let sign = if number < 0.0 { "-" } else { "" };
	let k = digits.len() as i32;
	let n = exponent + 1;

	Cow::Owned(if k <= n && n <= 21 {
		format!("{}{}{}", sign, digits, "0".repeat((n - k) as usize))
	} else if 0 < n && n <= 21 {
		let (integer, fraction) = digits.split_at(n as usize);
		format!("{}{}.{}", sign, integer, fraction)
	} else if -6 < n && n <= 0 {
		format!("{}0.{}{}", sign, "0".repeat((-n) as usize), digits)
	} else {
		let (first, rest) = digits.split_at(1);
		format!(
			"{}{}{}{}e{}{}",
			sign,
			first,
			if rest.is_empty() { "" } else { "." },
			rest,
			if n > 0 { "+" } else { "-" },
			(n - 1).abs()
		)
	})
}

impl<'a, O> Debug for Value<'a, O> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		if cfg!(feature = "dangerous-logging") {
			match self {
				Value::Undefined => f.write_str("Undefined"),
				Value::Bool(bool) => f.debug_tuple("Bool").field(bool).finish(),
				Value::Number(number) => f.debug_tuple("Number").field(number).finish(),
				Value::Str(str) => f.debug_tuple("Str").field(str).finish(),
				Value::Function(_) => f.write_str("Function(..)"),
				Value::Object(_) => f.write_str("Object(..)"),
				Value::Style(style) => f.debug_tuple("Style").field(style).finish(),
			}
		} else {
			write!(f, "<{}>", self.kind())
		}
	}
}

impl<'a, O> From<&'a str> for Value<'a, O> {
	fn from(str: &'a str) -> Self {
		Self::Str(Cow::Borrowed(str))
	}
}

impl<'a, O> From<String> for Value<'a, O> {
	fn from(string: String) -> Self {
		Self::Str(Cow::Owned(string))
	}
}

impl<'a, O> From<Cow<'a, str>> for Value<'a, O> {
	fn from(str: Cow<'a, str>) -> Self {
		Self::Str(str)
	}
}

impl<'a, O> From<bool> for Value<'a, O> {
	fn from(bool: bool) -> Self {
		Self::Bool(bool)
	}
}

impl<'a, O> From<f64> for Value<'a, O> {
	fn from(number: f64) -> Self {
		Self::Number(number)
	}
}

impl<'a, O> From<i32> for Value<'a, O> {
	fn from(number: i32) -> Self {
		Self::Number(number.into())
	}
}

impl<'a, O> From<u32> for Value<'a, O> {
	fn from(number: u32) -> Self {
		Self::Number(number.into())
	}
}

impl<'a, O> From<StyleMap<'a>> for Value<'a, O> {
	fn from(style: StyleMap<'a>) -> Self {
		Self::Style(style)
	}
}

impl<'a, O, T: Into<Value<'a, O>>> From<Option<T>> for Value<'a, O> {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Undefined, Into::into)
	}
}

#[cfg(test)]
mod tests {
	use super::Value;

	type V = Value<'static, ()>;

	#[test]
	fn booleans_are_words() {
		assert_eq!(V::from(false).to_attribute_string().as_deref(), Some("false"));
		assert_eq!(V::from(true).to_attribute_string().as_deref(), Some("true"));
	}

	#[test]
	fn numbers_follow_js() {
		assert_eq!(V::from(1_i32).to_attribute_string().as_deref(), Some("1"));
		assert_eq!(V::from(0.5).to_attribute_string().as_deref(), Some("0.5"));
		assert_eq!(V::from(-0.0).to_attribute_string().as_deref(), Some("0"));
		assert_eq!(V::from(f64::NAN).to_attribute_string().as_deref(), Some("NaN"));
		assert_eq!(V::from(f64::NEG_INFINITY).to_attribute_string().as_deref(), Some("-Infinity"));
		assert_eq!(V::from(-0.5).to_attribute_string().as_deref(), Some("-0.5"));
		assert_eq!(V::from(123.456).to_attribute_string().as_deref(), Some("123.456"));
	}

	#[test]
	fn numbers_switch_to_exponent_form_like_js() {
		let text = |number: f64| V::from(number).to_attribute_string().map(|text| text.into_owned());
		assert_eq!(text(1e20).as_deref(), Some("100000000000000000000"));
		assert_eq!(text(1e21).as_deref(), Some("1e+21"));
		assert_eq!(text(1.5e300).as_deref(), Some("1.5e+300"));
		assert_eq!(text(0.000_001).as_deref(), Some("0.000001"));
		assert_eq!(text(1e-7).as_deref(), Some("1e-7"));
		assert_eq!(text(-2.5e-8).as_deref(), Some("-2.5e-8"));
	}

	#[test]
	fn owned_and_borrowed_style_maps_agree() {
		let borrowed = V::style(&[("color", "white"), ("backgroundColor", "red")]);
		let owned = V::Style(vec![("color".to_owned(), "white".to_owned()), ("backgroundColor".to_owned(), "red".to_owned())].into());
		match (borrowed, owned) {
			(Value::Style(borrowed), Value::Style(owned)) => {
				assert_eq!(borrowed.len(), 2);
				assert!(borrowed.iter().eq(owned.iter()));
			}
			_ => unreachable!(),
		}
	}

	#[test]
	fn none_is_undefined() {
		assert!(V::from(None::<&str>).is_undefined());
		assert!(V::Function(()).to_attribute_string().is_none());
	}
}
