//! Inline style helpers shared by the reconciler and [`MemoryDom`](`crate::memory::MemoryDom`).

use std::borrow::Cow;

/// Maps a camel-case-like style mapping key to its CSS property name.
///
/// `backgroundColor` becomes `background-color`, `WebkitTransform` and `msTransform` get their leading vendor dash.
/// Custom properties (`--x`) and names that are already hyphenated pass through unchanged.
#[must_use]
pub fn css_property_name(key: &str) -> Cow<'_, str> {
	if key.starts_with("--") || !key.bytes().any(|b| b.is_ascii_uppercase()) {
		return Cow::Borrowed(key);
	}

	let mut css = String::with_capacity(key.len() + 4);
	if key.starts_with("ms") {
		css.push('-');
	}
	for c in key.chars() {
		if c.is_ascii_uppercase() {
			css.push('-');
			css.push(c.to_ascii_lowercase());
		} else {
			css.push(c);
		}
	}
	Cow::Owned(css)
}

/// Splits a declaration string like `"color: white; background-color: red;"` into trimmed `(property, value)` pairs.
///
/// Empty and malformed declarations (without `:`) are ignored. Property names are ASCII-lowercased, later duplicates win.
pub fn parse_declarations(text: &str) -> impl Iterator<Item = (String, &str)> {
	text.split(';').filter_map(|declaration| {
		let (property, value) = declaration.split_once(':')?;
		let property = property.trim();
		let value = value.trim();
		if property.is_empty() || value.is_empty() {
			None
		} else {
			let property = if property.starts_with("--") {
				property.to_owned()
			} else {
				property.to_ascii_lowercase()
			};
			Some((property, value))
		}
	})
}

#[cfg(test)]
mod tests {
	use super::{css_property_name, parse_declarations};

	#[test]
	fn camel_case() {
		assert_eq!(css_property_name("color"), "color");
		assert_eq!(css_property_name("backgroundColor"), "background-color");
		assert_eq!(css_property_name("borderTopLeftRadius"), "border-top-left-radius");
		assert_eq!(css_property_name("WebkitTransform"), "-webkit-transform");
		assert_eq!(css_property_name("msTransform"), "-ms-transform");
		assert_eq!(css_property_name("--mainColor"), "--mainColor");
		assert_eq!(css_property_name("background-color"), "background-color");
	}

	#[test]
	fn declarations() {
		let parsed: Vec<_> = parse_declarations("color: white; background-color: red;").collect();
		assert_eq!(parsed, vec![("color".to_owned(), "white"), ("background-color".to_owned(), "red")]);

		let parsed: Vec<_> = parse_declarations(" ; nonsense ;COLOR:blue").collect();
		assert_eq!(parsed, vec![("color".to_owned(), "blue")]);
	}
}
