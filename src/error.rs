use thiserror::Error;

/// Everything that can go wrong while reconciling an element's attributes.
///
/// Errors are never swallowed: A skipped mutation would leave the live element out of sync with what was declared.
#[derive(Debug, Error)]
pub enum Error {
	/// The [`TreeCursor`](`crate::TreeCursor`) has no element open for attribute declarations.
	#[error("no element is open for attribute declarations")]
	NoCurrentElement,

	/// The value's kind can't be mapped to any mutation strategy for this name.
	///
	/// Currently this only happens for structured style mappings declared under a name other than `style`.
	#[error("no mutation strategy for the value declared as {name:?}")]
	UnsupportedValue { name: String },

	/// The declaration sequence disagrees with the reconciler's bookkeeping.
	///
	/// This is an internal-consistency fault of the calling tree cursor and isn't recoverable for the affected render pass.
	#[error("attribute record for {node} is inconsistent: {reason}")]
	InconsistentRecord { node: String, reason: String },

	/// The live tree rejected a mutation.
	#[error("{operation} failed for {name:?}: {message}")]
	Dom {
		operation: &'static str,
		name: String,
		message: String,
	},
}

impl Error {
	pub(crate) fn dom(operation: &'static str, name: &str, message: impl Into<String>) -> Self {
		Self::Dom {
			operation,
			name: name.to_owned(),
			message: message.into(),
		}
	}
}
