use crate::dom::TreeCursor;

/// A minimal [`TreeCursor`]: A stack of open elements that derives SVG context from tag names.
///
/// An element is in SVG context if it is an `svg` element or a child of an element in SVG context,
/// except below `foreignObject`, where HTML resumes.
#[derive(Debug, Clone)]
pub struct ElementStack<N> {
	open: Vec<Open<N>>,
}

#[derive(Debug, Clone, Copy)]
struct Open<N> {
	node: N,
	svg: bool,
	svg_children: bool,
}

impl<N> Default for ElementStack<N> {
	fn default() -> Self {
		Self { open: Vec::new() }
	}
}

impl<N: Copy> ElementStack<N> {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn open(&mut self, node: N, tag: &str) {
		let svg = tag == "svg" || self.open.last().map_or(false, |parent| parent.svg_children);
		self.open.push(Open {
			node,
			svg,
			svg_children: svg && tag != "foreignObject",
		});
	}

	/// Closes the innermost open element and returns it.
	pub fn close(&mut self) -> Option<N> {
		self.open.pop().map(|open| open.node)
	}

	#[must_use]
	pub fn depth(&self) -> usize {
		self.open.len()
	}
}

impl<N: Copy> TreeCursor for ElementStack<N> {
	type Node = N;

	fn current_element(&self) -> Option<N> {
		self.open.last().map(|open| open.node)
	}

	fn is_svg_context(&self) -> bool {
		self.open.last().map_or(false, |open| open.svg)
	}
}
