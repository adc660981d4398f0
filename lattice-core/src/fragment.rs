//! Structured render output.

use crate::markers::{CONTAINER_CLASS, INNER_CONTAINER_ATTR, TEMPLATE_ATTR};
use std::fmt;

/// A tree fragment produced by a template's render function.
///
/// Fragments are structured values, not markup strings: a [`Tree`] grafts
/// them without reparsing, and `Display` serializes them to markup for
/// out-of-tree string rendering.
///
/// [`Tree`]: crate::Tree
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Fragment {
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Fragment>,
}

impl Fragment {
    /// A fragment with the given tag and nothing else.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// A `div` container element bound to the given template.
    pub fn container(template: impl Into<String>) -> Self {
        Self::new("div")
            .class(CONTAINER_CLASS)
            .attr(TEMPLATE_ATTR, template)
    }

    /// Adds a class.
    pub fn class(mut self, name: impl Into<String>) -> Self {
        self.classes.push(name.into());
        self
    }

    /// Adds an attribute. Attributes render in insertion order.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Marks this element as an inner container eligible for partial
    /// re-render swaps.
    pub fn inner_container(self) -> Self {
        self.attr(INNER_CONTAINER_ATTR, "")
    }

    /// Sets the text content, rendered before any children.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Appends a child element.
    pub fn child(mut self, child: Fragment) -> Self {
        self.children.push(child);
        self
    }

    /// Tag name of this element.
    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    /// Classes of this element.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Attributes of this element, in insertion order.
    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    /// Text content of this element, if any.
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Child elements.
    pub fn children(&self) -> &[Fragment] {
        &self.children
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        if !self.classes.is_empty() {
            write!(f, " class=\"{}\"", self.classes.join(" "))?;
        }
        for (name, value) in &self.attrs {
            write!(f, " {name}=\"{value}\"")?;
        }
        write!(f, ">")?;
        if let Some(text) = &self.text {
            write!(f, "{text}")?;
        }
        for child in &self.children {
            write!(f, "{child}")?;
        }
        write!(f, "</{}>", self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_nested_markup() {
        let fragment = Fragment::container("card")
            .child(
                Fragment::new("div")
                    .inner_container()
                    .child(Fragment::new("span").text("hello")),
            );
        assert_eq!(
            fragment.to_string(),
            "<div class=\"ui-container\" data-template-name=\"card\">\
             <div data-container=\"\"><span>hello</span></div></div>"
        );
    }
}
