//! Minimal delegation selectors.
//!
//! Container discovery and delegated event listeners only need conjunctions
//! of a tag name, classes, and attribute clauses (`button.primary[data-id=5]`),
//! so that is all this type carries. `*` matches every node.

use crate::error::SelectorError;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A parsed `tag.class[attr=value]` conjunction.
///
/// An empty selector (spelled `*`) has no constraints and matches everything.
/// The `Display` form is canonical: equal selectors render identically, which
/// makes it usable as part of a dedup key.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

/// The node facts a selector is matched against.
#[derive(Clone, Copy, Debug)]
pub struct NodeView<'a> {
    /// Tag name of the node.
    pub tag: &'a str,
    /// Classes carried by the node.
    pub classes: &'a [String],
    /// Attributes of the node.
    pub attrs: &'a HashMap<String, String>,
}

impl Selector {
    /// A selector with no constraints; matches every node.
    pub fn any() -> Self {
        Self::default()
    }

    /// Matches nodes with the given tag name.
    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            tag: Some(name.into()),
            ..Self::default()
        }
    }

    /// Matches nodes carrying the given class.
    pub fn class(name: impl Into<String>) -> Self {
        Self::default().and_class(name)
    }

    /// Matches nodes where the given attribute is present, whatever its value.
    pub fn attr(name: impl Into<String>) -> Self {
        Self::default().and_attr(name)
    }

    /// Matches nodes where the given attribute has exactly the given value.
    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::default().and_attr_eq(name, value)
    }

    /// Adds a class constraint.
    pub fn and_class(mut self, name: impl Into<String>) -> Self {
        self.classes.push(name.into());
        self
    }

    /// Adds an attribute-presence constraint.
    pub fn and_attr(mut self, name: impl Into<String>) -> Self {
        self.attrs.push((name.into(), None));
        self
    }

    /// Adds an attribute-equality constraint.
    pub fn and_attr_eq(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), Some(value.into())));
        self
    }

    /// Whether the node described by `view` satisfies every constraint.
    pub fn matches(&self, view: &NodeView<'_>) -> bool {
        if let Some(tag) = &self.tag {
            if view.tag != tag {
                return false;
            }
        }
        if !self.classes.iter().all(|c| view.classes.contains(c)) {
            return false;
        }
        self.attrs.iter().all(|(name, want)| match view.attrs.get(name) {
            Some(have) => want.as_ref().is_none_or(|w| w == have),
            None => false,
        })
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SelectorError::Empty);
        }
        if s == "*" {
            return Ok(Self::any());
        }

        let mut selector = Self::default();
        let mut chars = s.chars().peekable();

        let mut tag = String::new();
        while let Some(&c) = chars.peek() {
            if c == '.' || c == '[' {
                break;
            }
            tag.push(c);
            chars.next();
        }
        if !tag.is_empty() {
            selector.tag = Some(tag);
        }

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    let mut name = String::new();
                    while let Some(&c) = chars.peek() {
                        if c == '.' || c == '[' {
                            break;
                        }
                        name.push(c);
                        chars.next();
                    }
                    if name.is_empty() {
                        return Err(SelectorError::MissingName(s.to_owned()));
                    }
                    selector.classes.push(name);
                }
                '[' => {
                    let mut clause = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        clause.push(c);
                    }
                    if !closed {
                        return Err(SelectorError::UnterminatedAttribute(s.to_owned()));
                    }
                    match clause.split_once('=') {
                        Some((name, value)) => {
                            if name.is_empty() {
                                return Err(SelectorError::MissingName(s.to_owned()));
                            }
                            let value = value.trim_matches(|c| c == '"' || c == '\'');
                            selector.attrs.push((name.to_owned(), Some(value.to_owned())));
                        }
                        None => {
                            if clause.is_empty() {
                                return Err(SelectorError::MissingName(s.to_owned()));
                            }
                            selector.attrs.push((clause, None));
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(selector)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tag.is_none() && self.classes.is_empty() && self.attrs.is_empty() {
            return write!(f, "*");
        }
        if let Some(tag) = &self.tag {
            write!(f, "{tag}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        for (name, value) in &self.attrs {
            match value {
                Some(value) => write!(f, "[{name}={value}]")?,
                None => write!(f, "[{name}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(
        tag: &'a str,
        classes: &'a [String],
        attrs: &'a HashMap<String, String>,
    ) -> NodeView<'a> {
        NodeView { tag, classes, attrs }
    }

    #[test]
    fn parses_full_conjunction() {
        let sel: Selector = "button.primary[data-id=5]".parse().unwrap();
        assert_eq!(sel, Selector::tag("button").and_class("primary").and_attr_eq("data-id", "5"));
        assert_eq!(sel.to_string(), "button.primary[data-id=5]");
    }

    #[test]
    fn parses_star_and_rejects_empty() {
        assert_eq!("*".parse::<Selector>().unwrap(), Selector::any());
        assert_eq!("".parse::<Selector>(), Err(SelectorError::Empty));
        assert!(matches!(
            "div[open".parse::<Selector>(),
            Err(SelectorError::UnterminatedAttribute(_))
        ));
    }

    #[test]
    fn matching_checks_every_constraint() {
        let classes = vec!["primary".to_owned(), "wide".to_owned()];
        let mut attrs = HashMap::new();
        attrs.insert("data-id".to_owned(), "5".to_owned());

        let sel: Selector = "button.primary[data-id=5]".parse().unwrap();
        assert!(sel.matches(&view("button", &classes, &attrs)));
        assert!(!sel.matches(&view("a", &classes, &attrs)));
        assert!(!sel.matches(&view("button", &[], &attrs)));

        let presence = Selector::attr("data-id");
        assert!(presence.matches(&view("button", &classes, &attrs)));
        assert!(Selector::any().matches(&view("button", &[], &attrs)));
    }
}
