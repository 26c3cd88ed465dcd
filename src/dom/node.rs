//! Node data stored in the document arena.

use crate::types::Rect;

/// Arena payload for one node
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element(Element),
    Text(String),
}

impl NodeData {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// An element: tag, attributes, inline style, form value and geometry.
///
/// Classes live in the `class` attribute. Inline styles are kept apart from
/// the `style` attribute as parsed property/value pairs.
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    value: String,
    rect: Rect,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((name, value.to_string())),
        }
    }

    /// Returns true if the attribute existed.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self.attributes.len() != before
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    // -------------------------------------------------------------------------
    // Classes
    // -------------------------------------------------------------------------

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut classes: Vec<&str> = self.classes().collect();
        classes.push(class);
        let joined = classes.join(" ");
        self.set_attribute("class", &joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let joined = self
            .classes()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute("class", &joined);
    }

    /// Add the class when `on` is true, remove it otherwise.
    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    // -------------------------------------------------------------------------
    // Inline style
    // -------------------------------------------------------------------------

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value.as_str())
    }

    /// Setting an empty value removes the property.
    pub fn set_style(&mut self, property: &str, value: &str) {
        if value.is_empty() {
            self.remove_style(property);
            return;
        }
        match self.style.iter_mut().find(|(key, _)| key == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.style.push((property.to_string(), value.to_string())),
        }
    }

    pub fn remove_style(&mut self, property: &str) {
        self.style.retain(|(key, _)| key != property);
    }

    // -------------------------------------------------------------------------
    // Form state and geometry
    // -------------------------------------------------------------------------

    /// Current value of a form control.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    /// Lowercased `type` attribute. Inputs default to `text`, buttons to `submit`.
    pub fn input_type(&self) -> String {
        match self.attribute("type") {
            Some(kind) => kind.to_ascii_lowercase(),
            None if self.tag == "button" => "submit".to_string(),
            None => "text".to_string(),
        }
    }

    pub fn is_form_control(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "textarea" | "select" | "button")
    }

    pub fn is_disabled(&self) -> bool {
        self.is_form_control() && self.has_attribute("disabled")
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list() {
        let mut element = Element::new("div");
        element.add_class("modal");
        element.add_class("modal--open");
        element.add_class("modal");
        assert_eq!(element.attribute("class"), Some("modal modal--open"));

        element.toggle_class("modal--open", false);
        assert!(!element.has_class("modal--open"));
        assert!(element.has_class("modal"));
    }

    #[test]
    fn test_attributes_are_case_insensitive() {
        let mut element = Element::new("INPUT");
        element.set_attribute("Required", "");
        assert_eq!(element.tag(), "input");
        assert!(element.has_attribute("required"));
        assert!(element.remove_attribute("REQUIRED"));
        assert!(!element.has_attribute("required"));
    }

    #[test]
    fn test_input_type_defaults() {
        assert_eq!(Element::new("input").input_type(), "text");
        assert_eq!(Element::new("button").input_type(), "submit");

        let mut email = Element::new("input");
        email.set_attribute("type", "EMAIL");
        assert_eq!(email.input_type(), "email");
    }

    #[test]
    fn test_disabled_only_applies_to_form_controls() {
        let mut link = Element::new("a");
        link.set_attribute("disabled", "");
        assert!(!link.is_disabled());

        let mut button = Element::new("button");
        button.set_attribute("disabled", "");
        assert!(button.is_disabled());
    }

    #[test]
    fn test_style_empty_value_removes() {
        let mut body = Element::new("body");
        body.set_style("overflow", "hidden");
        assert_eq!(body.style("overflow"), Some("hidden"));
        body.set_style("overflow", "");
        assert_eq!(body.style("overflow"), None);
    }
}
