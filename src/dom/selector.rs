//! Selectors - The small subset of CSS selectors components need
//!
//! Grammar: a comma-separated list of compound selectors, each made of an
//! optional tag name followed by any number of `.class`, `[attr]` and
//! `[attr="value"]` parts. Combinators and pseudo-classes are not supported.
//!
//! ```ignore
//! let fields = SelectorList::parse("input[required], textarea[required]")?;
//! let close = SelectorList::from(Compound::any().with_attribute("data-modal-close"));
//! ```

use std::fmt;
use std::str::FromStr;

use super::node::Element;
use crate::error::{Error, Result, SelectorSnafu};

// =============================================================================
// TYPES
// =============================================================================

/// Attribute condition inside a compound selector
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeMatch {
    name: String,
    value: Option<String>,
}

/// A compound selector: `tag.class[attr]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
}

impl Compound {
    /// Matches every element.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn tag(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_ascii_lowercase()),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attribute(mut self, name: &str) -> Self {
        self.attributes.push(AttributeMatch {
            name: name.to_ascii_lowercase(),
            value: None,
        });
        self
    }

    pub fn with_attribute_value(mut self, name: &str, value: &str) -> Self {
        self.attributes.push(AttributeMatch {
            name: name.to_ascii_lowercase(),
            value: Some(value.to_string()),
        });
        self
    }

    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if element.tag() != tag {
                return false;
            }
        }
        if !self.classes.iter().all(|class| element.has_class(class)) {
            return false;
        }
        self.attributes.iter().all(|attr| match &attr.value {
            None => element.has_attribute(&attr.name),
            Some(value) => element.attribute(&attr.name) == Some(value.as_str()),
        })
    }
}

/// A comma-separated selector list. Matches if any compound matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorList(Vec<Compound>);

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self> {
        input.parse()
    }

    pub fn or(mut self, compound: Compound) -> Self {
        self.0.push(compound);
        self
    }

    pub fn matches(&self, element: &Element) -> bool {
        self.0.iter().any(|compound| compound.matches(element))
    }
}

impl From<Compound> for SelectorList {
    fn from(compound: Compound) -> Self {
        Self(vec![compound])
    }
}

impl FromIterator<Compound> for SelectorList {
    fn from_iter<I: IntoIterator<Item = Compound>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// PARSER
// =============================================================================

struct Parser<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn fail(&self, reason: impl fmt::Display) -> Error {
        SelectorSnafu {
            selector: self.source,
            reason: reason.to_string(),
        }
        .build()
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn ident(&mut self) -> Result<String> {
        let mut ident = String::new();
        while let Some((_, c)) = self
            .chars
            .next_if(|(_, c)| c.is_alphanumeric() || *c == '-' || *c == '_')
        {
            ident.push(c);
        }
        if ident.is_empty() {
            let found = self
                .chars
                .peek()
                .map_or("end of input".to_string(), |(i, c)| format!("{c:?} at {i}"));
            return Err(self.fail(format!("expected identifier, found {found}")));
        }
        Ok(ident)
    }

    fn quoted(&mut self, quote: char) -> Result<String> {
        let mut value = String::new();
        for (_, c) in self.chars.by_ref() {
            if c == quote {
                return Ok(value);
            }
            value.push(c);
        }
        Err(self.fail("unterminated string"))
    }

    fn attribute(&mut self, compound: Compound) -> Result<Compound> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();
        match self.chars.next() {
            Some((_, ']')) => Ok(compound.with_attribute(&name)),
            Some((_, '=')) => {
                self.skip_whitespace();
                let value = match self.chars.peek().copied() {
                    Some((_, quote @ ('"' | '\''))) => {
                        self.chars.next();
                        self.quoted(quote)?
                    }
                    _ => self.ident()?,
                };
                self.skip_whitespace();
                match self.chars.next() {
                    Some((_, ']')) => Ok(compound.with_attribute_value(&name, &value)),
                    _ => Err(self.fail("expected ']'")),
                }
            }
            Some((i, c)) => Err(self.fail(format!("unexpected {c:?} at {i}"))),
            None => Err(self.fail("unterminated attribute selector")),
        }
    }

    fn compound(&mut self) -> Result<Compound> {
        self.skip_whitespace();
        let mut parts = 0;
        let mut compound = match self.chars.peek().copied() {
            Some((_, '*')) => {
                self.chars.next();
                parts += 1;
                Compound::any()
            }
            Some((_, c)) if c.is_alphabetic() => {
                parts += 1;
                Compound::tag(&self.ident()?)
            }
            _ => Compound::any(),
        };
        loop {
            match self.chars.peek().copied() {
                Some((_, '.')) => {
                    self.chars.next();
                    compound = compound.with_class(&self.ident()?);
                }
                Some((_, '[')) => {
                    self.chars.next();
                    compound = self.attribute(compound)?;
                }
                _ => break,
            }
            parts += 1;
        }
        self.skip_whitespace();
        if parts == 0 {
            return Err(self.fail("empty selector"));
        }
        Ok(compound)
    }

    fn list(mut self) -> Result<SelectorList> {
        let mut list = Vec::new();
        loop {
            list.push(self.compound()?);
            match self.chars.next() {
                None => break,
                Some((_, ',')) => continue,
                Some((i, c)) => return Err(self.fail(format!("unexpected {c:?} at {i}"))),
            }
        }
        Ok(SelectorList(list))
    }
}

impl FromStr for SelectorList {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return SelectorSnafu {
                selector: input,
                reason: "empty selector",
            }
            .fail();
        }
        Parser::new(input).list()
    }
}

// =============================================================================
// TESTS
// =============================================================================
