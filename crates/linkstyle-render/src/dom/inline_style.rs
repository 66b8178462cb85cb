//! The parsed `style` attribute of an element.
//!
//! Declarations are parsed with `cssparser` (the tokenizer used by Firefox) so
//! comments, escapes and nested functions such as `rgba(...)` are handled the
//! way a browser would. Values are kept as source text; this is not a CSS
//! engine and nothing is computed from them.

use std::fmt;

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
};

/// One `property: value [!important]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// Ordered inline declarations. Setting an existing property replaces it in
/// place, so serialization order is first-set order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<Declaration>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the text of a `style` attribute. Invalid declarations are
    /// skipped, as browsers do.
    pub fn parse(text: &str) -> Self {
        let mut input = ParserInput::new(text);
        let mut parser = Parser::new(&mut input);
        let mut decl_parser = InlineDeclarationParser;

        let mut style = InlineStyle::new();
        for decl in RuleBodyParser::new(&mut parser, &mut decl_parser).flatten() {
            style.set(&decl.property, &decl.value, decl.important);
        }
        style
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.find(property).map(|d| d.value.as_str())
    }

    pub fn is_important(&self, property: &str) -> bool {
        self.find(property).is_some_and(|d| d.important)
    }

    pub fn set(&mut self, property: &str, value: &str, important: bool) {
        let property = property.to_ascii_lowercase();
        match self.declarations.iter_mut().find(|d| d.property == property) {
            Some(existing) => {
                existing.value = value.to_string();
                existing.important = important;
            }
            None => self.declarations.push(Declaration {
                property,
                value: value.to_string(),
                important,
            }),
        }
    }

    /// Removes `property`, returning whether it was present.
    pub fn remove(&mut self, property: &str) -> bool {
        let before = self.declarations.len();
        self.declarations
            .retain(|d| !d.property.eq_ignore_ascii_case(property));
        before != self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    fn find(&self, property: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .find(|d| d.property.eq_ignore_ascii_case(property))
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.declarations.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}: {}", d.property, d.value)?;
            if d.important {
                write!(f, " !important")?;
            }
            write!(f, ";")?;
        }
        Ok(())
    }
}

struct InlineDeclarationParser;

impl<'i> DeclarationParser<'i> for InlineDeclarationParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next_including_whitespace().is_ok() {}
        let raw = input.slice_from(start).trim();

        let (value, important) = split_important(raw);
        if value.is_empty() {
            return Err(input.new_custom_error::<(), ()>(()));
        }

        Ok(Declaration {
            property: name.as_ref().to_ascii_lowercase(),
            value: value.to_string(),
            important,
        })
    }
}

impl<'i> AtRuleParser<'i> for InlineDeclarationParser {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for InlineDeclarationParser {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, Declaration, ()> for InlineDeclarationParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

fn split_important(raw: &str) -> (&str, bool) {
    if let Some(bang) = raw.rfind('!') {
        if raw[bang + 1..].trim().eq_ignore_ascii_case("important") {
            return (raw[..bang].trim_end(), true);
        }
    }
    (raw, false)
}
