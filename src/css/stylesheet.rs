//! Class-selector index over a raw stylesheet.
//!
//! Only rules whose selector is a lone class (`.c3`, possibly inside a comma
//! list) are kept; that is the shape of every text style in a Docs export.

use std::collections::HashMap;

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser, Token,
};

/// A CSS declaration with its value kept as source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

/// Declarations of every single-class rule, keyed by class name.
#[derive(Debug, Default, Clone)]
pub struct ClassIndex {
    classes: HashMap<String, Vec<Declaration>>,
}

impl ClassIndex {
    /// Parse stylesheet text. Malformed rules are skipped.
    pub fn parse(css: &str) -> Self {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut index = ClassIndex::default();

        let mut rule_parser = TopLevelRuleParser { index: &mut index };
        for result in StyleSheetParser::new(&mut parser, &mut rule_parser) {
            let _ = result;
        }

        index
    }

    /// Declarations for `class`, in source order across all its rules.
    pub fn declarations(&self, class: &str) -> Option<&[Declaration]> {
        self.classes.get(class).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

struct TopLevelRuleParser<'a> {
    index: &'a mut ClassIndex,
}

impl<'i> AtRuleParser<'i> for TopLevelRuleParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        // @import and @media carry no class styles in Docs exports
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for TopLevelRuleParser<'_> {
    type Prelude = Vec<String>;
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let mut classes = Vec::new();
        let mut selector: Vec<Token<'i>> = Vec::new();

        while let Ok(token) = input.next_including_whitespace() {
            match token {
                Token::Comma => {
                    push_single_class(&selector, &mut classes);
                    selector.clear();
                }
                other => selector.push(other.clone()),
            }
        }
        push_single_class(&selector, &mut classes);

        Ok(classes)
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let mut declarations = Vec::new();
        let mut decl_parser = DeclarationListParser {
            declarations: &mut declarations,
        };

        for result in RuleBodyParser::new(input, &mut decl_parser) {
            let _ = result;
        }

        for class in prelude {
            self.index
                .classes
                .entry(class)
                .or_default()
                .extend(declarations.iter().cloned());
        }

        Ok(())
    }
}

/// Record `selector` if it is exactly `.name`.
fn push_single_class(selector: &[Token<'_>], classes: &mut Vec<String>) {
    let significant: Vec<&Token<'_>> = selector
        .iter()
        .filter(|t| !matches!(t, Token::WhiteSpace(_) | Token::Comment(_)))
        .collect();

    if let [Token::Delim('.'), Token::Ident(name)] = significant.as_slice() {
        classes.push(name.to_string());
    }
}

struct DeclarationListParser<'a> {
    declarations: &'a mut Vec<Declaration>,
}

impl<'i> AtRuleParser<'i> for DeclarationListParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for DeclarationListParser<'_> {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();
}

impl<'i> DeclarationParser<'i> for DeclarationListParser<'_> {
    type Declaration = ();
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next().is_ok() {}
        let raw = input.slice_from(start);
        let value = raw
            .trim()
            .trim_end_matches("!important")
            .trim()
            .to_ascii_lowercase();

        self.declarations.push(Declaration {
            property: name.to_ascii_lowercase(),
            value,
        });

        Ok(())
    }
}

impl<'i> RuleBodyItemParser<'i, (), ()> for DeclarationListParser<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}
