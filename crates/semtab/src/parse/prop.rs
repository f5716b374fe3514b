use std::iter::Peekable;

use crate::{
    logic::Formula,
    parse::{ParseErr, ParseResult, Token, TokenKind, Tokenizer},
};

/// Parses a propositional formula. Precedence, loosest first: `->` (right
/// associative), `|`, `&`, `!`; `true`/`false` are the constants.
pub fn parse_prop_formula(formula: &str) -> ParseResult<Formula> {
    PropParser::parse(formula)
}

pub struct PropParser<'t> {
    tokens: Peekable<Tokenizer<'t>>,
}

impl<'f> PropParser<'f> {
    pub fn parse(formula: &'f str) -> ParseResult<Formula> {
        let mut parser = PropParser {
            tokens: Tokenizer::new(formula).peekable(),
        };
        if parser.tokens.peek().is_none() {
            return Err(ParseErr::EmptyFormula);
        }
        let node = parser.parse_impl()?;
        match parser.tokens.next() {
            Some(_) => Err(ParseErr::Expected(
                "end of input".to_string(),
                parser.got_msg(),
            )),
            None => Ok(node),
        }
    }

    fn parse_impl(&mut self) -> ParseResult<Formula> {
        let stub = self.parse_or()?;

        if self.next_is(TokenKind::Impl) {
            self.bump()?;
            let right = self.parse_impl()?;
            Ok(Formula::implies(stub, right))
        } else {
            Ok(stub)
        }
    }

    fn parse_or(&mut self) -> ParseResult<Formula> {
        let mut stub = self.parse_and()?;

        while self.next_is(TokenKind::Or) {
            self.bump()?;
            let right = self.parse_and()?;
            stub = Formula::or(stub, right);
        }

        Ok(stub)
    }

    fn parse_and(&mut self) -> ParseResult<Formula> {
        let mut stub = self.parse_not()?;

        while self.next_is(TokenKind::And) {
            self.bump()?;
            let right = self.parse_not()?;
            stub = Formula::and(stub, right);
        }

        Ok(stub)
    }

    fn parse_not(&mut self) -> ParseResult<Formula> {
        if self.next_is(TokenKind::Not) {
            self.bump()?;
            Ok(Formula::not(self.parse_not()?))
        } else {
            self.parse_paren()
        }
    }

    fn parse_paren(&mut self) -> ParseResult<Formula> {
        if self.next_is(TokenKind::LParen) {
            self.bump()?;
            let exp = self.parse_impl()?;
            self.eat(TokenKind::RParen)?;
            Ok(exp)
        } else {
            self.parse_atom()
        }
    }

    fn parse_atom(&mut self) -> ParseResult<Formula> {
        let token = self.cur_token()?;
        let exp = match token.kind {
            TokenKind::True => Formula::Top,
            TokenKind::False => Formula::Bot,
            TokenKind::Ident => Formula::var(token.spelling),
            _ => {
                return Err(ParseErr::Expected(
                    "identifier or constant".to_string(),
                    self.got_msg(),
                ))
            }
        };
        self.bump()?;
        Ok(exp)
    }

    fn next_is(&mut self, expected: TokenKind) -> bool {
        match self.tokens.peek() {
            Some(Ok(Token { kind, .. })) => *kind == expected,
            _ => false,
        }
    }

    fn bump(&mut self) -> ParseResult<()> {
        match self.tokens.next() {
            Some(_) => Ok(()),
            None => Err(ParseErr::Expected(
                "token".to_string(),
                "end of input".to_string(),
            )),
        }
    }

    fn eat(&mut self, expected: TokenKind) -> ParseResult<()> {
        if self.next_is(expected) {
            self.bump()
        } else {
            Err(ParseErr::Expected(expected.to_string(), self.got_msg()))
        }
    }

    fn got_msg(&mut self) -> String {
        match self.tokens.peek() {
            Some(Ok(t)) => format!("{} at position {}", t, t.src_pos),
            _ => "end of input".to_string(),
        }
    }

    fn cur_token(&mut self) -> ParseResult<Token<'f>> {
        match self.tokens.peek() {
            Some(Ok(t)) => Ok(*t),
            Some(Err(e)) => Err(e.clone()),
            None => Err(ParseErr::Expected(
                "token".to_string(),
                "end of input".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_map {
        ($func:ident, $( $f:expr, $e:expr );*) => {{
            $(
                let n = $func($f).expect($f);
                assert_eq!($e, n.to_string());
            )*
        }};
    }

    macro_rules! test_list_invalid {
        ($func:ident, $( $f:expr ),*) => {{
            $(
                let res = $func($f);
                assert!(res.is_err(), "f: {}\nparsed: {:?}", $f, res);
            )*
        }};
    }

    #[test]
    fn prop_valid() {
        test_map!(
            parse_prop_formula,
            "a", "a";
            "!a", "¬a";
            "!!a", "¬¬a";
            "a -> b", "a -> b";
            "a-> b", "a -> b";
            "a    ->b", "a -> b";
            "a->b->c", "a -> b -> c";
            "(a->b)->c", "(a -> b) -> c";
            "a & b | c", "(a ∧ b) ∨ c";
            "a | b & c", "a ∨ (b ∧ c)";
            "!(a | b) & c", "¬(a ∨ b) ∧ c";
            "false -> true", "⊥ -> ⊤";
            "!false", "¬⊥";
            "trueish & true", "trueish ∧ ⊤"
        );
    }

    #[test]
    fn prop_invalid() {
        test_list_invalid!(
            parse_prop_formula,
            "",
            "   ",
            "->a",
            "a!",
            "a->",
            "a &",
            "(a&b",
            "a|b)",
            "a b",
            "a <-> b",
            "a # b",
            "&"
        );
    }

    #[test]
    fn parses_to_expected_structure() {
        assert_eq!(
            Formula::implies(
                Formula::var("p"),
                Formula::implies(Formula::var("q"), Formula::var("p"))
            ),
            parse_prop_formula("p -> q -> p").unwrap()
        );
        assert_eq!(
            Formula::not(Formula::not(Formula::Bot)),
            parse_prop_formula("!!false").unwrap()
        );
    }
}
