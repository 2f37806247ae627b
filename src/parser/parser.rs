use crate::ast::Expression;
use crate::error::BnfError;
use crate::token::{Token, TokenKind};

/// Recursive-descent parser for the grammar productions in §4.2:
///
/// ```text
/// program    := { EOL } { assignment { EOL } }
/// assignment := IDENTIFIER ASSIGN or
/// or         := concat { PIPE concat }
/// concat     := primary { primary }      -- stops at EOL, PIPE, or RIGHT_PAREN
/// primary    := STRING | EOL_VAR | IDENTIFIER | LEFT_PAREN or RIGHT_PAREN
/// ```
///
/// All-or-nothing: the first parser error aborts the whole parse.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    pub fn parse(mut self) -> Result<Vec<Expression>, BnfError> {
        let mut assignments = Vec::new();

        while !self.is_at_end() {
            if self.match_kind(TokenKind::Eol) {
                continue;
            }

            assignments.push(self.assignment()?);
        }

        Ok(assignments)
    }

    fn assignment(&mut self) -> Result<Expression, BnfError> {
        let name = self.consume(TokenKind::Identifier, "Expected an identifier")?;
        self.consume(TokenKind::Assign, "Expected '::='")?;
        let body = self.or_expression()?;
        Ok(Expression::assignment(name, body))
    }

    fn or_expression(&mut self) -> Result<Expression, BnfError> {
        let mut alternatives = vec![self.concat()?];

        while self.match_kind(TokenKind::Pipe) {
            alternatives.push(self.concat()?);
        }

        if alternatives.len() == 1 {
            Ok(alternatives.pop().unwrap())
        } else {
            Ok(Expression::Or { alternatives })
        }
    }

    fn concat(&mut self) -> Result<Expression, BnfError> {
        let mut children = Vec::new();

        while !self.is_at_end()
            && !self.check(TokenKind::Eol)
            && !self.check(TokenKind::Pipe)
            && !self.check(TokenKind::RightParen)
        {
            children.push(self.primary()?);
        }

        if children.is_empty() {
            return Err(BnfError::parser_token(self.peek(), "Expected values"));
        }

        if children.len() == 1 {
            Ok(children.pop().unwrap())
        } else {
            Ok(Expression::NonTerminal { children })
        }
    }

    fn primary(&mut self) -> Result<Expression, BnfError> {
        if self.match_kind(TokenKind::String) || self.match_kind(TokenKind::EolVar) {
            let literal = self.previous().literal.clone().unwrap_or_default();
            return Ok(Expression::Terminal { value: literal });
        }

        if self.match_kind(TokenKind::LeftParen) {
            let inner = self.or_expression()?;
            self.consume(TokenKind::RightParen, "Expected ')'")?;

            // `((...))` flattens to one `Group`, not nested groups (§3 invariant 3).
            if matches!(inner, Expression::Group { .. }) {
                return Ok(inner);
            }
            return Ok(Expression::group(inner));
        }

        if self.match_kind(TokenKind::Identifier) {
            return Ok(Expression::Variable { name: self.previous().clone() });
        }

        Err(BnfError::parser_token(self.peek(), "Expected expression"))
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, BnfError> {
        if self.check(kind) {
            self.current += 1;
            Ok(self.previous().clone())
        } else {
            Err(BnfError::parser_token(self.peek(), message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(src: &str) -> Result<Vec<Expression>, BnfError> {
        let tokens = Lexer::new(src).scan_tokens()?;
        Parser::new(tokens).parse()
    }

    #[test]
    fn collapses_singleton_or_and_concat() {
        let expressions = parse("<d> ::= \"1\"\n").unwrap();
        assert_eq!(expressions.len(), 1);
        match &expressions[0] {
            Expression::Assignment { body, .. } => {
                assert!(matches!(**body, Expression::Terminal { .. }));
            }
            _ => panic!("expected an assignment"),
        }
    }

    #[test]
    fn builds_or_and_nonterminal() {
        let expressions = parse("<list> ::= \"[\" \"]\" | \"x\"\n").unwrap();
        match &expressions[0] {
            Expression::Assignment { body, .. } => match &**body {
                Expression::Or { alternatives } => {
                    assert_eq!(alternatives.len(), 2);
                    assert!(matches!(alternatives[0], Expression::NonTerminal { .. }));
                    assert!(matches!(alternatives[1], Expression::Terminal { .. }));
                }
                other => panic!("expected Or, got {other:?}"),
            },
            _ => panic!("expected an assignment"),
        }
    }

    #[test]
    fn group_wraps_an_or() {
        let expressions = parse("<x> ::= (\"a\" | \"b\")\n").unwrap();
        match &expressions[0] {
            Expression::Assignment { body, .. } => {
                assert!(matches!(**body, Expression::Group { .. }));
            }
            _ => panic!("expected an assignment"),
        }
    }

    #[test]
    fn nested_parens_flatten_to_one_group() {
        let expressions = parse("<x> ::= ((\"b\"))\n").unwrap();
        match &expressions[0] {
            Expression::Assignment { body, .. } => match &**body {
                Expression::Group { inner } => assert!(matches!(**inner, Expression::Terminal { .. })),
                other => panic!("expected Group, got {other:?}"),
            },
            _ => panic!("expected an assignment"),
        }
    }

    #[test]
    fn missing_close_paren_is_an_error() {
        assert!(parse("<b> ::= (((((\"b\"))))\n").is_err());
    }

    #[test]
    fn empty_alternative_is_an_error() {
        assert!(parse("<b> ::= \"a\" | \n").is_err());
    }

    #[test]
    fn missing_assign_is_an_error() {
        assert!(parse("<b> \"a\"\n").is_err());
    }
}
