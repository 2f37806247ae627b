use indexmap::IndexMap;

use crate::ast::{Expression, ExpressionVisitor};
use crate::error::BnfError;
use crate::token::Token;

/// Name → body mapping built by the resolver, insertion order preserved.
/// Keyed by full token equality (kind + lexeme + literal).
#[derive(Debug, Clone, Default)]
pub struct Environment(IndexMap<Token, Expression>);

impl Environment {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, name: Token, body: Expression) -> Option<Expression> {
        self.0.insert(name, body)
    }

    pub fn contains_key(&self, name: &Token) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &Token) -> Option<&Expression> {
        self.0.get(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Token> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Two-pass reference checker (§4.3): pass 1 binds every top-level rule name
/// to its body (forward references allowed, redefinitions rejected); pass 2
/// walks every expression and requires each `Variable` to resolve.
pub struct Resolver {
    first_pass: bool,
    environment: Environment,
}

impl Resolver {
    pub fn new() -> Self {
        Self { first_pass: false, environment: Environment::new() }
    }

    pub fn resolve(mut self, assignments: &[Expression]) -> Result<Environment, BnfError> {
        self.first_pass = true;
        for assignment in assignments {
            assignment.accept(&mut self)?;
        }

        self.first_pass = false;
        for assignment in assignments {
            assignment.accept(&mut self)?;
        }

        Ok(self.environment)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionVisitor<Result<(), BnfError>> for Resolver {
    fn visit_terminal(&mut self, _value: &str) -> Result<(), BnfError> {
        Ok(())
    }

    fn visit_nonterminal(&mut self, children: &[Expression]) -> Result<(), BnfError> {
        for child in children {
            child.accept(self)?;
        }
        Ok(())
    }

    fn visit_variable(&mut self, name: &Token) -> Result<(), BnfError> {
        if self.first_pass {
            return Ok(());
        }

        if !self.environment.contains_key(name) {
            return Err(BnfError::resolver(name.line, format!("Undefined variable {}", name.lexeme)));
        }

        Ok(())
    }

    fn visit_or(&mut self, alternatives: &[Expression]) -> Result<(), BnfError> {
        for alternative in alternatives {
            alternative.accept(self)?;
        }
        Ok(())
    }

    fn visit_group(&mut self, inner: &Expression) -> Result<(), BnfError> {
        inner.accept(self)
    }

    fn visit_assignment(&mut self, name: &Token, body: &Expression) -> Result<(), BnfError> {
        if self.first_pass && self.environment.contains_key(name) {
            return Err(BnfError::resolver(name.line, format!("{} already defined", name.lexeme)));
        }

        self.environment.insert(name.clone(), body.clone());
        body.accept(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn resolve(src: &str) -> Result<Environment, BnfError> {
        let tokens = Lexer::new(src).scan_tokens().unwrap();
        let assignments = Parser::new(tokens).parse().unwrap();
        Resolver::new().resolve(&assignments)
    }

    #[test]
    fn binds_forward_references() {
        let env = resolve("<number> ::= <digit>\n<digit> ::= \"1\"\n").unwrap();
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn rejects_redefinition() {
        let err = resolve("<d> ::= \"a\"\n<d> ::= \"b\"\n").unwrap_err();
        assert!(matches!(err, BnfError::Resolver { .. }));
    }

    #[test]
    fn rejects_undefined_variable() {
        let err = resolve("<b> ::= <a>\n").unwrap_err();
        assert!(matches!(err, BnfError::Resolver { .. }));
    }

    #[test]
    fn permits_cyclic_references() {
        assert!(resolve("<x> ::= <x> | \"a\"\n").is_ok());
    }
}
