use std::io::{self, Write as _};

use crate::ast::Expression;
use crate::error::BnfError;
use crate::generator::Generator;
use crate::input::{DerivationTree, InputParser};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::printer::Printer;
use crate::resolver::{Environment, Resolver};
use crate::token::Token;

/// A fully lexed, parsed, and resolved grammar with a chosen start rule
/// (§6). Holds no interior mutability, so an immutable `Grammar` can be
/// shared across concurrent `generate`/`parse_input` calls (§5).
#[derive(Debug, Clone)]
pub struct Grammar {
    assignments: Vec<Expression>,
    environment: Environment,
    start_name: Token,
    start_body: Expression,
}

/// Runs lex → parse → resolve over `source` and defaults the start rule to
/// the first assignment. Fails outright on the first error from any stage;
/// no partial grammar is ever returned (§6).
pub fn parse(source: &str) -> Result<Grammar, BnfError> {
    let tokens = Lexer::new(source).scan_tokens()?;
    let assignments = Parser::new(tokens).parse()?;
    let environment = Resolver::new().resolve(&assignments)?;
    let (start_name, start_body) = first_assignment(&assignments)?;

    Ok(Grammar { assignments, environment, start_name, start_body })
}

fn first_assignment(assignments: &[Expression]) -> Result<(Token, Expression), BnfError> {
    match assignments.first() {
        Some(Expression::Assignment { name, body }) => Ok((name.clone(), (**body).clone())),
        _ => Err(BnfError::core("Grammar has no assignments")),
    }
}

impl Grammar {
    /// Selects the start rule by name, or defaults to the first assignment
    /// when `name` is `None` or empty. Fails if the named rule is not bound
    /// in the environment.
    pub fn set_start(mut self, name: Option<&str>) -> Result<Self, BnfError> {
        match name {
            None | Some("") => {
                let (start_name, start_body) = first_assignment(&self.assignments)?;
                self.start_name = start_name;
                self.start_body = start_body;
            }
            Some(name) => {
                let key = Token::identifier_key(name);
                let body = self
                    .environment
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| BnfError::core(format!("{name} is not in the environment")))?;
                self.start_name = key;
                self.start_body = body;
            }
        }

        Ok(self)
    }

    /// One random sample from the start rule, or the empty string on
    /// failure (§4.4, §6).
    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        Generator::new(&self.environment, &mut rng).generate(&self.start_body)
    }

    /// Matches `input` against the start rule, returning a witnessing
    /// derivation tree on success (§4.5, §6).
    pub fn parse_input(&self, input: &str) -> Option<DerivationTree> {
        InputParser::new(input, &self.environment).parse_input(&self.start_name.lexeme, &self.start_body)
    }

    /// Pretty-prints every assignment to stdout (§4.7, §6).
    pub fn print(&self) {
        let mut buffer = String::new();
        Printer::new(&mut buffer).print_all(&self.assignments).expect("writing to a String cannot fail");

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        let _ = handle.write_all(buffer.as_bytes());
    }
}
