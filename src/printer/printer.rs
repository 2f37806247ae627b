use std::fmt;

use crate::ast::{Expression, ExpressionVisitor};
use crate::token::Token;

/// Pretty-prints assignments with two-space indentation per nesting level
/// (§4.7). Writes into any `fmt::Write` sink so it is unit-testable without
/// capturing process stdout; `Grammar::print` wraps this around a locked
/// stdout handle.
pub struct Printer<'w, W: fmt::Write> {
    out: &'w mut W,
    depth: usize,
}

impl<'w, W: fmt::Write> Printer<'w, W> {
    pub fn new(out: &'w mut W) -> Self {
        Self { out, depth: 0 }
    }

    pub fn print_all(&mut self, assignments: &[Expression]) -> fmt::Result {
        for assignment in assignments {
            self.depth = 0;
            assignment.accept(self)?;
        }
        Ok(())
    }

    fn line(&mut self, text: impl fmt::Display) -> fmt::Result {
        writeln!(self.out, "{}{}", "  ".repeat(self.depth), text)
    }

    fn indented(&mut self, body: impl FnOnce(&mut Self) -> fmt::Result) -> fmt::Result {
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }
}

impl<'w, W: fmt::Write> ExpressionVisitor<fmt::Result> for Printer<'w, W> {
    fn visit_terminal(&mut self, value: &str) -> fmt::Result {
        self.line(format!("TERMINAL \"{value}\""))
    }

    fn visit_nonterminal(&mut self, children: &[Expression]) -> fmt::Result {
        self.line("NONTERMINAL")?;
        self.indented(|printer| {
            for child in children {
                child.accept(printer)?;
            }
            Ok(())
        })
    }

    fn visit_variable(&mut self, name: &Token) -> fmt::Result {
        self.line(format!("VARIABLE {}", name.lexeme))
    }

    fn visit_or(&mut self, alternatives: &[Expression]) -> fmt::Result {
        self.line("OR [")?;
        self.indented(|printer| {
            for alternative in alternatives {
                alternative.accept(printer)?;
            }
            Ok(())
        })?;
        self.line("]")
    }

    fn visit_group(&mut self, inner: &Expression) -> fmt::Result {
        self.line("GROUP (")?;
        self.indented(|printer| inner.accept(printer))?;
        self.line(")")
    }

    fn visit_assignment(&mut self, name: &Token, body: &Expression) -> fmt::Result {
        self.line(format!("VARIABLE {}", name.lexeme))?;
        self.indented(|printer| body.accept(printer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn print(src: &str) -> String {
        let tokens = Lexer::new(src).scan_tokens().unwrap();
        let assignments = Parser::new(tokens).parse().unwrap();
        let mut out = String::new();
        Printer::new(&mut out).print_all(&assignments).unwrap();
        out
    }

    #[test]
    fn prints_a_terminal_assignment() {
        let out = print("<d> ::= \"1\"\n");
        assert_eq!(out, "VARIABLE <d>\n  TERMINAL \"1\"\n");
    }

    #[test]
    fn prints_nested_or_and_nonterminal_with_reset_indentation() {
        let out = print("<a> ::= \"x\" | \"y\"\n<b> ::= \"p\" \"q\"\n");
        let expected = "VARIABLE <a>\n  OR [\n    TERMINAL \"x\"\n    TERMINAL \"y\"\n  ]\nVARIABLE <b>\n  NONTERMINAL\n    TERMINAL \"p\"\n    TERMINAL \"q\"\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn prints_a_group_and_a_variable_reference() {
        let out = print("<a> ::= (\"x\")\n<b> ::= <a>\n");
        let expected = "VARIABLE <a>\n  GROUP (\n    TERMINAL \"x\"\n  )\nVARIABLE <b>\n  VARIABLE <a>\n";
        assert_eq!(out, expected);
    }
}
