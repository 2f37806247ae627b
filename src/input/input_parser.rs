use indexmap::IndexMap;

use crate::ast::Expression;
use crate::error::BnfError;
use crate::input::input::Input;
use crate::input::node::NodeKind;
use crate::input::tree::DerivationTree;
use crate::resolver::Environment;
use crate::token::Token;

/// Matches an input string against the grammar and builds a derivation tree
/// (§4.5). Recursive descent with longest-match alternation: each `Or`
/// alternative is attempted against a fresh side-tree pushed onto `trees`;
/// only the alternative that matches *and* advances the input cursor the
/// farthest survives, and its side-tree is grafted into the enclosing tree —
/// so backtracking never deep-copies the whole committed tree, only the
/// (small) winning subtree once it is known.
pub struct InputParser<'a> {
    input: Input<'a>,
    environment: &'a Environment,
    visited: IndexMap<Token, bool>,
    trees: Vec<DerivationTree>,
}

impl<'a> InputParser<'a> {
    pub fn new(source: &'a str, environment: &'a Environment) -> Self {
        let visited = environment.keys().map(|name| (name.clone(), false)).collect();

        Self { input: Input::new(source), environment, visited, trees: vec![DerivationTree::new()] }
    }

    fn reset_visited(&mut self) {
        for matched in self.visited.values_mut() {
            *matched = false;
        }
    }

    fn active(&mut self) -> &mut DerivationTree {
        self.trees.last_mut().expect("the tree stack is never empty")
    }

    /// Entry point (§4.5 "Entry point"): reset state, push a single
    /// `VARIABLE` node for the start rule's name, then dispatch the start
    /// expression transparently (an `Assignment` or bare `Variable`, both of
    /// which forward to their body without pushing a second node for the
    /// same name). Succeeds iff the whole input is consumed.
    pub fn parse_input(mut self, start_name: &str, start_body: &'a Expression) -> Option<DerivationTree> {
        self.input.reset();
        self.trees[0].reset();
        self.trees[0].add_and_forward(NodeKind::Variable, start_name);

        match self.dispatch(start_body) {
            Ok(true) if self.input.is_full_match() => Some(self.trees.remove(0)),
            _ => None,
        }
    }

    fn dispatch(&mut self, expression: &'a Expression) -> Result<bool, BnfError> {
        match expression {
            Expression::Terminal { value } => self.dispatch_terminal(value),
            Expression::NonTerminal { children } => self.dispatch_nonterminal(children),
            Expression::Variable { name } => self.dispatch_variable(name),
            Expression::Or { alternatives } => self.dispatch_or(alternatives),
            Expression::Group { inner } => self.dispatch(inner),
            Expression::Assignment { body, .. } => self.dispatch(body),
        }
    }

    fn dispatch_terminal(&mut self, value: &str) -> Result<bool, BnfError> {
        let matched = self.input.matches(value);

        if matched {
            self.reset_visited();
            self.active().add(NodeKind::Value, value.to_string());
        }

        Ok(matched)
    }

    fn dispatch_nonterminal(&mut self, children: &'a [Expression]) -> Result<bool, BnfError> {
        let saved = self.active().current();

        for child in children {
            if !self.dispatch(child)? {
                self.active().set_current(saved);
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn dispatch_variable(&mut self, name: &'a Token) -> Result<bool, BnfError> {
        if *self.visited.get(name).unwrap_or(&false) {
            return Ok(false);
        }

        let body = self.environment.get(name).ok_or_else(|| {
            log::warn!("input parser: missing binding for {}", name.lexeme);
            BnfError::resolver(name.line, format!("Missing {} in the environment", name.lexeme))
        })?;

        if let Some(seen) = self.visited.get_mut(name) {
            *seen = true;
        }

        self.active().add_and_forward(NodeKind::Variable, name.lexeme.clone());
        let matched = self.dispatch(body)?;
        self.active().back();

        Ok(matched)
    }

    fn dispatch_or(&mut self, alternatives: &'a [Expression]) -> Result<bool, BnfError> {
        let initial_cursor = self.input.cursor;
        let mut best: Option<(usize, DerivationTree)> = None;

        for alternative in alternatives {
            self.input.cursor = initial_cursor;
            self.trees.push(DerivationTree::new());

            let matched = self.dispatch(alternative)?;
            let attempt = self.trees.pop().expect("just pushed");

            if matched {
                let advanced_further = best.as_ref().map_or(true, |(steps, _)| self.input.cursor > *steps);
                if advanced_further {
                    best = Some((self.input.cursor, attempt));
                }
            }
        }

        match best {
            None => Ok(false),
            Some((cursor, tree)) => {
                self.input.cursor = cursor;
                self.active().graft_root_children(&tree);
                self.reset_visited();
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expression;
    use crate::grammar::parse;

    fn start_name_and_body(expressions: &[Expression]) -> (&str, &Expression) {
        match &expressions[0] {
            Expression::Assignment { name, body } => (name.lexeme.as_str(), body),
            _ => panic!("expected an assignment"),
        }
    }

    #[test]
    fn matches_left_recursive_alternation_and_breaks_on_no_progress() {
        let grammar = parse(
            "<adn> ::= (\"A\" | \"T\" | \"C\" | \"G\") | (\"A\" | \"T\" | \"C\" | \"G\") <adn>\n",
        )
        .unwrap();

        assert!(grammar.clone().parse_input("ACCTAG").is_some());
        assert!(grammar.parse_input("ACAACD").is_none());
    }

    #[test]
    fn leaves_spell_the_matched_input() {
        let grammar = parse("<adn> ::= (\"A\" | \"T\") | (\"A\" | \"T\") <adn>\n").unwrap();
        let tree = grammar.parse_input("ATTA").unwrap();
        assert_eq!(tree.leaves(), "ATTA");
    }

    #[test]
    fn two_value_leaves_for_a_simple_concatenation() {
        let grammar = parse("<list> ::= \"[\" \"]\"\n").unwrap();
        let tree = grammar.parse_input("[]").unwrap();
        assert_eq!(tree.leaves(), "[]");
    }

    #[test]
    fn pure_left_recursion_never_matches() {
        let grammar = parse("<x> ::= <x>\n").unwrap();
        assert!(grammar.parse_input("anything").is_none());
    }

    #[test]
    fn partial_match_is_rejected() {
        let grammar = parse("<d> ::= \"1\" | \"2\"\n").unwrap();
        assert!(grammar.parse_input("12").is_none());
    }

    #[test]
    fn longest_alternative_wins() {
        let grammar = parse("<x> ::= \"a\" | \"a\" \"b\"\n").unwrap();
        let tree = grammar.parse_input("ab").unwrap();
        assert_eq!(tree.leaves(), "ab");
    }

    #[test]
    fn start_name_helper_exists_for_readability() {
        let grammar = parse("<d> ::= \"1\"\n").unwrap();
        let _ = start_name_and_body;
        assert!(grammar.parse_input("1").is_some());
    }

    #[test]
    fn missing_binding_during_matching_yields_no_match() {
        // A grammar built by hand with a dangling reference the resolver never saw.
        let environment = Environment::new();
        let name = Token::identifier_key("<missing>");
        let start_body = Expression::Variable { name: name.clone() };
        let parser = InputParser::new("anything", &environment);
        assert!(parser.parse_input(&name.lexeme, &start_body).is_none());
    }
}
