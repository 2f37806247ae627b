use rand::Rng;

use crate::ast::Expression;
use crate::resolver::Environment;

/// Produces one random string accepted by the grammar (§4.4).
///
/// Driven by an explicit LIFO work stack rather than recursion, so a
/// pathological grammar only grows the heap-allocated stack, not the call
/// stack. The random source is an injected `Rng` (§9's "Open question" on
/// random sources, resolved in favor of dependency injection) so tests can
/// make generation deterministic.
pub struct Generator<'a, R: Rng> {
    environment: &'a Environment,
    rng: &'a mut R,
    max_steps: Option<usize>,
}

impl<'a, R: Rng> Generator<'a, R> {
    pub fn new(environment: &'a Environment, rng: &'a mut R) -> Self {
        Self { environment, rng, max_steps: None }
    }

    /// Bounds the number of work-stack pops before giving up and returning an
    /// empty string, guarding against unconstrained left recursion.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn generate(&mut self, start: &'a Expression) -> String {
        let mut output = String::new();
        let mut stack: Vec<&'a Expression> = vec![start];
        let mut steps = 0usize;

        while let Some(expression) = stack.pop() {
            if let Some(max) = self.max_steps {
                if steps >= max {
                    log::warn!("generator: exceeded {max} steps, aborting");
                    return String::new();
                }
            }
            steps += 1;

            match expression {
                Expression::Terminal { value } => output.push_str(value),
                Expression::NonTerminal { children } => {
                    for child in children.iter().rev() {
                        stack.push(child);
                    }
                }
                Expression::Variable { name } => match self.environment.get(name) {
                    Some(body) => stack.push(body),
                    None => {
                        log::warn!("generator: missing binding for {}", name.lexeme);
                        return String::new();
                    }
                },
                Expression::Or { alternatives } => {
                    let index = self.rng.gen_range(0..alternatives.len());
                    stack.push(&alternatives[index]);
                }
                Expression::Group { inner } => stack.push(inner),
                Expression::Assignment { body, .. } => stack.push(body),
            }
        }

        output
    }
}
