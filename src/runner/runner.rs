use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::{fs, process};

use crate::grammar;

pub static HAD_ERROR: AtomicBool = AtomicBool::new(false);

/// What the demonstration binary does with a grammar once it is loaded.
/// This module is a runnable demonstration of the library, not part of the
/// grammar engine itself.
pub enum Mode {
    Print,
    Generate,
    Match,
}

pub fn run_file(path: &str, start: Option<&str>, mode: Mode) {
    let source = fs::read_to_string(path).expect("failed to read grammar file");
    run(&source, start, mode);

    if HAD_ERROR.load(Ordering::Relaxed) {
        process::exit(65);
    }
}

fn run(source: &str, start: Option<&str>, mode: Mode) {
    let grammar = match grammar::parse(source).and_then(|g| g.set_start(start)) {
        Ok(grammar) => grammar,
        Err(error) => {
            report(&error);
            return;
        }
    };

    match mode {
        Mode::Print => grammar.print(),
        Mode::Generate => println!("{}", grammar.generate()),
        Mode::Match => match_lines_from_stdin(&grammar),
    }
}

fn match_lines_from_stdin(grammar: &grammar::Grammar) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.expect("failed to read stdin");
        match grammar.parse_input(&line) {
            Some(_) => println!("match"),
            None => println!("no match"),
        }
    }
}

fn report(error: &crate::error::BnfError) {
    HAD_ERROR.store(true, Ordering::Relaxed);
    eprintln!("{error}");
    io::stderr().flush().ok();
}
