use std::env;

use bnf_grammar::runner::{run_file, Mode};

pub fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let path = match args.get(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: bnf-grammar <file> [--start <name>] [print|generate|match]");
            std::process::exit(64);
        }
    };

    let mut start = None;
    let mut mode = Mode::Print;
    let mut rest = args[2..].iter();

    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--start" => start = rest.next().map(String::as_str),
            "print" => mode = Mode::Print,
            "generate" => mode = Mode::Generate,
            "match" => mode = Mode::Match,
            other => {
                eprintln!("Unrecognized argument '{other}'");
                std::process::exit(64);
            }
        }
    }

    run_file(path, start, mode);
    Ok(())
}
