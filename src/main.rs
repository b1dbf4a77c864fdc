use std::{env, process};

use colored::Colorize;
use regex_dfa::{compile_stages, lexer::render_tokens, simulate};

const USAGE: &str = "usage: regex_dfa [--dot] [--nfa] <pattern> [input...]";

#[derive(Debug, Default)]
struct Options {
    dot: bool,
    nfa: bool,
    pattern: Option<String>,
    inputs: Vec<String>,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    for arg in args {
        match arg.as_str() {
            "--dot" => options.dot = true,
            "--nfa" => options.nfa = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => {
                return Err(format!("unknown flag {}\n{}", flag, USAGE))
            }
            pattern if options.pattern.is_none() => {
                options.pattern = Some(pattern.trim().to_string())
            }
            input => options.inputs.push(input.to_string()),
        }
    }
    Ok(options)
}

fn main() {
    env_logger::init();

    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(2);
        }
    };
    let pattern = match options.pattern {
        Some(pattern) => pattern,
        None => {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    let stages = match compile_stages(&pattern) {
        Ok(stages) => stages,
        Err(err) => {
            eprintln!("{}", err.render(&pattern));
            process::exit(1);
        }
    };

    if options.nfa {
        print!("{}", stages.nfa.to_dot());
    }
    if options.dot {
        print!("{}", stages.dfa.to_dot());
    }
    if options.nfa || options.dot {
        return;
    }

    println!("postfix: {}", render_tokens(&stages.postfix));
    println!(
        "states: {}, alphabet: {:?}, accepting: {:?}",
        stages.dfa.state_count(),
        stages.dfa.alphabet(),
        stages.dfa.accepting()
    );
    print!("{}", stages.dfa);

    for input in &options.inputs {
        if simulate(&stages.dfa, input) {
            println!("{:?} {}", input, "ACCEPTED".green().bold());
        } else {
            println!("{:?} {}", input, "REJECTED".red().bold());
        }
    }
}
