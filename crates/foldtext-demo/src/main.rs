#![forbid(unsafe_code)]

//! foldtext demo binary entry point.

use foldtext_demo::cli::{self, Command, Opts};

fn main() {
    let command = match Opts::parse() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("Run with --help for usage information.");
            std::process::exit(1);
        }
    };

    match command {
        Command::Help => println!("{}", cli::HELP_TEXT),
        Command::Version => println!("foldtext-demo {}", cli::VERSION),
        Command::Run(opts) => {
            if let Err(e) = foldtext_demo::run(opts) {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    }
}
