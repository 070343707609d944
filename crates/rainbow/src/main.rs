//! Rainbow CLI — colour, status and brightness of Turris router LEDs.

use clap::{CommandFactory, Parser, error::ErrorKind};

mod cli;

use cli::Args;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if args.help_requested() {
        let _ = Args::command().print_long_help();
        std::process::exit(0);
    }

    if args.words.is_empty() {
        let _ = Args::command().print_help();
        std::process::exit(1);
    }

    if let Err(e) = cli::run(&args) {
        eprintln!("Error: {e}");
        if e.is_usage() {
            eprintln!("Use 'rainbow --help' for usage.");
        }
        std::process::exit(e.exit_code());
    }
}
