// The sprout CLI: parse a statement, search for a proof, print the result.
// Modeled on `src/bin/acorn.rs`'s use of `clap::Parser` for a small,
// flag-driven entry point (spec.md §6.3, expanded in SPEC_FULL.md §2.4).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sprout::environment::Environment;
use sprout::printer;
use sprout::search::{Outcome, ProofContext, SearchConfig};

#[derive(Parser)]
#[command(about = "Searches for a proof of an equational statement over the Peano signature.")]
struct Args {
    /// The statement to prove, in this crate's surface syntax.
    statement: String,

    /// ε in the weighted-A* priority g + ε·h. Default 1 (plain A*).
    #[clap(long, default_value_t = 1.0)]
    epsilon: f64,

    /// A file of extra rules to load before proving, one expression per
    /// line. May be repeated; files are loaded in the order given.
    #[clap(long = "load")]
    load: Vec<PathBuf>,

    /// Print progress as the search runs: nodes popped, successors queued,
    /// landmark updates (spec.md §5, SPEC_FULL.md §2.3).
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut env = Environment::peano();

    for path in &args.load {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("could not read {}: {}", path.display(), e);
                return ExitCode::from(2);
            }
        };
        if let Err(e) = env.load_lines(&text) {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    }

    let stmt = match sprout::parser::parse(&args.statement, &env.signature) {
        Ok(stmt) => stmt,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let config = SearchConfig { epsilon: args.epsilon, verbose: args.verbose, deadline: None };
    let mut ctx = ProofContext::new(env);

    match ctx.prove(&stmt, &config) {
        Outcome::Success(proof) => {
            println!("proved in {} step(s):", proof.len());
            for step in &proof.steps {
                println!("  {:?} => {}", step.applied, printer::print(&step.result));
            }
            ExitCode::SUCCESS
        }
        Outcome::Exhausted => {
            println!("exhausted: no proof found");
            ExitCode::from(1)
        }
        Outcome::Interrupted => {
            println!("interrupted before a proof was found");
            ExitCode::from(1)
        }
    }
}
