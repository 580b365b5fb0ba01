// A small debugging aid that parses and describes a statement without
// running a search, in the spirit of `src/bin/search.rs`'s standalone,
// single-goal driver (SPEC_FULL.md §2.4).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sprout::environment::Environment;
use sprout::expr::variables;
use sprout::printer;

#[derive(Parser)]
#[command(about = "Parses a statement and describes it: inferred type, free variables, their types.")]
struct Args {
    statement: String,

    /// A file of extra rules to load first, so the signature it implies
    /// (via well-typedness checks) is in effect when parsing `statement`.
    #[clap(long = "load")]
    load: Vec<PathBuf>,
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

    println!("parsed:  {}", printer::print(&stmt));
    println!("type:    {:?}", env.signature.type_of(&stmt));
    println!("free variables:");
    for (name, typ) in variables(&stmt, &env.signature) {
        println!("  {}: {:?}", name, typ);
    }
    ExitCode::SUCCESS
}
