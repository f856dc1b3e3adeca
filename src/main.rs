//! Command-line driver: applies an operation list to one B-tree.
//!
//! ```text
//! btree-index -t 2 --ops "ins 10,ins 20,del 10,find 20" --validate --print
//! ```
//!
//! Log verbosity comes from the `LOG_LEVEL` environment variable.

use std::env;
use std::process;

use btree_index::script::{self, Outcome};
use btree_index::{BTree, DEFAULT_MIN_DEGREE};
use clap::Parser;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "btree-index")]
#[command(about = "Apply an operation list (ins K, del K, find K) to an in-memory B-tree")]
struct Args {
    /// Minimum degree t of the tree (>= 2)
    #[arg(short = 't', long, default_value_t = DEFAULT_MIN_DEGREE)]
    min_degree: usize,

    /// Comma-separated operations, e.g. "ins 10,ins 20,del 10,find 20"
    #[arg(short, long, default_value = "")]
    ops: String,

    /// Print the tree and the ascending key list at the end
    #[arg(long, default_value_t = false)]
    print: bool,

    /// Print the tree after every operation
    #[arg(long, default_value_t = false)]
    step: bool,

    /// Validate the tree after every operation
    #[arg(long, default_value_t = false)]
    validate: bool,
}

fn init_tracing() {
    let log_level = match env::var("LOG_LEVEL") {
        Ok(level) => match level.parse::<Level>() {
            Ok(level) => level,
            Err(_) => {
                eprintln!("Invalid LOG_LEVEL {level:?}, defaulting to WARN");
                Level::WARN
            }
        },
        Err(_) => {
            if cfg!(debug_assertions) {
                Level::DEBUG
            } else {
                Level::WARN
            }
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global subscriber: {err}");
    }
    debug!("Log level set to {:?}", log_level);
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let mut tree = match BTree::new(args.min_degree) {
        Ok(tree) => tree,
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    };

    if args.ops.trim().is_empty() {
        println!("No operations given. Example: --ops \"ins 10,ins 20,del 10,find 20\"");
        return;
    }

    let commands = match script::parse_script(&args.ops) {
        Ok(commands) => commands,
        Err(err) => {
            error!("Cannot parse operations: {err}");
            process::exit(1);
        }
    };
    info!(count = commands.len(), min_degree = tree.min_degree(), "applying operations");

    for command in commands {
        let outcome = command.apply(&mut tree);
        debug!(%outcome, "applied");
        if let Outcome::Found { .. } = outcome {
            println!("{outcome}");
        }

        if args.validate {
            if let Err(violation) = tree.validate() {
                error!("Validation failed after {command}: {violation}\ntree:\n{tree}");
                process::exit(1);
            }
        }
        if args.step {
            println!("op: {command}\n{tree}\n");
        }
    }

    if args.print {
        println!("tree:");
        println!("{tree}");
        println!();
        println!("keys:");
        println!("{:?}", tree.keys());
    }
}
