use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

use kvtable::script;
use kvtable::DuplicatePolicy;
use kvtable::KeyValueTable;
use kvtable::TableConfig;
use kvtable::DEFAULT_BUCKETS;
use slog::info;
use slog::o;
use slog::Drain;
use slog::Level;
use slog::Logger;
use slog_async::Async;
use slog_term::CompactFormat;
use slog_term::TermDecorator;
use std::error::Error;
use std::fs;
use std::io;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;
use std::result::Result;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum PolicyName {
    Overwrite,
    Append,
}

impl From<PolicyName> for DuplicatePolicy {
    fn from(name: PolicyName) -> Self {
        match name {
            PolicyName::Overwrite => Self::Overwrite,
            PolicyName::Append => Self::Append,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of buckets in the table.
    #[arg(long, default_value_t = DEFAULT_BUCKETS)]
    buckets: usize,

    /// What `set` does with a key that is already stored.
    #[arg(long, value_enum, default_value_t = PolicyName::Overwrite)]
    policy: PolicyName,

    /// Double the bucket count once entries per bucket would exceed this.
    #[arg(long)]
    max_load_factor: Option<f64>,

    /// Log table activity at debug level.
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a script of `set <key> <value>`, `get <key>` and `rm <key>` lines read from FILE, or stdin.
    Run {
        file: Option<PathBuf>,

        /// Print the chain length of every bucket when done.
        #[arg(long)]
        stats: bool,
    },

    /// Store hello=1, world=2 and hi=45, then print the value of hi.
    Demo,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::Debug } else { Level::Info };
    let decorator = TermDecorator::new().stderr().build();
    let drain = CompactFormat::new(decorator).build().fuse();
    let drain = Async::new(drain).build().filter_level(level).fuse();
    let log = Logger::root(drain, o!());

    info!(log, "starting up"; "version" => env!("CARGO_PKG_VERSION"));
    info!(
        log,
        "using configuration";
        "buckets" => cli.buckets,
        "policy" => ?cli.policy,
        "max-load-factor" => ?cli.max_load_factor
    );

    let mut config = TableConfig::new()
        .buckets(cli.buckets)
        .policy(cli.policy.into());
    if let Some(factor) = cli.max_load_factor {
        config = config.max_load_factor(factor);
    }
    let mut table = KeyValueTable::with_logger(config, log.clone())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Run { file, stats } => {
            let source = match file {
                Some(path) => {
                    info!(log, "reading script"; "file" => path.display().to_string());
                    fs::read_to_string(path)?
                }
                None => {
                    let mut source = String::new();
                    io::stdin().read_to_string(&mut source)?;
                    source
                }
            };
            let commands = script::parse(&source)?;
            script::run(&mut table, commands, &mut out)?;
            if stats {
                for (index, length) in table.bucket_lengths().into_iter().enumerate() {
                    writeln!(out, "bucket {}: {}", index, length)?;
                }
            }
        }
        Commands::Demo => {
            table
                .set("hello", "1".to_string())
                .set("world", "2".to_string())
                .set("hi", "45".to_string());
            match table.get("hi") {
                Some(value) => writeln!(out, "{}", value)?,
                None => writeln!(out, "Key not found")?,
            }
        }
    }
    Ok(())
}
