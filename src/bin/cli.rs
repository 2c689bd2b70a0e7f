//! carmine CLI Client
//!
//! Command-line interface for running commands against a server.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use carmine::{Config, Connection, Result};

/// carmine CLI
#[derive(Parser, Debug)]
#[command(name = "carmine-cli")]
#[command(about = "CLI for the carmine Redis client")]
#[command(version)]
struct Args {
    /// Server hostname or IP
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "6379")]
    port: u16,

    /// Password for the AUTH handshake (omit to skip authentication)
    #[arg(long, default_value = "")]
    password: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key (prints an empty line for an absent key)
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key, printing the number of keys removed
    Del {
        /// The key to delete
        key: String,
    },

    /// Increment a numeric key by one
    Incr {
        /// The key to increment
        key: String,
    },

    /// Remaining time to live (-2 absent, -1 no expiry)
    Ttl {
        /// The key to inspect
        key: String,
    },

    /// Storage type of a key (none when absent)
    Type {
        /// The key to inspect
        key: String,
    },

    /// List keys matching a glob pattern
    Keys {
        /// Glob pattern, e.g. "user:*"
        pattern: String,
    },

    /// Run a raw command line and print its values
    Raw {
        /// The command line, e.g. "zrange board 0 -1"
        line: Vec<String>,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,carmine=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder()
        .host(args.host)
        .port(args.port)
        .password(args.password)
        .build();

    let mut conn = Connection::new(config);
    conn.connect()?;

    match args.command {
        Commands::Get { key } => println!("{}", conn.get(&key)?),
        Commands::Set { key, value } => {
            conn.set(&key, &value)?;
            println!("OK");
        }
        Commands::Del { key } => println!("{}", conn.del(&key)?),
        Commands::Incr { key } => println!("{}", conn.incr(&key)?),
        Commands::Ttl { key } => println!("{}", conn.ttl(&key)?),
        Commands::Type { key } => println!("{}", conn.key_type(&key)?),
        Commands::Keys { pattern } => {
            for key in conn.keys(&pattern)? {
                println!("{}", key);
            }
        }
        Commands::Raw { line } => {
            for value in conn.exec_values(&line.join(" "))? {
                println!("{}", value);
            }
        }
    }

    conn.disconnect();
    Ok(())
}
