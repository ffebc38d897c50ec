use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// cilgraph - resolve and dump the type graph of .NET modules
#[derive(Debug, Parser)]
#[command(name = "cilgraph", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory searched for referenced modules (`<name>.dll`, then `<name>.winmd`).
    #[arg(short, long = "search", value_name = "DIR", global = true)]
    pub search: Vec<PathBuf>,

    /// Apply the platform projection to WinMD signatures.
    #[arg(long, global = true)]
    pub projection: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write every type of a module with its members, attributes and hierarchy.
    Dump {
        /// Path to the .NET module.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Include private and internal members.
        #[arg(short, long)]
        all: bool,
    },

    /// List the types of a module in a table.
    Types {
        /// Path to the .NET module.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Show only types in this namespace.
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// List the modules a module pulls in after finalization.
    Modules {
        /// Path to the .NET module.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Resolve a type by name across the loaded modules and describe it.
    Resolve {
        /// Path to the .NET module to load first.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Full type name, e.g. `System.Collections.Generic.List`1` or `Contoso.Widget[]`.
        #[arg(value_name = "TYPE")]
        name: String,
    },
}
