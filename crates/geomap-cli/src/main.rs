// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! geomap CLI
//!
//! Loads query result payloads into a headless feature store and reports on
//! the resulting tree.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use geomap_features::{NodePath, SessionKind};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect geo query results without a map")]
struct Args {
    /// Directory holding geomap prefs (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
    /// Log walker and store activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the decorated tree with visibility and colour per node
    Tree {
        #[command(flatten)]
        input: Input,
        /// Show every layer before reporting
        #[arg(long)]
        show_all: bool,
    },
    /// Print the visible bounds of a subtree as `[[south, west], [north, east]]`
    Bounds {
        #[command(flatten)]
        input: Input,
        /// Node path such as `0/1`; defaults to the root
        #[arg(long, default_value = ".")]
        path: NodePath,
        /// Show every layer before measuring
        #[arg(long)]
        show_all: bool,
    },
    /// Print the payload after label and type assignment
    Decorate {
        #[command(flatten)]
        input: Input,
    },
    /// Print the stored map prefs
    Prefs {
        /// Overwrite the stored prefs with defaults first
        #[arg(long)]
        reset: bool,
    },
}

#[derive(clap::Args, Debug)]
struct Input {
    /// Payload file, or `-` for stdin
    file: PathBuf,
    /// Endpoint the payload came from
    #[arg(long, value_enum, default_value_t = Kind::Query)]
    kind: Kind,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    /// Query plan result
    Query,
    /// Query id lookup result
    Lookup,
    /// Manual geometry result
    Geometry,
}

impl From<Kind> for SessionKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Query => Self::Query,
            Kind::Lookup => Self::Lookup,
            Kind::Geometry => Self::Geometry,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config_dir = args.config_dir.as_deref();
    let mut out = io::stdout().lock();
    match args.cmd {
        Command::Tree { input, show_all } => {
            let prefs = commands::load_prefs(config_dir);
            commands::tree(&mut out, &prefs, &input.file, input.kind.into(), show_all)?;
        }
        Command::Bounds {
            input,
            path,
            show_all,
        } => {
            let prefs = commands::load_prefs(config_dir);
            commands::bounds(
                &mut out,
                &prefs,
                &input.file,
                input.kind.into(),
                &path,
                show_all,
            )?;
        }
        Command::Decorate { input } => {
            let prefs = commands::load_prefs(config_dir);
            commands::decorate(&mut out, &prefs, &input.file, input.kind.into())?;
        }
        Command::Prefs { reset } => {
            let config = commands::config_service(config_dir)?;
            commands::prefs(&mut out, &config, reset)?;
        }
    }
    out.flush()?;
    Ok(())
}
