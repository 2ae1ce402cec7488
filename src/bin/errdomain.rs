//! errdomain - inspect error catalogs
//!
//! Builds the domain described by a TOML catalog and reports the codes it
//! assigns.
//!
//! # Usage
//!
//! ```bash
//! # List every error kind with its code and default message
//! errdomain codes errors.toml
//!
//! # Show one error kind, as JSON
//! errdomain lookup errors.toml 404 --json
//!
//! # Trace code allocation
//! RUST_LOG=errdomain_core=debug errdomain codes errors.toml
//! ```

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use errdomain::{BuiltCatalog, Catalog, Descriptor};

/// Inspect code-tagged error catalogs
#[derive(Parser, Debug)]
#[command(name = "errdomain", version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every error kind in a catalog
    Codes {
        /// Path to the catalog file
        catalog: PathBuf,

        /// Print one `{"kind", "error"}` JSON object per error kind
        #[arg(long)]
        json: bool,
    },
    /// Show the error kind registered under a code
    Lookup {
        /// Path to the catalog file
        catalog: PathBuf,

        /// Code to look up
        code: String,

        /// Print the sample error as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    match args.command {
        Command::Codes { catalog, json } => {
            let built = build(&catalog)?;
            for (name, descriptor) in &built.descriptors {
                print_descriptor(name, descriptor, json)?;
            }
            Ok(())
        }
        Command::Lookup {
            catalog,
            code,
            json,
        } => {
            let built = build(&catalog)?;
            let found = built
                .domain
                .find_error_descriptor_for_code(&code)
                .zip(built.name_of(&code));
            match found {
                Some((descriptor, name)) => print_descriptor(name, descriptor, json),
                None => {
                    eprintln!("No error registered under code {code:?}");
                    process::exit(1);
                }
            }
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build(path: &Path) -> Result<BuiltCatalog> {
    let catalog = Catalog::load(path)
        .with_context(|| format!("Failed to load catalog {}", path.display()))?;
    let built = catalog
        .build()
        .with_context(|| format!("Failed to build domain from {}", path.display()))?;
    info!(errors = built.domain.len(), "Catalog built");
    Ok(built)
}

fn print_descriptor(name: &str, descriptor: &Descriptor, json: bool) -> Result<()> {
    if json {
        let error = serde_json::to_value(descriptor.error()).context("Failed to serialize error")?;
        let value = serde_json::json!({ "kind": name, "error": error });
        println!("{value}");
    } else {
        println!(
            "{:<12} {:<24} {:<12} {}",
            descriptor.code(),
            name,
            descriptor.error_class(),
            descriptor.default_message()
        );
    }
    Ok(())
}
