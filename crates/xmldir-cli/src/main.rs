use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "xmldir",
    version,
    about = "Edit XML documents as a directory structure"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read an XML document from stdin and create a directory structure
    Makedir {
        /// Directory to populate (must exist)
        #[arg(value_name = "TARGET", default_value = ".")]
        target: PathBuf,
    },
    /// Assemble an XML document from a directory structure onto stdout
    Assemble {
        /// Root element directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();
    match args.command {
        Command::Makedir { target } => makedir(&target),
        Command::Assemble { dir } => assemble(&dir),
    }
}

fn makedir(target: &Path) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    if input.trim().is_empty() {
        bail!("no document provided on stdin");
    }

    let doc = xmldir::from_xml_str(&input).context("failed to parse document")?;
    debug!(root = %doc.root.tag, "encoding document");
    xmldir::encode_to_dir(&doc, target)
        .with_context(|| format!("failed to populate {}", target.display()))?;
    Ok(())
}

fn assemble(dir: &Path) -> Result<()> {
    let doc = xmldir::decode_from_dir(dir)
        .with_context(|| format!("failed to decode {}", dir.display()))?;
    debug!(root = %doc.root.tag, "assembled document");

    let output = xmldir::to_xml_string(&doc);
    let mut stdout = io::stdout();
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.write_all(b"\n"))
        .context("failed to write stdout")?;
    Ok(())
}
