//! Validate a policy document against a channel schema.
//!
//! Reads a JSON document from a file or stdin, resolves the channel schema
//! through the repository, and prints the validation result as pretty JSON.
//! Exit codes: 0 when the document is valid, 1 when issues were found, 2 for
//! setup problems (unsupported channel, missing schema, unreadable input).

use anyhow::{Context, Result, bail};
use policyvet::{SchemaRepository, default_cache_dir, default_schema_dir, validate_document};
use serde_json::Value;
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(2);
        }
    }
}

fn run() -> Result<i32> {
    let args = CliArgs::parse()?;
    let source = args.source.read()?;
    let document: Value =
        serde_json::from_slice(&source).context("failed to parse JSON document")?;

    let repository = SchemaRepository::new(
        args.schema_dir.unwrap_or_else(default_schema_dir),
        args.cache_dir.unwrap_or_else(default_cache_dir),
    )
    .with_fallback(args.allow_fallback);
    let schema = repository
        .load(&args.channel)
        .with_context(|| format!("loading schema for channel '{}'", args.channel))?;

    let result = validate_document(&document, &schema);
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(if result.ok { 0 } else { 1 })
}

enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    fn read(&self) -> Result<Vec<u8>> {
        match self {
            InputSource::Stdin => {
                let mut buffer = Vec::new();
                io::stdin()
                    .read_to_end(&mut buffer)
                    .context("failed to read document from stdin")?;
                Ok(buffer)
            }
            InputSource::File(path) => fs::read(path)
                .with_context(|| format!("failed to read document {}", path.display())),
        }
    }
}

struct CliArgs {
    channel: String,
    source: InputSource,
    schema_dir: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    allow_fallback: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut channel = None;
        let mut source = InputSource::Stdin;
        let mut schema_dir = None;
        let mut cache_dir = None;
        let mut allow_fallback = true;

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--channel" | "-c" => {
                    channel = Some(args.next().context("--channel requires a value")?);
                }
                "--document" | "-d" => {
                    let path = args.next().context("--document requires a path")?;
                    source = InputSource::File(PathBuf::from(path));
                }
                "--schema-dir" => {
                    schema_dir =
                        Some(PathBuf::from(args.next().context("--schema-dir requires a path")?));
                }
                "--cache-dir" => {
                    cache_dir =
                        Some(PathBuf::from(args.next().context("--cache-dir requires a path")?));
                }
                "--no-fallback" => allow_fallback = false,
                "--help" | "-h" => usage(0),
                other => bail!("unknown argument '{other}' (see --help)"),
            }
        }

        let Some(channel) = channel else {
            usage(2);
        };

        Ok(Self {
            channel,
            source,
            schema_dir,
            cache_dir,
            allow_fallback,
        })
    }
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: validate-doc --channel <key> [--document <file>] [options]\n\nValidates a JSON policy document (mapping of policy id to value) against the\nschema for the given channel and prints the result as JSON.\n\nOptions:\n  --channel, -c <key>    Channel key (e.g. esr-140, release-144). Required.\n  --document, -d <file>  Read the document from a file instead of stdin.\n  --schema-dir <dir>     Override the static schema directory.\n  --cache-dir <dir>      Override the fallback cache directory.\n  --no-fallback          Fail instead of generating a stub schema.\n\nExit codes: 0 valid, 1 issues found, 2 setup error.\n\nExamples:\n  validate-doc --channel release-144 --document profile.json\n  echo '{{\"DisableAppUpdate\": true}}' | validate-doc -c esr-140"
    );
    std::process::exit(code);
}
