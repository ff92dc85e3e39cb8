//! Materialize channel schemas on disk.
//!
//! Loads the schema for one channel (or all of them) through the repository,
//! generating and caching fallback stubs where no static file exists. Prints
//! one `[ok]`/`[error]` line per channel; exits non-zero if any channel
//! failed.

use anyhow::{Context, Result, bail};
use policyvet::{SchemaRepository, available_channels, default_cache_dir, default_schema_dir};
use std::env;
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

    let channels: Vec<String> = if args.all {
        available_channels()
            .into_iter()
            .map(|(channel, _)| channel.to_string())
            .collect()
    } else {
        vec![args.channel.context("either --channel or --all is required")?]
    };

    let repository = SchemaRepository::new(
        args.schema_dir.unwrap_or_else(default_schema_dir),
        args.cache_dir.unwrap_or_else(default_cache_dir),
    )
    .with_fallback(args.allow_fallback);

    let mut exit_code = 0;
    for channel in channels {
        match repository.load(&channel) {
            Ok(schema) => {
                println!(
                    "[ok] {channel}: {} policies (version {}, source {})",
                    schema.policies.len(),
                    schema.version,
                    schema.source
                );
            }
            Err(err) => {
                eprintln!("[error] {channel}: {err}");
                exit_code = 1;
            }
        }
    }

    Ok(exit_code)
}

struct CliArgs {
    channel: Option<String>,
    all: bool,
    schema_dir: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    allow_fallback: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut channel = None;
        let mut all = false;
        let mut schema_dir = None;
        let mut cache_dir = None;
        let mut allow_fallback = true;

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--channel" | "-c" => {
                    channel = Some(args.next().context("--channel requires a value")?);
                }
                "--all" | "-a" => all = true,
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

        if channel.is_some() && all {
            bail!("--channel and --all are mutually exclusive");
        }
        if channel.is_none() && !all {
            usage(2);
        }

        Ok(Self {
            channel,
            all,
            schema_dir,
            cache_dir,
            allow_fallback,
        })
    }
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: schema-cache (--channel <key> | --all) [options]\n\nEnsures channel schemas are loadable, generating cached fallback stubs for\nchannels with no static schema file.\n\nOptions:\n  --channel, -c <key>  Target a single channel (e.g. esr-140, release-144).\n  --all, -a            Process every supported channel.\n  --schema-dir <dir>   Override the static schema directory.\n  --cache-dir <dir>    Override the fallback cache directory.\n  --no-fallback        Report an error instead of generating stubs.\n\nExamples:\n  schema-cache --all\n  schema-cache --channel esr-140 --no-fallback"
    );
    std::process::exit(code);
}
