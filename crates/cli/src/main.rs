use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use b3mh_corelib as core;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "b3mh", version, about = "BLAKE3 multihash digests")]
struct Cli {
    /// Log activation and stream lifecycle to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash files (stdin when none or `-`) and print hex digests
    Digest {
        files: Vec<PathBuf>,
        /// Print the raw 32-byte digest without the multihash prefix
        #[arg(long)]
        raw: bool,
        /// TOML config (read_chunk_size, multihash)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print multihash code, digest size and name
    Info,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn hex_of(digest: &core::Digest, as_multihash: bool) -> String {
    if as_multihash {
        hex::encode(digest.bytes())
    } else {
        hex::encode(digest.digest())
    }
}

fn digest_cmd(files: &[PathBuf], raw: bool, config: Option<&Path>) -> Result<()> {
    let cfg = core::Config::load_or_default(config)?;
    let as_multihash = cfg.multihash && !raw;
    let blake = core::activate_blocking()?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let stdin_only = [PathBuf::from("-")];
    let inputs = if files.is_empty() { &stdin_only[..] } else { files };
    for path in inputs {
        let (digest, n) = if path.as_os_str() == "-" {
            blake
                .digest_reader(io::stdin().lock(), &cfg)
                .context("reading stdin")?
        } else {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            blake
                .digest_reader(file, &cfg)
                .with_context(|| format!("reading {}", path.display()))?
        };
        debug!(path = %path.display(), bytes = n, "hashed");
        writeln!(out, "{}  {}", hex_of(&digest, as_multihash), path.display())?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Some(Commands::Digest {
            files,
            raw,
            config,
        }) => digest_cmd(&files, raw, config.as_deref())?,
        Some(Commands::Info) => {
            println!("name: {}", core::NAME);
            println!("code: 0x{:02x}", core::CODE);
            println!("size: {}", core::SIZE);
        }
        None => {
            println!("b3mh {}: ready", core::version());
            println!("Try: `b3mh digest <FILE>...` or `b3mh info`");
        }
    }
    Ok(())
}
