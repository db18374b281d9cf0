//! `sigil`: resolve and verify asset references from the command line.
//!
//! Build: `cargo build --bin sigil --features cli`

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use sigil::config::Config;
use sigil::rules::{RuleTable, loader};
use sigil::{MatchRequest, Sigil, Tier, Verdict};

#[derive(Parser)]
#[command(name = "sigil")]
#[command(version)]
#[command(about = "Resolve cultural-heritage symbols to asset references")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "SIGIL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a symbol name to an asset reference
    Resolve {
        /// Symbol name (e.g. "Triskèle celtique")
        name: String,
        /// Category or culture hint (e.g. "Celtique")
        #[arg(long)]
        category: Option<String>,
        /// Also verify that the reference is reachable
        #[arg(long)]
        verify: bool,
    },

    /// Check whether a location is reachable
    Verify {
        /// Local path or remote URL
        location: String,
    },

    /// Validate a rule file and print per-tier counts
    CheckRules {
        /// Rule file (default: configured path, else the embedded seed)
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::CheckRules { path } => {
            let table = match path.or_else(|| config.rules.path.clone()) {
                Some(path) => loader::load_file(&path)?,
                None => RuleTable::with_embedded_seed(),
            };
            for tier in Tier::ALL {
                println!("{tier:<18} {}", table.tier_len(tier));
            }
            println!("{:<18} {}", "total", table.len());
        }

        Command::Resolve {
            name,
            category,
            verify,
        } => {
            let resolver = Sigil::builder().config(&config).build()?;
            let mut request = MatchRequest::new(name);
            request.category_hint = category;

            if verify {
                let verified = resolver.resolve_verified(&request).await;
                print_resolution(&verified.resolution);
                let verdict = match &verified.verdict {
                    Verdict::Local => "local".to_string(),
                    Verdict::Reachable => "reachable".to_string(),
                    Verdict::Unreachable => "unreachable".to_string(),
                    Verdict::Rehosted(r) => format!("rehosted -> {r}"),
                };
                println!("verdict: {verdict}");
            } else {
                print_resolution(&resolver.explain(&request));
            }
        }

        Command::Verify { location } => {
            let resolver = Sigil::builder().config(&config).build()?;
            let reference = sigil::AssetReference::infer(location);
            let outcome = resolver.probe(&reference).await;
            println!("{reference}: {}", outcome.as_str());
            if !outcome.is_valid() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn print_resolution(resolution: &sigil::Resolution) {
    println!("reference: {}", resolution.reference);
    println!(
        "kind: {}",
        if resolution.reference.is_local {
            "local"
        } else {
            "remote"
        }
    );
    println!("tier: {}", resolution.tier);
    if let Some(pattern) = &resolution.pattern {
        println!("pattern: {pattern}");
    }
}
