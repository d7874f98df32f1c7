mod manifest;
mod render;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use optspec::{Config, InputMode, Registry, RegistryBuilder};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::manifest::{OptionDecl, load_manifest, write_default_manifest};
use crate::render::DescribeReport;

#[derive(Parser)]
#[command(name = "optspec")]
#[command(version, long_about = None)]
#[command(about = "Declare options in a mini-language and match arguments against them")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter optspec.json manifest
    Init(InitArgs),

    /// Match arguments (after `--`) against the declared options
    Match(MatchArgs),

    /// Compile the declared options and print their descriptors
    Describe(DescribeArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Standard,
    Bsd,
    Merged,
    Subcommand,
}

impl From<ModeArg> for InputMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Standard => InputMode::Standard,
            ModeArg::Bsd => InputMode::Bsd,
            ModeArg::Merged => InputMode::Merged,
            ModeArg::Subcommand => InputMode::Subcommand,
        }
    }
}

#[derive(Args)]
struct DeclArgs {
    /// Path to a manifest (default: ./optspec.json when present)
    #[arg(short, long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Option declaration, e.g. `-w|--wife=!s` (repeatable)
    #[arg(short, long = "spec", value_name = "SPEC", allow_hyphen_values = true)]
    specs: Vec<String>,

    /// Option declaration with an explicit name: NAME=SPEC (repeatable)
    #[arg(long = "named", value_name = "NAME=SPEC", allow_hyphen_values = true)]
    named: Vec<String>,

    /// How the first argument is interpreted (overrides the manifest)
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Match handles case-insensitively
    #[arg(long)]
    ignore_case: bool,

    /// Treat unknown prefixed arguments as positionals
    #[arg(long)]
    allow_unknown: bool,
}

#[derive(Args)]
struct InitArgs {
    /// Directory to write optspec.json into (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Overwrite an existing manifest
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct MatchArgs {
    #[command(flatten)]
    decl: DeclArgs,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Arguments to match
    #[arg(last = true, value_name = "ARGS")]
    tokens: Vec<String>,
}

#[derive(Args)]
struct DescribeArgs {
    #[command(flatten)]
    decl: DeclArgs,

    /// Print the descriptors as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Match(args) => match_command(args),
        Commands::Describe(args) => describe_command(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let path = write_default_manifest(&dir, args.force)?;
    eprintln!("Created: {}", path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit optspec.json to declare your options");
    eprintln!("  2. Run: optspec describe");
    eprintln!("  3. Run: optspec match -- <ARGS>");
    Ok(())
}

/// Collect declarations from the manifest and the command line, in that order,
/// and freeze them into a registry.
fn build_registry(decl: &DeclArgs) -> Result<Registry> {
    let mut config = Config::default();
    let mut decls: Vec<OptionDecl> = Vec::new();

    if let Some(loaded) = load_manifest(decl.manifest.as_deref())? {
        tracing::debug!(path = %loaded.path.display(), "using manifest");
        config = loaded.manifest.apply(config);
        decls.extend(loaded.manifest.options);
    }

    if let Some(mode) = decl.mode {
        config = config.input_mode(mode.into());
    }
    if decl.ignore_case {
        config = config.case_sensitive(false);
    }
    if decl.allow_unknown {
        config = config.error_on_unknown(false);
    }

    decls.extend(decl.specs.iter().map(|spec| OptionDecl {
        spec: spec.clone(),
        name: None,
    }));
    for raw in &decl.named {
        let Some((name, spec)) = raw.split_once('=') else {
            bail!("invalid --named value '{raw}' (expected NAME=SPEC)");
        };
        decls.push(OptionDecl {
            spec: spec.to_string(),
            name: Some(name.to_string()),
        });
    }

    if decls.is_empty() {
        bail!("no options declared (use --spec, --named or an optspec.json manifest)");
    }

    let mut builder = RegistryBuilder::with_config(config);
    for d in &decls {
        builder
            .option_named(&d.spec, d.name.as_deref().unwrap_or(""))
            .with_context(|| format!("failed to declare '{}'", d.spec))?;
    }
    builder.freeze().context("invalid option declarations")
}

fn match_command(args: MatchArgs) -> Result<()> {
    tracing::debug!("executing match command");

    let registry = build_registry(&args.decl)?;
    let matches = registry
        .parse(&args.tokens)
        .context("failed to match arguments")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else {
        print!("{}", render::matches(&matches));
    }
    Ok(())
}

fn describe_command(args: DescribeArgs) -> Result<()> {
    tracing::debug!("executing describe command");

    let registry = build_registry(&args.decl)?;
    if args.json {
        let report = DescribeReport {
            config: registry.config(),
            options: registry.iter().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::describe(registry.config(), registry.iter()));
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
