//! Command line shared by the generator binaries.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches, Parser};

use crate::config::Config;
use crate::error::Result;
use crate::generator::Generator;
use crate::synth::ConcernKind;
use crate::utils::bootstrap::init_tracing;

/// Arguments common to every generator.
#[derive(Parser, Debug)]
pub struct Args {
    /// Directory of the Go package declaring the interface
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Name of the interface to wrap
    #[arg(value_name = "INTERFACE_NAME")]
    pub interface: String,

    /// Backend library the generated code uses
    #[arg(value_name = "BACKEND")]
    pub backend: Option<String>,

    /// Configuration file (default: $WRAPGEN_CONFIG, then ./wrapgen.yaml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the generated source instead of writing it
    #[arg(long)]
    pub stdout: bool,
}

impl Args {
    /// Parse the process arguments for the `kind` generator.
    pub fn parse_for(kind: ConcernKind) -> Self {
        let command = Args::command()
            .name(kind.generator())
            .about(format!("Generate {} middleware for a Go interface", kind.description()))
            .after_help(format!("Backends: {} (default)", kind.backends().join(", ")));
        let matches = command.get_matches();
        Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }
}

/// Entry point of every generator binary.
pub fn run(kind: ConcernKind) -> ExitCode {
    let args = Args::parse_for(kind);
    init_tracing();

    match execute(kind, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", kind.generator(), e);
            ExitCode::FAILURE
        }
    }
}

fn execute(kind: ConcernKind, args: &Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let generator = Generator::new(kind, config);
    let generated = generator.generate(&args.source_dir, &args.interface, args.backend.as_deref())?;

    if args.stdout {
        print!("{}", generated.source);
        return Ok(());
    }

    generator.write(&generated)?;
    let shown = std::env::current_dir()
        .ok()
        .and_then(|cwd| generated.path.strip_prefix(cwd).ok().map(PathBuf::from))
        .unwrap_or_else(|| generated.path.clone());
    println!(
        "Wrote {} implementation of {:?} to {:?}",
        kind.file_prefix(),
        generated.interface,
        shown.display().to_string()
    );
    Ok(())
}
