//! vigil CLI entrypoint.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use vigil_core::{offline_run, online_run, RunError, RunSummary};
use vigil_obs::PropertyConfig;
use vigil_oracle::{RpcOracle, ServiceName};
use vigil_trace::{export, CommandScript};

#[derive(Debug, Parser)]
#[command(name = "vigil")]
#[command(about = "step-by-step runtime monitoring of recorded traces against temporal properties")]
struct Cli {
    /// Log level.
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Stream a recorded trace to a remote monitoring service, one
    /// heartbeat per step
    Online {
        /// Built-in property name, or @path to a JSON definition.
        property: String,

        /// Monitoring service address (host:port).
        #[arg(long)]
        service: String,

        /// Hierarchical service name to bind.
        #[arg(long, default_value = "NuRV/Monitor/Service")]
        name: String,

        /// Recorded trace (CSV).
        trace: PathBuf,
    },

    /// Replay a whole recorded trace through the external checker and
    /// recover its verdict stream
    Offline {
        /// Built-in property name, or @path to a JSON definition.
        property: String,

        /// Path to the checker binary.
        #[arg(long)]
        tool: PathBuf,

        /// Model file handed to the checker.
        model: PathBuf,

        /// Recorded trace (CSV).
        trace: PathBuf,
    },

    /// Export the checker's trace document and command script without
    /// running anything
    Export {
        /// Built-in property name, or @path to a JSON definition.
        property: String,

        /// Recorded trace (CSV).
        trace: PathBuf,

        /// Output path for the XML trace document; the command script
        /// lands next to it with a .cmd extension.
        out: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(&cli.log) {
        eprintln!("warning: failed to init tracing: {err:#}");
    }

    match run_command(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // A checker failure still carries whatever accumulated, but
            // it must never read as a finished run.
            if let Some(RunError::Checker { partial, .. }) = err.downcast_ref::<RunError>() {
                eprintln!("run did not complete; partial (non-conclusive) results:");
                eprintln!("{}", partial.render());
            }
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

fn run_command(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Online {
            property,
            service,
            name,
            trace,
        } => {
            let property = load_property(&property)?;
            let name: ServiceName = name.parse()?;
            let mut oracle = RpcOracle::connect(&service, &name, property.property_index)
                .context("could not reach the monitoring service")?;
            let reader = open_trace(&trace)?;
            let summary = online_run(reader.lines(), &mut oracle, &property)?;
            print_summary(&summary);
            Ok(())
        }

        Command::Offline {
            property,
            tool,
            model,
            trace,
        } => {
            let property = load_property(&property)?;
            let reader = open_trace(&trace)?;
            let summary = offline_run(reader.lines(), &property, &tool, &model)?;
            print_summary(&summary);
            Ok(())
        }

        Command::Export {
            property,
            trace,
            out,
        } => {
            let property = load_property(&property)?;
            let reader = open_trace(&trace)?;
            let lines: Vec<String> = reader.lines().collect::<std::io::Result<_>>()?;
            let document = export(lines.iter(), &property.layout);

            let mut xml = BufWriter::new(
                File::create(&out)
                    .with_context(|| format!("failed to create {}", out.display()))?,
            );
            document.write_xml(&mut xml)?;

            let script_path = out.with_extension("cmd");
            let script = CommandScript {
                trace_path: out.clone(),
                property_index: property.property_index,
                past_time: property.past_time,
            };
            std::fs::write(&script_path, script.render())
                .with_context(|| format!("failed to write {}", script_path.display()))?;

            println!(
                "exported {} nodes to {} (script: {})",
                document.nodes.len(),
                out.display(),
                script_path.display()
            );
            Ok(())
        }
    }
}

fn load_property(spec: &str) -> anyhow::Result<PropertyConfig> {
    if let Some(path) = spec.strip_prefix('@') {
        PropertyConfig::from_file(Path::new(path))
            .with_context(|| format!("failed to load property definition {path}"))
    } else {
        Ok(PropertyConfig::builtin(spec)?)
    }
}

fn open_trace(path: &Path) -> anyhow::Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("failed to open trace {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn print_summary(summary: &RunSummary) {
    println!("{}", summary.render());
}
