//! Command-line surface
//!
//! Thin by design: argument tokenizing is `clap`'s job, but the
//! "required together" and "no inputs" validation rules want an informative
//! message and a clean exit rather than a hard parse failure, so they are
//! checked explicitly in [`RunConfig::from_cli`] rather than encoded as
//! `clap` constraints.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{CliError, Result};

/// De-replicate FASTA files across a ranked message-passing world.
#[derive(Parser, Debug)]
#[command(name = "derep", version, about)]
pub struct Cli {
    /// Execute de-replication. Currently the only supported command.
    #[arg(long)]
    pub derep: bool,

    /// Path to the output FASTA file. Required with --derep.
    #[arg(long)]
    pub fasta: Option<PathBuf>,

    /// Path to the output OTU map file. Required with --derep.
    #[arg(long)]
    pub map: Option<PathBuf>,

    /// Skip abundance sorting before writing output.
    #[arg(long, alias = "suppress_sort")]
    pub suppress_sort: bool,

    /// Number of simulated ranks to run when not launched under MPI.
    /// Defaults to the number of available CPUs.
    #[arg(short = 'n', long, default_value_t = num_cpus::get())]
    pub ranks: usize,

    /// Input FASTA files.
    pub inputs: Vec<PathBuf>,
}

/// Validated, immutable configuration for one run, assembled once from the
/// parsed CLI flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub fasta_out: PathBuf,
    pub map_out: PathBuf,
    pub suppress_sort: bool,
    pub ranks: usize,
    pub inputs: Vec<PathBuf>,
}

impl RunConfig {
    /// Validates `cli` against the CLI error policy (`BadCliOptions`,
    /// `UnsupportedCommand`). Returns `Ok(None)` when validation fails in a
    /// way that should print an informative message and exit 0 with no
    /// work done, rather than a hard parse failure.
    pub fn from_cli(cli: Cli) -> Result<Option<Self>> {
        if !cli.derep {
            return Err(CliError::UnsupportedCommand(
                "only --derep is currently supported".to_string(),
            )
            .into());
        }

        if cli.inputs.is_empty() {
            return Ok(None);
        }

        let (fasta_out, map_out) = match (cli.fasta, cli.map) {
            (Some(f), Some(m)) => (f, m),
            (fasta, map) => {
                tracing::info!(
                    "If doing de-replication, both --fasta and --map must be given. fasta={:?} map={:?}",
                    fasta,
                    map,
                );
                return Ok(None);
            }
        };

        Ok(Some(Self {
            fasta_out,
            map_out,
            suppress_sort: cli.suppress_sort,
            ranks: cli.ranks.max(1),
            inputs: cli.inputs,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Cli {
        Cli {
            derep: true,
            fasta: Some(PathBuf::from("out.fa")),
            map: Some(PathBuf::from("out.map")),
            suppress_sort: false,
            ranks: 1,
            inputs: vec![PathBuf::from("a.fa")],
        }
    }

    #[test]
    fn valid_derep_invocation_produces_a_config() {
        let cfg = RunConfig::from_cli(base()).unwrap().unwrap();
        assert_eq!(cfg.fasta_out, PathBuf::from("out.fa"));
        assert_eq!(cfg.inputs, vec![PathBuf::from("a.fa")]);
    }

    #[test]
    fn missing_fasta_is_bad_options_not_fatal() {
        let mut cli = base();
        cli.fasta = None;
        let cfg = RunConfig::from_cli(cli).unwrap();
        assert!(cfg.is_none());
    }

    #[test]
    fn no_inputs_is_bad_options_not_fatal() {
        let mut cli = base();
        cli.inputs.clear();
        let cfg = RunConfig::from_cli(cli).unwrap();
        assert!(cfg.is_none());
    }

    #[test]
    fn missing_derep_flag_is_unsupported_command() {
        let mut cli = base();
        cli.derep = false;
        assert!(RunConfig::from_cli(cli).is_err());
    }
}
