use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use derep_collective::cli::{Cli, RunConfig};
use derep_collective::driver;
use derep_collective::output::{write_fasta, write_otu_map};
use derep_collective::store::ReplicaStore;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn finish(
    rank: i32,
    store: &mut ReplicaStore,
    suppress_sort: bool,
    fasta_out: &std::path::Path,
    map_out: &std::path::Path,
) -> Result<()> {
    if rank != 0 {
        return Ok(());
    }

    tracing::info!(
        "{} total sequences, {} unique sequences",
        store.count(),
        store.unique()
    );

    if !suppress_sort {
        store.sort_by_abundance();
    }

    let fasta_file = std::fs::File::create(fasta_out)
        .map_err(|e| anyhow::anyhow!("cannot open output FASTA {}: {e}", fasta_out.display()))?;
    let mut fasta_writer = std::io::BufWriter::new(fasta_file);
    write_fasta(store, &mut fasta_writer)?;

    let map_file = std::fs::File::create(map_out)
        .map_err(|e| anyhow::anyhow!("cannot open output OTU map {}: {e}", map_out.display()))?;
    let mut map_writer = std::io::BufWriter::new(map_file);
    write_otu_map(store, &mut map_writer)?;

    Ok(())
}

#[cfg(not(feature = "mpi"))]
fn run_in_process(cfg: RunConfig) -> Result<()> {
    let world = derep_collective::transport::build_world(cfg.ranks);
    let mut iter = world.into_iter();
    let mut rank0 = iter.next().expect("ranks >= 1");

    let mut handles = Vec::new();
    for mut transport in iter {
        let inputs = cfg.inputs.clone();
        handles.push(std::thread::spawn(move || -> Result<ReplicaStore> {
            let mut store = ReplicaStore::new();
            driver::run(&mut transport, &inputs, &mut store)?;
            Ok(store)
        }));
    }

    let mut store0 = ReplicaStore::new();
    driver::run(&mut rank0, &cfg.inputs, &mut store0)?;

    for handle in handles {
        handle.join().expect("worker thread panicked")?;
    }

    finish(0, &mut store0, cfg.suppress_sort, &cfg.fasta_out, &cfg.map_out)
}

#[cfg(feature = "mpi")]
fn run_mpi(cfg: RunConfig) -> Result<()> {
    use derep_collective::transport::{CollectiveTransport, MpiTransport};

    let universe = mpi::initialize().expect("MPI failed to initialize");
    let mut transport = MpiTransport::new(&universe);
    let rank = transport.rank();

    let mut store = ReplicaStore::new();
    driver::run(&mut transport, &cfg.inputs, &mut store)?;

    finish(rank, &mut store, cfg.suppress_sort, &cfg.fasta_out, &cfg.map_out)
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let cfg = match RunConfig::from_cli(cli) {
        Ok(Some(cfg)) => cfg,
        Ok(None) => {
            tracing::info!("Input files not provided or required output paths missing. Run `derep --help` for usage.");
            return Ok(());
        }
        Err(e) => {
            tracing::error!("FATAL ERROR: {e}");
            std::process::exit(1);
        }
    };

    #[cfg(feature = "mpi")]
    {
        run_mpi(cfg)
    }
    #[cfg(not(feature = "mpi"))]
    {
        run_in_process(cfg)
    }
}
