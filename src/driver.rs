//! Work partitioner driver: assigns files to this rank and runs the local
//! de-replication loop, then gathers into the global store
//!
//! Control flow: driver → partitioner → per-file reader → local store
//! inserts → hypercube gather.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{ReaderError, Result};
use crate::gather::hypercube_gather;
use crate::partition::{self, SharedFileShare};
use crate::reader::FastaReader;
use crate::store::ReplicaStore;
use crate::transport::CollectiveTransport;

fn open(path: &Path) -> Result<FastaReader<BufReader<File>>> {
    let file = File::open(path).map_err(|e| ReaderError::InputOpen {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(FastaReader::new(BufReader::new(file)))
}

/// De-replicates one whole file, serially, against `store`. This rank is the
/// only one that will ever visit the file, so ordinary sequential `next()`
/// suffices.
fn dereplicate_whole_file(path: &Path, store: &mut ReplicaStore) -> Result<()> {
    let mut reader = open(path)?;
    while let Some(record) = reader.next()? {
        store.insert(record);
    }
    Ok(())
}

/// De-replicates this rank's interleaved share of a file other ranks are
/// reading concurrently — indices `first, first+stride, first+2*stride, …`.
/// Each partner opens its own handle; the index-based `nth` guarantees no
/// two partners observe the same record.
fn dereplicate_shared_file(
    path: &Path,
    share: SharedFileShare,
    store: &mut ReplicaStore,
) -> Result<()> {
    let mut reader = open(path)?;
    let mut idx = share.first;
    while let Some(record) = reader.nth(idx)? {
        store.insert(record);
        idx += share.stride;
    }
    Ok(())
}

/// Runs this rank's local ingestion over `files`, given its `rank` and
/// world `size`, populating `store`.
pub fn ingest_local(files: &[impl AsRef<Path>], rank: usize, size: usize, store: &mut ReplicaStore) -> Result<()> {
    let plan = partition::plan(files.len(), rank, size);

    for &file_index in &plan.whole_files {
        dereplicate_whole_file(files[file_index].as_ref(), store)?;
    }

    if let Some(share) = plan.shared {
        dereplicate_shared_file(files[share.file_index].as_ref(), share, store)?;
    }

    Ok(())
}

/// Runs the full distributed de-replication for this rank: local ingestion
/// followed by the hypercube gather. On return, `store` holds this rank's
/// final contribution — the merged global store on rank 0 (and any other
/// surviving receiver), or an emptied-out store on a rank that has sent and
/// left the collective.
pub fn run<T: CollectiveTransport>(
    transport: &mut T,
    files: &[impl AsRef<Path>],
    store: &mut ReplicaStore,
) -> Result<()> {
    let rank = transport.rank() as usize;
    let size = transport.size() as usize;

    ingest_local(files, rank, size, store)?;
    hypercube_gather(transport, store)?;

    Ok(())
}
