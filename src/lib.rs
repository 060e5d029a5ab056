//! Distributed exact de-replication of FASTA sequences
//!
//! Collapses identical sequence strings across one or more FASTA files into
//! a single representative each, counting occurrences and preserving the
//! set of original labels that collapsed onto it. Work is partitioned across
//! a fixed set of ranked worker processes and reduced to a single global
//! store at rank 0 via a hypercube gather (see [`gather`]).
//!
//! Out of scope, by design: approximate/similarity clustering (only
//! exact-string de-replication), streaming output before all inputs are
//! consumed, and fault tolerance across worker failure.

pub mod cli;
pub mod codec;
pub mod driver;
pub mod error;
pub mod gather;
pub mod output;
pub mod partition;
pub mod reader;
pub mod record;
pub mod store;
pub mod transport;

pub use error::{DerepError, Result};
pub use record::{ReplicaRecord, SequenceRecord};
pub use store::ReplicaStore;
