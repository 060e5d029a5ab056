//! The collective transport adapter: a thin capability interface over a
//! ranked, point-to-point message-passing substrate
//!
//! Any conforming transport suffices for [`crate::gather::hypercube_gather`];
//! two concrete adapters ship with this crate — [`InProcessTransport`] for a
//! single-process simulation (the default, and what the test suite drives),
//! and, behind the `mpi` feature, a real MPI-backed adapter.

pub mod in_process;

#[cfg(feature = "mpi")]
mod mpi_transport;

pub use in_process::{build_world, InProcessTransport};

#[cfg(feature = "mpi")]
pub use mpi_transport::MpiTransport;

use crate::error::Result;

/// Capability interface a hypercube gather (or any other collective) needs
/// from its transport.
///
/// Implementors send/receive whole messages; the two-message length-prefix
/// protocol that `send`/`recv` build on top of FIFO delivery is the
/// responsibility of the gather algorithm, not of this trait.
#[auto_impl::auto_impl(&mut, Box)]
pub trait CollectiveTransport {
    /// This process's rank within the world, fixed at construction.
    fn rank(&self) -> i32;

    /// Total number of ranks in the world, fixed at construction.
    fn size(&self) -> i32;

    /// Blocking send of `bytes` to `dest`. Delivery is reliable and in-order
    /// per `(rank(), dest)` pair.
    fn send(&mut self, dest: i32, bytes: &[u8]) -> Result<()>;

    /// Blocking receive of the next pending message from `src`.
    fn recv(&mut self, src: i32) -> Result<Vec<u8>>;

    /// Terminates the entire world. Never returns normally.
    fn abort(&mut self, message: &str) -> !;
}
