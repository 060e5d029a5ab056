//! MPI-backed [`CollectiveTransport`], enabled by the `mpi` cargo feature
//!
//! Thin wrapper over `rsmpi`'s point-to-point API (`MPI_Send`/`MPI_Recv`
//! underneath); everything above this module is transport-agnostic.

use mpi::point_to_point as p2p;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;
use mpi::Tag;

use crate::error::Result;
use crate::transport::CollectiveTransport;

/// Tag used for every message on the wire; the gather never has more than
/// one outstanding message per ordered pair, so a single tag suffices.
const DEREP_TAG: Tag = 0;

pub struct MpiTransport {
    world: SimpleCommunicator,
}

impl MpiTransport {
    /// Initializes MPI and wraps the world communicator. The returned
    /// `mpi::environment::Universe` must outlive this transport; callers
    /// keep it alive for the process lifetime (see `main.rs`).
    pub fn new(universe: &mpi::environment::Universe) -> Self {
        Self {
            world: universe.world(),
        }
    }
}

impl CollectiveTransport for MpiTransport {
    fn rank(&self) -> i32 {
        self.world.rank()
    }

    fn size(&self) -> i32 {
        self.world.size()
    }

    fn send(&mut self, dest: i32, bytes: &[u8]) -> Result<()> {
        self.world.process_at_rank(dest).send_with_tag(bytes, DEREP_TAG);
        Ok(())
    }

    fn recv(&mut self, src: i32) -> Result<Vec<u8>> {
        let (bytes, _status): (Vec<u8>, p2p::Status) = self
            .world
            .process_at_rank(src)
            .receive_vec_with_tag(DEREP_TAG);
        Ok(bytes)
    }

    fn abort(&mut self, message: &str) -> ! {
        tracing::error!(rank = self.rank(), size = self.size(), "FATAL ERROR: {message}");
        self.world.abort(1);
        unreachable!("MPI_Abort does not return")
    }
}
