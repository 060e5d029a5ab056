//! A channel-backed [`CollectiveTransport`] that simulates a ranked world
//! within a single OS process, one thread per simulated rank
//!
//! Each simulated rank still runs its share of the de-replication pipeline
//! on exactly one thread end-to-end — the single-threaded-per-rank model
//! still holds; only the substrate underneath `send`/`recv` happens to be
//! real threads rather than a real cluster.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use crate::error::{Result, TransportError};
use crate::transport::CollectiveTransport;

/// Builds a world of `size` in-process transports, one per rank, wired with
/// an `mpsc` channel for every ordered `(src, dest)` pair so delivery is
/// FIFO per pair as the transport contract requires.
pub fn build_world(size: usize) -> Vec<InProcessTransport> {
    assert!(size > 0, "world size must be positive");

    // senders[src][dest] / receivers[src][dest] mirror each other; a given
    // rank keeps its own outgoing senders and incoming receivers.
    let mut senders: Vec<Vec<Option<Sender<Vec<u8>>>>> = (0..size).map(|_| Vec::new()).collect();
    let mut receivers: Vec<Vec<Option<Receiver<Vec<u8>>>>> =
        (0..size).map(|_| Vec::new()).collect();

    for _ in 0..size {
        senders.iter_mut().for_each(|row| row.push(None));
        receivers.iter_mut().for_each(|row| row.push(None));
    }

    for src in 0..size {
        for dest in 0..size {
            if src == dest {
                continue;
            }
            let (tx, rx) = std::sync::mpsc::channel();
            senders[src][dest] = Some(tx);
            receivers[dest][src] = Some(rx);
        }
    }

    let aborted = Arc::new(std::sync::atomic::AtomicBool::new(false));

    (0..size)
        .map(|rank| InProcessTransport {
            rank: rank as i32,
            size: size as i32,
            senders: std::mem::take(&mut senders[rank]),
            receivers: std::mem::take(&mut receivers[rank]),
            aborted: aborted.clone(),
        })
        .collect()
}

pub struct InProcessTransport {
    rank: i32,
    size: i32,
    senders: Vec<Option<Sender<Vec<u8>>>>,
    receivers: Vec<Option<Receiver<Vec<u8>>>>,
    aborted: Arc<std::sync::atomic::AtomicBool>,
}

impl CollectiveTransport for InProcessTransport {
    fn rank(&self) -> i32 {
        self.rank
    }

    fn size(&self) -> i32 {
        self.size
    }

    fn send(&mut self, dest: i32, bytes: &[u8]) -> Result<()> {
        let tx = self.senders[dest as usize].as_ref().ok_or_else(|| {
            TransportError::Send {
                dest,
                reason: "no channel to destination rank".to_string(),
            }
        })?;
        tx.send(bytes.to_vec()).map_err(|e| {
            TransportError::Send {
                dest,
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn recv(&mut self, src: i32) -> Result<Vec<u8>> {
        let rx = self.receivers[src as usize].as_ref().ok_or_else(|| {
            TransportError::Recv {
                src,
                reason: "no channel from source rank".to_string(),
            }
        })?;
        rx.recv().map_err(|e| {
            TransportError::Recv {
                src,
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn abort(&mut self, message: &str) -> ! {
        self.aborted
            .store(true, std::sync::atomic::Ordering::SeqCst);
        tracing::error!(rank = self.rank, size = self.size, "FATAL ERROR: {message}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_recv_roundtrip_between_two_ranks() {
        let mut world = build_world(2);
        let mut r1 = world.pop().unwrap();
        let mut r0 = world.pop().unwrap();
        r0.send(1, b"hello").unwrap();
        let got = r1.recv(0).unwrap();
        assert_eq!(got, b"hello");
    }

    #[test]
    fn messages_are_fifo_per_ordered_pair() {
        let mut world = build_world(2);
        let mut r1 = world.pop().unwrap();
        let mut r0 = world.pop().unwrap();
        r0.send(1, b"first").unwrap();
        r0.send(1, b"second").unwrap();
        assert_eq!(r1.recv(0).unwrap(), b"first");
        assert_eq!(r1.recv(0).unwrap(), b"second");
    }

    #[test]
    fn rank_and_size_are_fixed_at_construction() {
        let world = build_world(4);
        for (i, t) in world.iter().enumerate() {
            assert_eq!(t.rank(), i as i32);
            assert_eq!(t.size(), 4);
        }
    }
}
