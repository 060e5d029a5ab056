//! The hypercube gather: a recursive-doubling binary-exchange reduction that
//! merges every rank's local store into rank 0's
//!
//! ```text
//! mask := 2^floor(log2(size-1))
//! while mask != 0:
//!     partner := rank XOR mask
//!     if (rank AND mask) != 0:
//!         send(partner, pack(store)); return   // sender, done forever
//!     else if partner < size:
//!         unpack_merge(store, recv(partner))   // receiver, keep going
//!     mask >>= 1
//! ```
//!
//! At most `ceil(log2(size))` rounds. Rank 0 is always a receiver and ends
//! with the global store; every other rank sends exactly once and returns.
//! Tolerates non-power-of-two world sizes: receivers simply skip rounds
//! where their partner is beyond the world.

use byteorder::{ByteOrder, LittleEndian};

use crate::codec::{pack, unpack_merge};
use crate::error::Result;
use crate::store::ReplicaStore;
use crate::transport::CollectiveTransport;

/// Runs the gather over `store` using `transport`. On rank 0 (and any other
/// surviving receiver), `store` ends up holding the merge of every rank's
/// contribution; on a sending rank, `store`'s content has been handed off
/// and the rank has nothing further to do in the collective.
pub fn hypercube_gather<T: CollectiveTransport>(
    transport: &mut T,
    store: &mut ReplicaStore,
) -> Result<()> {
    let rank = transport.rank();
    let size = transport.size();

    if size <= 1 {
        return Ok(());
    }

    let mut mask = 1i32 << (31 - (size - 1).leading_zeros());

    while mask != 0 {
        let partner = rank ^ mask;
        if rank & mask != 0 {
            let wire = pack(store);
            send_framed(transport, partner, &wire)?;
            return Ok(());
        } else if partner < size {
            let wire = recv_framed(transport, partner)?;
            unpack_merge(store, &wire)?;
        }
        mask >>= 1;
    }

    Ok(())
}

/// Sends a 4-byte little-endian length prefix, then the payload — the wire
/// protocol the transport contract requires so the receiver can allocate
/// before reading the payload.
fn send_framed<T: CollectiveTransport>(transport: &mut T, dest: i32, payload: &[u8]) -> Result<()> {
    let mut len_buf = [0u8; 4];
    LittleEndian::write_u32(&mut len_buf, payload.len() as u32);
    transport.send(dest, &len_buf)?;
    transport.send(dest, payload)?;
    Ok(())
}

fn recv_framed<T: CollectiveTransport>(transport: &mut T, src: i32) -> Result<Vec<u8>> {
    let len_buf = transport.recv(src)?;
    let len = LittleEndian::read_u32(&len_buf) as usize;
    let payload = transport.recv(src)?;
    debug_assert_eq!(payload.len(), len);
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SequenceRecord;
    use crate::transport::in_process::build_world;

    fn rec(label: &str, seq: &str) -> SequenceRecord {
        SequenceRecord::new(label.as_bytes().to_vec(), seq.as_bytes().to_vec())
    }

    #[test]
    fn single_rank_gather_is_a_no_op() {
        let mut world = build_world(1);
        let mut t0 = world.pop().unwrap();
        let mut store = ReplicaStore::new();
        store.insert(rec("l1", "AAA"));
        hypercube_gather(&mut t0, &mut store).unwrap();
        assert_eq!(store.count(), 1);
        assert_eq!(store.unique(), 1);
    }

    #[test]
    fn two_rank_gather_merges_into_rank_zero() {
        let mut world = build_world(2);
        let mut t1 = world.pop().unwrap();
        let mut t0 = world.pop().unwrap();

        let mut s0 = ReplicaStore::new();
        s0.insert(rec("x", "GG"));
        let mut s1 = ReplicaStore::new();
        s1.insert(rec("y", "GG"));
        s1.insert(rec("z", "TT"));

        let handle = std::thread::spawn(move || {
            hypercube_gather(&mut t1, &mut s1).unwrap();
        });
        hypercube_gather(&mut t0, &mut s0).unwrap();
        handle.join().unwrap();

        assert_eq!(s0.count(), 3);
        assert_eq!(s0.unique(), 2);
        assert_eq!(s0.get(b"GG").unwrap().count(), 2);
        assert_eq!(s0.get(b"TT").unwrap().count(), 1);
    }

    #[test]
    fn five_rank_gather_every_sender_sends_exactly_once() {
        let world = build_world(5);
        let mut handles = Vec::new();
        let mut stores: Vec<ReplicaStore> = (0..5)
            .map(|r| {
                let mut s = ReplicaStore::new();
                s.insert(rec(&format!("l{r}"), &format!("SEQ{r}")));
                s
            })
            .collect();

        // Rank 0 runs on the main thread so we can inspect its store after.
        let mut iter = world.into_iter();
        let mut t0 = iter.next().unwrap();
        let mut s0 = stores.remove(0);

        for (i, mut t) in iter.enumerate() {
            let mut s = std::mem::replace(&mut stores[i], ReplicaStore::new());
            handles.push(std::thread::spawn(move || {
                hypercube_gather(&mut t, &mut s).unwrap();
            }));
        }

        hypercube_gather(&mut t0, &mut s0).unwrap();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(s0.count(), 5);
        assert_eq!(s0.unique(), 5);
        for r in 0..5 {
            assert!(s0.get(format!("SEQ{r}").as_bytes()).is_some());
        }
    }
}
