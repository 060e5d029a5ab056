//! Binary wire codec for a [`ReplicaStore`]
//!
//! Wire layout (all integers little-endian, lengths in bytes, sequence and
//! label bytes are raw — never null-terminated):
//!
//! ```text
//! header:   i32 total_count       // store.count()
//!           i32 unique_count      // store.unique()
//! record*:  i32 seq_length
//!           u8[seq_length] sequence_bytes
//!           i32 num_labels        // == record.count() in a well-formed store
//! label*:   i32 label_length
//!           u8[label_length] label_bytes
//! ```
//!
//! Exactly `unique_count` records follow, each followed by exactly
//! `num_labels` labels.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{CodecError, Result};
use crate::store::ReplicaStore;

/// Per-unique-sequence heuristic byte budget for the initial pack-buffer
/// capacity. Non-contractual: `Vec<u8>` growth makes under-estimation
/// harmless.
const SEQ_HEURISTIC_BYTES: usize = 500;

/// Per-label heuristic byte budget for the initial pack-buffer capacity.
const LABEL_HEURISTIC_BYTES: usize = 100;

fn write_i32(buf: &mut Vec<u8>, v: i32) {
    let mut tmp = [0u8; 4];
    LittleEndian::write_i32(&mut tmp, v);
    buf.extend_from_slice(&tmp);
}

fn read_i32(buf: &[u8], pos: &mut usize) -> Result<i32> {
    take(buf, pos, 4).map(|b| LittleEndian::read_i32(b))
}

fn take<'a>(buf: &'a [u8], pos: &mut usize, len: usize) -> Result<&'a [u8]> {
    if *pos + len > buf.len() {
        return Err(CodecError::Truncated {
            declared: len,
            remaining: buf.len().saturating_sub(*pos),
        }
        .into());
    }
    let slice = &buf[*pos..*pos + len];
    *pos += len;
    Ok(slice)
}

/// Serializes a store into a self-delimiting byte buffer
pub fn pack(store: &ReplicaStore) -> Vec<u8> {
    let capacity = 2 * 4
        + store.unique() * (SEQ_HEURISTIC_BYTES + 2 * 4)
        + store.count() as usize * (LABEL_HEURISTIC_BYTES + 4);
    let mut buf = Vec::with_capacity(capacity);

    write_i32(&mut buf, store.count() as i32);
    write_i32(&mut buf, store.unique() as i32);

    for record in store.iter() {
        write_i32(&mut buf, record.sequence().len() as i32);
        buf.extend_from_slice(record.sequence());
        write_i32(&mut buf, record.count() as i32);
        for label in record.labels() {
            write_i32(&mut buf, label.len() as i32);
            buf.extend_from_slice(label);
        }
    }

    buf
}

/// Merges a wire buffer into an existing (possibly non-empty) store
///
/// For each incoming unique sequence: if the key is already present its
/// labels are appended; otherwise a new empty replica is created then filled.
/// `store.count()` increases by the wire `total_count`; `store.unique()`
/// increases only by newly-inserted keys. Rejects (fatally) any buffer whose
/// declared length would read past the buffer end.
pub fn unpack_merge(store: &mut ReplicaStore, buf: &[u8]) -> Result<()> {
    let mut pos = 0usize;

    let total_count = read_i32(buf, &mut pos)?;
    let unique_count = read_i32(buf, &mut pos)?;

    store.add_total_count(total_count.max(0) as u64);

    for _ in 0..unique_count.max(0) {
        let seq_len = read_i32(buf, &mut pos)?;
        let sequence = take(buf, &mut pos, seq_len.max(0) as usize)?;
        let num_labels = read_i32(buf, &mut pos)?;

        let (record, _inserted) = store.entry_or_empty(sequence);
        // `record` is empty only transiently within this loop body: single
        // rank, single thread, no external reader can observe it mid-fill.
        for _ in 0..num_labels.max(0) {
            let label_len = read_i32(buf, &mut pos)?;
            let label = take(buf, &mut pos, label_len.max(0) as usize)?.to_vec();
            record.add(label);
        }
    }

    Ok(())
}
