//! Output writer: emits the de-replicated FASTA and its OTU map
//!
//! Runs on rank 0 only, after the gather (and optional sort). Takes any
//! `Write` so it can be driven against an in-memory buffer in tests without
//! touching the filesystem.

use std::io::Write;

use crate::error::Result;
use crate::store::ReplicaStore;

/// Writes one FASTA block per replica record: `>Seq_{i} count={c}` followed
/// by the sequence, in the store's current iteration order.
pub fn write_fasta<W: Write>(store: &ReplicaStore, out: &mut W) -> Result<()> {
    let mut int_buf = itoa::Buffer::new();
    for (i, record) in store.iter().enumerate() {
        out.write_all(b">Seq_")?;
        out.write_all(int_buf.format(i).as_bytes())?;
        out.write_all(b" count=")?;
        out.write_all(int_buf.format(record.count()).as_bytes())?;
        out.write_all(b"\n")?;
        out.write_all(record.sequence())?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Writes the OTU map: one tab-separated line per replica record, no header
/// and no trailing blank line.
pub fn write_otu_map<W: Write>(store: &ReplicaStore, out: &mut W) -> Result<()> {
    let mut int_buf = itoa::Buffer::new();
    for (i, record) in store.iter().enumerate() {
        out.write_all(b"Seq_")?;
        out.write_all(int_buf.format(i).as_bytes())?;
        for label in record.labels() {
            out.write_all(b"\t")?;
            out.write_all(label)?;
        }
        out.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SequenceRecord;

    fn rec(label: &str, seq: &str) -> SequenceRecord {
        SequenceRecord::new(label.as_bytes().to_vec(), seq.as_bytes().to_vec())
    }

    #[test]
    fn single_unique_fasta_and_map() {
        let mut s = ReplicaStore::new();
        s.insert(rec("l1", "AAA"));
        s.insert(rec("l2", "AAA"));

        let mut fasta = Vec::new();
        write_fasta(&s, &mut fasta).unwrap();
        assert_eq!(fasta, b">Seq_0 count=2\nAAA\n");

        let mut map = Vec::new();
        write_otu_map(&s, &mut map).unwrap();
        assert_eq!(map, b"Seq_0\tl1\tl2\n");
    }

    #[test]
    fn sorted_order_reflects_in_emission_index() {
        let mut s = ReplicaStore::new();
        s.insert(rec("l1", "AAA"));
        s.insert(rec("l2", "CCC"));
        s.insert(rec("l3", "AAA"));
        s.sort_by_abundance();

        let mut fasta = Vec::new();
        write_fasta(&s, &mut fasta).unwrap();
        let text = String::from_utf8(fasta).unwrap();
        assert!(text.starts_with(">Seq_0 count=2\nAAA\n"));
        assert!(text.contains(">Seq_1 count=1\nCCC\n"));
    }

    #[test]
    fn map_has_no_header_and_no_trailing_blank_line() {
        let mut s = ReplicaStore::new();
        s.insert(rec("l1", "AAA"));
        s.insert(rec("l2", "CCC"));
        let mut map = Vec::new();
        write_otu_map(&s, &mut map).unwrap();
        let text = String::from_utf8(map).unwrap();
        assert!(!text.ends_with("\n\n"));
        assert!(!text.starts_with('#'));
    }
}
