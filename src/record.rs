//! Transient sequence records and the per-unique replica records they collapse into

/// A single `(label, sequence)` pair as read from a FASTA file
///
/// Transient: produced by [`crate::reader::FastaReader`], consumed by
/// [`crate::store::ReplicaStore::insert`], and released immediately after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub label: Vec<u8>,
    pub sequence: Vec<u8>,
}
impl SequenceRecord {
    pub fn new(label: Vec<u8>, sequence: Vec<u8>) -> Self {
        Self { label, sequence }
    }

    pub fn label_length(&self) -> usize {
        self.label.len()
    }

    pub fn seq_length(&self) -> usize {
        self.sequence.len()
    }
}

/// Per-unique-sequence entity: the canonical bytes, an occurrence count, and
/// the ordered labels that collapsed onto it
///
/// Invariant: `count == labels.len()` at every observable moment, except
/// transiently during merge-unpack (see [`crate::codec::unpack_merge`]) where
/// an empty record is created before its labels are appended — a window never
/// visible outside that single-threaded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaRecord {
    sequence: Vec<u8>,
    count: u32,
    labels: Vec<Vec<u8>>,
}
impl ReplicaRecord {
    /// Creates a replica with one initial label (`count = 1`)
    pub fn new_with(sequence: Vec<u8>, label: Vec<u8>) -> Self {
        Self {
            sequence,
            count: 1,
            labels: vec![label],
        }
    }

    /// Creates an empty replica (`count = 0`, no labels) — used only while
    /// merging a wire buffer into the store
    pub fn new_empty(sequence: Vec<u8>) -> Self {
        Self {
            sequence,
            count: 0,
            labels: Vec::new(),
        }
    }

    /// Appends a label in arrival order and increments `count`
    pub fn add(&mut self, label: Vec<u8>) {
        self.labels.push(label);
        self.count += 1;
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_with_has_one_label() {
        let r = ReplicaRecord::new_with(b"AAA".to_vec(), b"l1".to_vec());
        assert_eq!(r.count(), 1);
        assert_eq!(r.labels(), &[b"l1".to_vec()]);
        assert_eq!(r.sequence(), b"AAA");
    }

    #[test]
    fn add_preserves_arrival_order() {
        let mut r = ReplicaRecord::new_with(b"AAA".to_vec(), b"l1".to_vec());
        r.add(b"l2".to_vec());
        r.add(b"l3".to_vec());
        assert_eq!(r.count(), 3);
        assert_eq!(
            r.labels(),
            &[b"l1".to_vec(), b"l2".to_vec(), b"l3".to_vec()]
        );
    }

    #[test]
    fn new_empty_has_no_labels() {
        let r = ReplicaRecord::new_empty(b"CCC".to_vec());
        assert_eq!(r.count(), 0);
        assert!(r.labels().is_empty());
    }
}
