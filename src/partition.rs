//! Work partitioning: assigns input files (and, when they don't divide
//! evenly, within-file strides) to ranks
//!
//! Pure and transport-free so the assignment math can be exercised without
//! any filesystem or collective machinery.

/// How a rank participates in a single shared file: it reads residues at
/// indices `first, first + stride, first + 2*stride, …` within that file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedFileShare {
    pub file_index: usize,
    pub first: usize,
    pub stride: usize,
}

/// The full assignment for one rank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPlan {
    /// Files this rank owns outright and processes serially, whole.
    pub whole_files: Vec<usize>,
    /// The one file this rank shares with other ranks, if any.
    pub shared: Option<SharedFileShare>,
}

/// Computes rank `rank`'s share of `num_files` input files across `size`
/// ranks, per the following deterministic rule:
///
/// 1. Rank `r` whole-owns files at indices `r, r+P, r+2P, …` —
///    `floor(num_files / size)` files.
/// 2. The last `R = num_files mod size` files are shared. Base partner count
///    per shared file is `k = floor(size / R)`; a rank's shared-file index is
///    `(num_files - R) + (rank mod R)`; its stride is `k`, or `k+1` for the
///    first `size - k*R` of the `R` shared files; its starting offset within
///    that file is `floor(rank / R)`.
///
/// Together this assigns every `(file, index)` pair to exactly one rank,
/// whether or not `num_files` divides evenly by `size`.
pub fn plan(num_files: usize, rank: usize, size: usize) -> WorkPlan {
    assert!(size > 0, "world size must be positive");
    assert!(rank < size, "rank must be < size");

    let num_whole = num_files / size;
    let whole_files = (0..num_whole).map(|i| rank + i * size).collect();

    let remaining = num_files % size;
    let shared = if remaining == 0 {
        None
    } else {
        let k = size / remaining;
        let shared_slot = rank % remaining;
        let file_index = (num_files - remaining) + shared_slot;

        let first = rank / remaining;

        let unassigned = size - (k * remaining);
        let stride = if shared_slot < unassigned { k + 1 } else { k };

        Some(SharedFileShare {
            file_index,
            first,
            stride,
        })
    };

    WorkPlan {
        whole_files,
        shared,
    }
}
