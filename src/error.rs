//! Error types for the de-replication engine
//!
//! Mirrors one concern per enum — reader, codec, transport, CLI — rolled up
//! into a single [`DerepError`] that the rest of the crate returns as its
//! [`Result`] alias target.

/// Errors raised while streaming `(label, sequence)` records out of a FASTA file
#[derive(thiserror::Error, Debug)]
pub enum ReaderError {
    #[error("cannot open input file {path}: {source}")]
    InputOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("header line at record {0} is not followed by a residue line")]
    MissingResidueLine(usize),

    #[error("header at record {0} has no label token after '>'")]
    UnparseableHeader(usize),

    #[error("line at record {0} exceeds the {1}-byte maximum line length")]
    LineTooLong(usize, usize),

    #[error("I/O error reading record {0}: {1}")]
    Io(usize, #[source] std::io::Error),
}

/// Errors raised while packing or unpacking a [`crate::store::ReplicaStore`]
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("wire buffer truncated: declared length {declared} but only {remaining} bytes remain")]
    Truncated { declared: usize, remaining: usize },
}

/// Errors raised by a [`crate::transport::CollectiveTransport`] implementation
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("send to rank {dest} failed: {reason}")]
    Send { dest: i32, reason: String },

    #[error("recv from rank {src} failed: {reason}")]
    Recv { src: i32, reason: String },

    #[error("the collective was aborted")]
    Aborted,
}

/// Errors raised while validating command-line options
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    BadOptions(String),

    #[error("unsupported command: {0}")]
    UnsupportedCommand(String),
}

/// The crate's unified error type
#[derive(thiserror::Error, Debug)]
pub enum DerepError {
    #[error(transparent)]
    Reader(#[from] ReaderError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Cli(#[from] CliError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DerepError>;
