use thiserror::Error;

/// Construction-time errors.  These are all programming errors in the caller's
/// leg sequence and are rejected before any line is touched; once the engine
/// is running, the only failures are PHY I/O errors, which propagate as the
/// `Phy` implementation's own error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("value {value:#x} does not fit in {width} bits")]
    WidthOverflow { value: u64, width: usize },
    #[error("shift legs require a non-empty payload")]
    EmptyPayload,
    #[error("chunk width of {width} bits is not a whole number of bytes")]
    ChunkWidth { width: usize },
    #[error("block of {len} bytes is not a whole number of {chunk_bytes}-byte chunks")]
    RaggedBlock { len: usize, chunk_bytes: usize },
}
