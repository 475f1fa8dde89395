use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by sparse matrix format checks.
pub enum SparseFormatError {
    /// Matrix dimension fields and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// Data is not sorted by row index within each column
    #[error("Data is not sorted by row index within each column")]
    BadRowOrdering,
    #[error("Row value exceeds the matrix row dimension")]
    /// Row value exceeds the matrix row dimension
    BadRowval,
    #[error("Bad column pointer values")]
    /// Matrix column pointer values are defective
    BadColptr,
    #[error("Entry in column {column} lies outside the stored triangle")]
    /// Row index violates the declared triangular storage
    BadTriangle {
        /// offending column
        column: usize,
    },
    #[error("Matrix data is undefined")]
    /// Column pointer array is absent
    Undefined,
}

/// Capacity failures of the two-phase size / commit protocol.
///
/// Operations that write into caller supplied storage never grow it.  When
/// the storage is too small they report how much was needed instead, so that
/// the caller can allocate once and retry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    /// The output needs `required` entries but only `available` exist.
    /// Nothing has been written.
    #[error("insufficient capacity: {required} entries required, {available} available")]
    Insufficient { required: usize, available: usize },
    /// Storage ran out while filling `column`.  Column pointers of all
    /// earlier columns are valid.
    #[error("storage overflow while filling column {column}")]
    Overflow { column: usize },
}

/// Error type returned by sparse matrix operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SparseMatrixError {
    #[error("Matrix data is undefined")]
    DataUndefined,
    #[error("Matrix dimensions are incompatible")]
    IncompatibleSizes,
    #[error("Matrix is not square")]
    NotSquare,
    #[error(transparent)]
    Capacity(#[from] CapacityError),
}
