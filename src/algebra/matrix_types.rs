#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which part of a matrix is held in CSC storage.
///
/// Triangular kinds describe symmetric (or Hermitian) matrices of which only
/// one triangle, including the diagonal, is stored.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StorageKind {
    /// every entry stored
    #[default]
    General,
    /// rows `>= col` only
    LowerTriangular,
    /// rows `<= col` only
    UpperTriangular,
    /// a symmetric matrix that has been expanded to full storage
    ExpandedSymmetric,
}

impl StorageKind {
    /// true for the two single-triangle kinds
    pub fn is_triangular(&self) -> bool {
        matches!(self, StorageKind::LowerTriangular | StorageKind::UpperTriangular)
    }

    /// true if the stored data represents a symmetric matrix
    pub fn is_symmetric(&self) -> bool {
        !matches!(self, StorageKind::General)
    }
}

/// Matrix orientation marker
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum MatrixShape {
    /// Normal matrix orientation
    N,
    /// Transposed matrix orientation
    T,
}
