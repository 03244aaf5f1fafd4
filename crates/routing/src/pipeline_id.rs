//! Pipeline identifier type

use std::fmt;

/// Compiled destination identifier
///
/// Assigned by the `PipelineRegistry` in first-seen order, so it doubles
/// as an index into per-pipeline storage such as the dispatcher's sinks.
///
/// ```
/// use sigroute_routing::PipelineId;
///
/// let id = PipelineId::new(3);
/// assert_eq!(id.as_usize(), 3);
/// assert_eq!(id.to_string(), "pipeline:3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineId(u16);

impl PipelineId {
    /// Maximum number of distinct pipelines per routing table
    pub const MAX: usize = u16::MAX as usize + 1;

    #[inline]
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        self.0
    }

    /// Index as usize (for slice indexing)
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pipeline:{}", self.0)
    }
}

impl From<u16> for PipelineId {
    #[inline]
    fn from(index: u16) -> Self {
        Self::new(index)
    }
}

impl From<PipelineId> for usize {
    #[inline]
    fn from(id: PipelineId) -> Self {
        id.as_usize()
    }
}
