use thiserror::Error;

/// Rejected sphere tessellation parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("sphere needs at least 3 slices, got {0}")]
    TooFewSlices(u32),

    #[error("sphere needs at least 2 sections, got {0}")]
    TooFewSections(u32),
}
