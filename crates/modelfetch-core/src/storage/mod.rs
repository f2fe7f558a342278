//! Staged file I/O and publication.
//!
//! Segmented transfers write into a preallocated [`StagedFile`]; a finished
//! file is moved into its destination by [`publish`].

mod publish;
mod staged;

pub use publish::{part_path, publish};
pub use staged::StagedFile;
