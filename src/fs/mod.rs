//! # File System Module
//!
//! This is a container for file system modules.  File system modules handle
//! interactions with directories and files.  They retain their own copy of
//! the allocation data in a convenient form, writing any change through to
//! the owned disk image.  N.b. you still have to explicitly save the image
//! if you want changes to be permanent.
//!
//! At present the only file system is `decb`, the Disk Extended Color BASIC
//! format found on nearly every CoCo diskette.  (OS-9/RBF diskettes are a
//! different animal and are not handled here.)

pub mod decb;

/// Enumerates errors in matching an image to a file system.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("cannot match any file system")]
    FileSystemMismatch
}

/// Flattened representation of a fixed layout disk structure.
/// Transfers between the structure and its on-disk bytes are explicit,
/// so every field lands at a known offset.
pub trait DiskStruct {
    /// Create the structure in its freshly-formatted state
    fn new() -> Self where Self: Sized;
    /// Create structure using flattened bytes (typically from disk)
    fn from_bytes(dat: &[u8]) -> Self where Self: Sized;
    /// Return flattened bytes (typically written to disk)
    fn to_bytes(&self) -> Vec<u8>;
    /// Update with flattened bytes
    fn update_from_bytes(&mut self,dat: &[u8]);
    /// Length of the flattened structure
    fn len(&self) -> usize;
}
