//! # Language Module
//!
//! This is a container for language modules.  Language modules decode the
//! binary program formats found on CoCo diskettes into readable source.
//! At present there is one language, Color BASIC (with its Extended, Disk,
//! and Super Extended supersets), in `basic`.

pub mod basic;
