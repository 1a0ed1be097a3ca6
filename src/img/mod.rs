//! # Disk Image Module
//!
//! This module owns the raw disk image, i.e., the bytes that would be stored
//! on the host file system.  DSK images are a plain sequential dump of the
//! already-decoded 256 byte sectors.  JVC images are the same dump with an
//! optional header in front of it; the header length is recovered as the
//! image length modulo the sector size, so plain DSK is just the zero-header
//! case.  There are no checksums, gaps, or sync patterns to worry about.
//!
//! The file system layer (`fs::decb`) requests sectors by (track, sector)
//! and treats tracks as logical, i.e., sequential within the image.  For
//! double sided images the second side only scales capacity; the directory
//! track is still found at logical track 17.

pub mod jvc;

use log::{error,warn};

/// Enumerates disk image errors.  The `Display` trait will print the equivalent long message.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("image does not contain a whole disk")]
    InvalidImage,
    #[error("unsupported disk geometry")]
    UnsupportedGeometry,
    #[error("unable to access sector")]
    SectorAccess
}

/// Geometry of a DSK/JVC image, either the defaults or decoded from the header.
/// Header bytes past the fifth are ignored but preserved on save.
#[derive(PartialEq,Clone,Copy,Debug)]
pub struct Geometry {
    pub sectors_per_track: u8,
    pub sides: u8,
    pub sector_size: usize,
    pub first_sector_id: u8,
    pub attribute: u8
}

impl Geometry {
    /// The standard CoCo diskette layout: 18 sectors of 256 bytes, single sided, sectors counted from 1.
    pub fn standard() -> Self {
        Self {
            sectors_per_track: 18,
            sides: 1,
            sector_size: 256,
            first_sector_id: 1,
            attribute: 0
        }
    }
    /// Decode the leading JVC header bytes, falling back on the standard value
    /// for any field the header is too short to hold.
    pub fn from_header(dat: &[u8]) -> Result<Self,Error> {
        let mut ans = Self::standard();
        if dat.len() >= 1 {
            ans.sectors_per_track = dat[0];
        }
        if dat.len() >= 2 {
            ans.sides = dat[1];
        }
        if dat.len() >= 3 {
            if dat[2] > 3 {
                error!("sector size code {} is out of range 0-3",dat[2]);
                return Err(Error::UnsupportedGeometry);
            }
            ans.sector_size = 128 << dat[2];
        }
        if dat.len() >= 4 {
            ans.first_sector_id = match dat[3] {
                0 | 1 => 1,
                id => {
                    warn!("first sector id {} is malformed, assuming 1",id);
                    1
                }
            };
        }
        if dat.len() >= 5 {
            ans.attribute = dat[4];
        }
        if ans.sectors_per_track == 0 {
            error!("header declares 0 sectors per track");
            return Err(Error::UnsupportedGeometry);
        }
        if ans.sides == 0 {
            warn!("header declares 0 sides, assuming 1");
            ans.sides = 1;
        }
        Ok(ans)
    }
    /// bytes occupied by one logical track
    pub fn track_bytes(&self) -> usize {
        self.sectors_per_track as usize * self.sector_size
    }
}

/// Header length is defined as the residue of the image length modulo the sector size.
pub fn detect_header(image_len: usize) -> usize {
    image_len % 256
}
