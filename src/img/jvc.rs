//! # Support for DSK/JVC disk images
//!
//! This is the sector store for the file system layer.  The image is held as
//! the raw header bytes plus one contiguous buffer of sector data.  Sector
//! reads and writes are in-memory; nothing touches the host file system until
//! the owner asks for `to_bytes` and writes it out.

use log::error;
use crate::img;
use crate::img::Geometry;
use crate::{STDRESULT,DYNERR};

pub fn file_extensions() -> Vec<String> {
    vec!["dsk".to_string(),"jvc".to_string()]
}

/// Wrapper for DSK/JVC data.  Owns the sector buffer exclusively.
pub struct Jvc {
    header: Vec<u8>,
    geometry: Geometry,
    data: Vec<u8>
}

impl Jvc {
    /// Create a blank image.  Real CoCo formatting leaves every data byte at 0xFF,
    /// which conveniently is also the never-used marker for FAT cells and
    /// directory slots.  The 5 byte JVC header is opt-in; the authentic
    /// real-hardware default is no header at all.
    pub fn create(tracks: u8,sides: u8,jvc_header: bool) -> Self {
        let geometry = Geometry {
            sides,
            ..Geometry::standard()
        };
        Self {
            header: match jvc_header {
                true => vec![18,sides,1,1,0],
                false => Vec::new()
            },
            geometry,
            data: vec![0xff;tracks as usize * sides as usize * geometry.track_bytes()]
        }
    }
    /// Interpret a bytestream as an image.  The header length falls out of the
    /// image length, and the header in turn gives the geometry.
    pub fn from_bytes(dat: &[u8]) -> Result<Self,DYNERR> {
        let header_len = img::detect_header(dat.len());
        let geometry = Geometry::from_header(&dat[..header_len])?;
        if (dat.len() - header_len) % geometry.sector_size != 0 {
            error!("sector area is not a whole number of {} byte sectors",geometry.sector_size);
            return Err(Box::new(img::Error::InvalidImage));
        }
        Ok(Self {
            header: dat[..header_len].to_vec(),
            geometry,
            data: dat[header_len..].to_vec()
        })
    }
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }
    pub fn header(&self) -> &[u8] {
        &self.header
    }
    /// count of logical tracks held by the sector area
    pub fn track_count(&self) -> usize {
        self.data.len() / self.geometry.track_bytes()
    }
    fn sector_offset(&self,track: u8,sector: u8) -> Result<usize,DYNERR> {
        let geom = &self.geometry;
        let last_sector = geom.first_sector_id + geom.sectors_per_track - 1;
        if track as usize >= self.track_count() || sector < geom.first_sector_id || sector > last_sector {
            error!("track/sector {}/{} outside range 0-{}/{}-{}",
                track,sector,self.track_count() as isize - 1,geom.first_sector_id,last_sector);
            return Err(Box::new(img::Error::SectorAccess));
        }
        Ok((track as usize * geom.sectors_per_track as usize + (sector - geom.first_sector_id) as usize) * geom.sector_size)
    }
    pub fn read_sector(&self,track: u8,sector: u8) -> Result<Vec<u8>,DYNERR> {
        let offset = self.sector_offset(track,sector)?;
        Ok(self.data[offset..offset+self.geometry.sector_size].to_vec())
    }
    /// Write a sector.  If `dat` is shorter than the sector, trailing bytes are unaffected.
    pub fn write_sector(&mut self,track: u8,sector: u8,dat: &[u8]) -> STDRESULT {
        let offset = self.sector_offset(track,sector)?;
        if dat.len() > self.geometry.sector_size {
            error!("sector data exceeds {} bytes",self.geometry.sector_size);
            return Err(Box::new(img::Error::SectorAccess));
        }
        self.data[offset..offset+dat.len()].copy_from_slice(dat);
        Ok(())
    }
    pub fn to_bytes(&self) -> Vec<u8> {
        [self.header.clone(),self.data.clone()].concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_image_size() {
        let img = Jvc::create(35,1,false);
        assert_eq!(img.to_bytes().len(),161280);
        assert_eq!(img.track_count(),35);
        let img = Jvc::create(40,2,true);
        assert_eq!(img.to_bytes().len(),40*2*18*256 + 5);
        assert_eq!(img.header(),&[18,2,1,1,0]);
    }

    #[test]
    fn sector_round_trip() {
        let mut img = Jvc::create(35,1,false);
        let mut dat = vec![0;256];
        dat[0] = 0xde;
        dat[255] = 0xad;
        img.write_sector(17,2,&dat).expect("write failed");
        assert_eq!(img.read_sector(17,2).expect("read failed"),dat);
        // neighboring sectors are untouched
        assert_eq!(img.read_sector(17,1).expect("read failed"),vec![0xff;256]);
        assert_eq!(img.read_sector(17,3).expect("read failed"),vec![0xff;256]);
    }

    #[test]
    fn sector_bounds() {
        let img = Jvc::create(35,1,false);
        assert!(img.read_sector(35,1).is_err());
        assert!(img.read_sector(0,0).is_err());
        assert!(img.read_sector(0,19).is_err());
    }

    #[test]
    fn header_preserved() {
        let mut raw = vec![18,1,1,1,0,0xaa,0xbb];
        raw.append(&mut vec![0xff;161280]);
        let img = Jvc::from_bytes(&raw).expect("mount failed");
        assert_eq!(img.header().len(),7);
        assert_eq!(img.to_bytes(),raw);
    }
}
