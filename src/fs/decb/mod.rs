//! # DECB file system module
//!
//! This manipulates disk images containing one Disk Extended Color BASIC
//! volume.  Analogues of Disk BASIC commands like DIR, COPY, KILL, and
//! RENAME are exposed as methods on `Disk`.  The module reproduces the
//! byte-level habits of the real ROM: granule allocation starts its search
//! at granule 32, a deleted entry keeps its stale bytes behind the kill
//! marker, and the FAT sector padding distinguishes a virgin diskette from
//! a used one.
//!
//! Track counts are wide open (35 is standard, 40 and 80 appear in the
//! wild), but the allocation table always describes 68 granules, so the
//! extra tracks of a big diskette are simply out of reach, as on the
//! real machine.

pub mod types;
mod fat;
mod directory;

use std::fmt;
use log::{error,warn,debug,info};
use num_traits::FromPrimitive;
use types::*;
use fat::Fat;
use directory::{DirectoryEntry,DirectorySector};
use crate::fs::DiskStruct;
use crate::img::jvc::Jvc;
use crate::{STDRESULT,DYNERR};

/// One row of the directory listing, sizes computed by walking the FAT.
pub struct CatalogEntry {
    pub name: String,
    pub file_type: u8,
    pub ascii_flag: u8,
    pub first_granule: u8,
    pub granules: usize,
    pub size: usize
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let typ = match FileType::from_u8(self.file_type) {
            Some(t) => t.to_string(),
            None => format!("UNK({:02X})",self.file_type)
        };
        write!(f,"{:<12} {:<6} {:<5} {:>5} {:>7}",
            self.name,typ,AsciiMode::from_byte(self.ascii_flag).to_string(),self.granules,self.size)
    }
}

/// Everything known about one file, including its granule chain.
pub struct FileStat {
    pub name: String,
    pub file_type: u8,
    pub ascii_flag: u8,
    pub first_granule: u8,
    pub last_sector_bytes: u16,
    pub chain: Vec<u8>,
    pub size: usize
}

/// The primary interface for DECB disk operations.
/// Takes ownership of a `Jvc` image and uses it as storage; any mutation
/// is written through to the image at once, but the image itself is only
/// persisted by `save`.
pub struct Disk {
    fat: Fat,
    img: Jvc,
    dirty: bool
}

impl Disk {
    /// Create a file system using the given image as storage.
    /// Fails if the geometry cannot hold a DECB volume.
    pub fn from_img(img: Jvc) -> Result<Self,DYNERR> {
        let geom = img.geometry();
        if geom.sector_size != SECTOR_SIZE {
            error!("DECB requires 256 byte sectors, header declares {}",geom.sector_size);
            return Err(Box::new(crate::img::Error::UnsupportedGeometry));
        }
        if geom.sectors_per_track != 18 {
            error!("DECB requires 18 sectors per track, header declares {}",geom.sectors_per_track);
            return Err(Box::new(crate::img::Error::UnsupportedGeometry));
        }
        if img.track_count() < 35 {
            error!("sector area holds {} tracks, a DECB volume needs 35",img.track_count());
            return Err(Box::new(crate::img::Error::InvalidImage));
        }
        let fat_sec = img.read_sector(DIR_TRACK,FAT_SECTOR)?;
        Ok(Self {
            fat: Fat::from_sector(&fat_sec),
            img,
            dirty: false
        })
    }
    /// Test an image to see if it plausibly carries DECB.  DSK images have no
    /// magic number, so the test is the geometry plus a well-formed FAT.
    pub fn test_img(img: &Jvc) -> bool {
        let geom = img.geometry();
        if geom.sector_size != SECTOR_SIZE || geom.sectors_per_track != 18 {
            debug!("geometry is not DECB");
            return false;
        }
        if img.track_count() < 35 {
            debug!("track count {} is too small",img.track_count());
            return false;
        }
        match img.read_sector(DIR_TRACK,FAT_SECTOR) {
            Ok(dat) => {
                for g in 0..TOTAL_GRANULES as usize {
                    if FatEntry::from_byte(dat[g]).is_none() {
                        debug!("FAT cell {} is malformed",g);
                        return false;
                    }
                }
                true
            },
            Err(_) => false
        }
    }
    /// Create a freshly formatted volume.  Real CoCo formatting fills every
    /// data sector with 0xFF, so the blank image already is the blank file
    /// system; the JVC header is opt-in for emulators.
    pub fn format(tracks: u8,sides: u8,jvc_header: bool) -> Self {
        Self {
            fat: Fat::blank(),
            img: Jvc::create(tracks,sides,jvc_header),
            dirty: true
        }
    }
    /// Map a granule to its starting (track, sector).  Two granules per
    /// track, with the directory track skipped over.
    fn granule_location(g: u8) -> (u8,u8) {
        let track = match g < 2*DIR_TRACK {
            true => g/2,
            false => g/2 + 1
        };
        (track,1 + GRANULE_SECTORS*(g%2))
    }
    fn read_granule(&self,g: u8,sectors: u8) -> Result<Vec<u8>,DYNERR> {
        let (track,start_sector) = Self::granule_location(g);
        let mut ans: Vec<u8> = Vec::new();
        for s in 0..sectors {
            ans.append(&mut self.img.read_sector(track,start_sector+s)?);
        }
        Ok(ans)
    }
    /// write one full granule, `dat` must be exactly GRANULE_SIZE
    fn write_granule(&mut self,g: u8,dat: &[u8]) -> STDRESULT {
        let (track,start_sector) = Self::granule_location(g);
        for s in 0..GRANULE_SECTORS {
            let offset = s as usize * SECTOR_SIZE;
            self.img.write_sector(track,start_sector+s,&dat[offset..offset+SECTOR_SIZE])?;
        }
        Ok(())
    }
    /// write the FAT copy through to the image
    fn write_fat(&mut self) -> STDRESULT {
        self.img.write_sector(DIR_TRACK,FAT_SECTOR,&self.fat.to_sector())
    }
    /// Gather the active entries in directory order.  The scan stops at the
    /// first never-used slot, and skips over deleted slots, exactly as the
    /// ROM does it.
    fn scan_directory(&self) -> Result<Vec<(u8,usize,DirectoryEntry)>,DYNERR> {
        let mut ans: Vec<(u8,usize,DirectoryEntry)> = Vec::new();
        for sec in DIR_START_SECTOR..DIR_END_SECTOR+1 {
            let dat = self.img.read_sector(DIR_TRACK,sec)?;
            let dir = DirectorySector::from_bytes(&dat);
            for (slot,entry) in dir.entries.iter().enumerate() {
                match entry.status() {
                    SlotStatus::NeverUsed => return Ok(ans),
                    SlotStatus::Deleted => continue,
                    SlotStatus::Active => ans.push((sec,slot,*entry))
                }
            }
        }
        Ok(ans)
    }
    /// first active entry matching the name, or None
    fn find_entry(&self,name: &str) -> Result<Option<(u8,usize,DirectoryEntry)>,DYNERR> {
        let (fname,fext) = string_to_name(name)?;
        for (sec,slot,entry) in self.scan_directory()? {
            if entry.matches(&fname,&fext) {
                return Ok(Some((sec,slot,entry)));
            }
        }
        Ok(None)
    }
    /// first reusable slot, deleted or never-used, in directory order
    fn find_free_slot(&self) -> Result<Option<(u8,usize)>,DYNERR> {
        for sec in DIR_START_SECTOR..DIR_END_SECTOR+1 {
            let dat = self.img.read_sector(DIR_TRACK,sec)?;
            for slot in 0..ENTRIES_PER_SECTOR {
                match SlotStatus::from_byte(dat[slot*ENTRY_SIZE]) {
                    SlotStatus::Active => continue,
                    _ => return Ok(Some((sec,slot)))
                }
            }
        }
        Ok(None)
    }
    /// Directory listing with computed sizes.  A corrupt chain does not
    /// abort the listing; the row is kept with zero size and a warning.
    pub fn catalog(&self) -> Result<Vec<CatalogEntry>,DYNERR> {
        let mut ans: Vec<CatalogEntry> = Vec::new();
        for (sec,_slot,entry) in self.scan_directory()? {
            let (granules,size) = match entry.first_granule < TOTAL_GRANULES {
                true => match self.fat.walk(entry.first_granule) {
                    Ok((chain,last_sectors)) => {
                        let size = file_size(chain.len(),last_sectors,entry.last_sector_byte_count());
                        (chain.len(),size)
                    },
                    Err(e) => {
                        warn!("size of {} not computed: {}",entry.name_string(),e);
                        (0,0)
                    }
                },
                false => {
                    warn!("entry {} in sector {} has bad first granule {}",entry.name_string(),sec,entry.first_granule);
                    (0,0)
                }
            };
            ans.push(CatalogEntry {
                name: entry.name_string(),
                file_type: entry.file_type,
                ascii_flag: entry.ascii_flag,
                first_granule: entry.first_granule,
                granules,
                size
            });
        }
        Ok(ans)
    }
    /// Write the directory listing in the style of the DIR command,
    /// with a free space summary at the bottom.
    pub fn catalog_to_stdout(&self) -> STDRESULT {
        let rows = self.catalog()?;
        println!();
        println!("{:<12} {:<6} {:<5} {:>5} {:>7}","FILENAME","TYPE","MODE","GRANS","BYTES");
        println!("{}","-".repeat(40));
        for row in &rows {
            println!("{}",row);
        }
        println!("{}","-".repeat(40));
        println!("{} FILES, {} GRANULES FREE ({} BYTES)",rows.len(),self.free_granules(),self.free_bytes());
        Ok(())
    }
    /// Everything known about one file, including the granule chain.
    pub fn stat(&self,name: &str) -> Result<FileStat,DYNERR> {
        match self.find_entry(name)? {
            None => Err(Box::new(Error::FileNotFound)),
            Some((sec,_slot,entry)) => {
                if entry.first_granule >= TOTAL_GRANULES {
                    error!("entry {} has first granule {}",entry.name_string(),entry.first_granule);
                    return Err(Box::new(Error::CorruptDirectory(sec)));
                }
                let (chain,last_sectors) = self.fat.walk(entry.first_granule)?;
                let size = file_size(chain.len(),last_sectors,entry.last_sector_byte_count());
                Ok(FileStat {
                    name: entry.name_string(),
                    file_type: entry.file_type,
                    ascii_flag: entry.ascii_flag,
                    first_granule: entry.first_granule,
                    last_sector_bytes: entry.last_sector_byte_count(),
                    chain,
                    size
                })
            }
        }
    }
    /// Read a file out of the image.  The result is an owned buffer,
    /// already truncated to the exact byte length.
    pub fn extract(&self,name: &str) -> Result<Vec<u8>,DYNERR> {
        match self.find_entry(name)? {
            None => Err(Box::new(Error::FileNotFound)),
            Some((sec,_slot,entry)) => {
                if entry.first_granule >= TOTAL_GRANULES {
                    error!("entry {} has first granule {}",entry.name_string(),entry.first_granule);
                    return Err(Box::new(Error::CorruptDirectory(sec)));
                }
                let (chain,last_sectors) = self.fat.walk(entry.first_granule)?;
                let mut ans: Vec<u8> = Vec::new();
                for (i,g) in chain.iter().enumerate() {
                    let sectors = match i+1==chain.len() {
                        true => last_sectors,
                        false => GRANULE_SECTORS
                    };
                    ans.append(&mut self.read_granule(*g,sectors)?);
                }
                ans.truncate(file_size(chain.len(),last_sectors,entry.last_sector_byte_count()));
                Ok(ans)
            }
        }
    }
    /// Write a file into the image.  The operation is transactional: if any
    /// step fails, the FAT sector and the touched directory sector are
    /// restored from shadow copies before returning.
    pub fn insert(&mut self,name: &str,dat: &[u8],typ: FileType,mode: AsciiMode) -> STDRESULT {
        let (fname,fext) = string_to_name(name)?;
        if dat.len() == 0 {
            error!("an empty file cannot be stored on a DECB volume");
            return Err(Box::new(Error::BadFileData));
        }
        if self.find_entry(name)?.is_some() {
            return Err(Box::new(Error::DuplicateName));
        }
        let granules_needed = (dat.len() + GRANULE_SIZE - 1)/GRANULE_SIZE;
        let granules = self.fat.find_free(granules_needed)?;
        let (slot_sec,slot) = match self.find_free_slot()? {
            Some(ans) => ans,
            None => return Err(Box::new(Error::DirectoryFull))
        };
        let last_sectors = match dat.len() % GRANULE_SIZE {
            0 => GRANULE_SECTORS,
            rem => ((rem + SECTOR_SIZE - 1)/SECTOR_SIZE) as u8
        };
        let last_sector_bytes = match dat.len() % SECTOR_SIZE {
            0 => SECTOR_SIZE as u16,
            rem => rem as u16
        };
        // all checks passed; mutate behind shadow copies
        let fat_shadow = self.img.read_sector(DIR_TRACK,FAT_SECTOR)?;
        let dir_shadow = self.img.read_sector(DIR_TRACK,slot_sec)?;
        let entry = DirectoryEntry::create(fname,fext,typ,mode,granules[0],last_sector_bytes);
        match self.write_file(&granules,dat,last_sectors,slot_sec,slot,&entry) {
            Ok(()) => {
                self.dirty = true;
                info!("stored {} in {} granules starting at {}",entry.name_string(),granules.len(),granules[0]);
                Ok(())
            },
            Err(e) => {
                warn!("insert failed, restoring FAT and directory sectors");
                self.img.write_sector(DIR_TRACK,FAT_SECTOR,&fat_shadow)?;
                self.img.write_sector(DIR_TRACK,slot_sec,&dir_shadow)?;
                self.fat = Fat::from_sector(&fat_shadow);
                Err(e)
            }
        }
    }
    fn write_file(&mut self,granules: &[u8],dat: &[u8],last_sectors: u8,slot_sec: u8,slot: usize,entry: &DirectoryEntry) -> STDRESULT {
        // payload is padded out to the granule boundary
        let mut padded = dat.to_vec();
        padded.resize(granules.len()*GRANULE_SIZE,0x00);
        for (i,g) in granules.iter().enumerate() {
            self.write_granule(*g,&padded[i*GRANULE_SIZE..(i+1)*GRANULE_SIZE])?;
        }
        self.fat.link(granules,last_sectors);
        self.write_fat()?;
        let mut dir_dat = self.img.read_sector(DIR_TRACK,slot_sec)?;
        dir_dat[slot*ENTRY_SIZE..(slot+1)*ENTRY_SIZE].copy_from_slice(&entry.to_bytes());
        self.img.write_sector(DIR_TRACK,slot_sec,&dir_dat)
    }
    /// Free the granule chain and kill the directory entry.  Only the first
    /// filename byte is touched; the remaining 31 bytes stay behind as
    /// stale data, exactly as Disk BASIC leaves them.
    pub fn delete(&mut self,name: &str) -> STDRESULT {
        match self.find_entry(name)? {
            None => Err(Box::new(Error::FileNotFound)),
            Some((sec,slot,entry)) => {
                if entry.first_granule >= TOTAL_GRANULES {
                    error!("entry {} has first granule {}",entry.name_string(),entry.first_granule);
                    return Err(Box::new(Error::CorruptDirectory(sec)));
                }
                self.fat.free_chain(entry.first_granule)?;
                self.write_fat()?;
                let mut dir_dat = self.img.read_sector(DIR_TRACK,sec)?;
                dir_dat[slot*ENTRY_SIZE] = 0x00;
                self.img.write_sector(DIR_TRACK,sec,&dir_dat)?;
                self.dirty = true;
                Ok(())
            }
        }
    }
    /// Rename in place.  Only the name and extension fields change; type,
    /// mode, granule, byte count, and reserved bytes are all preserved.
    pub fn rename(&mut self,old_name: &str,new_name: &str) -> STDRESULT {
        let (fname,fext) = string_to_name(new_name)?;
        if self.find_entry(new_name)?.is_some() {
            return Err(Box::new(Error::DuplicateName));
        }
        match self.find_entry(old_name)? {
            None => Err(Box::new(Error::FileNotFound)),
            Some((sec,slot,_entry)) => {
                let mut dir_dat = self.img.read_sector(DIR_TRACK,sec)?;
                dir_dat[slot*ENTRY_SIZE..slot*ENTRY_SIZE+8].copy_from_slice(&fname);
                dir_dat[slot*ENTRY_SIZE+8..slot*ENTRY_SIZE+11].copy_from_slice(&fext);
                self.img.write_sector(DIR_TRACK,sec,&dir_dat)?;
                self.dirty = true;
                Ok(())
            }
        }
    }
    pub fn free_granules(&self) -> usize {
        self.fat.free_granules()
    }
    pub fn free_bytes(&self) -> usize {
        self.fat.free_granules() * GRANULE_SIZE
    }
    /// true when the image has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
    /// Persist the image; clears the dirty state.
    pub fn save(&mut self,img_path: &str) -> STDRESULT {
        std::fs::write(img_path,self.img.to_bytes())?;
        self.dirty = false;
        Ok(())
    }
    pub fn get_img(&mut self) -> &mut Jvc {
        &mut self.img
    }
}
