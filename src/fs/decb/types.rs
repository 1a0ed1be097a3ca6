use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::str::FromStr;
use std::fmt;
use log::debug;

pub const SECTOR_SIZE: usize = 256;
pub const GRANULE_SECTORS: u8 = 9;
pub const GRANULE_SIZE: usize = SECTOR_SIZE * GRANULE_SECTORS as usize;
/// the FAT describes exactly 68 granules no matter how big the diskette is
pub const TOTAL_GRANULES: u8 = 68;

/// directory track, reserved and skipped by granule numbering
pub const DIR_TRACK: u8 = 17;
pub const FAT_SECTOR: u8 = 2;
pub const DIR_START_SECTOR: u8 = 3;
pub const DIR_END_SECTOR: u8 = 11;

pub const ENTRY_SIZE: usize = 32;
pub const ENTRIES_PER_SECTOR: usize = 8;

const NAME_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789$#_.-";

/// Enumerates DECB errors.  The `Display` trait will print the equivalent
/// Disk BASIC screen code, e.g. `?NE ERROR`, with a gloss appended.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("?FN ERROR (bad filename)")]
    NameInvalid,
    #[error("?NE ERROR (file not found)")]
    FileNotFound,
    #[error("?AE ERROR (file already exists)")]
    DuplicateName,
    #[error("?DF ERROR (disk full)")]
    InsufficientSpace,
    #[error("?DF ERROR (directory full)")]
    DirectoryFull,
    #[error("?FM ERROR (bad file mode)")]
    FileTypeMismatch,
    #[error("?FD ERROR (bad file data)")]
    BadFileData,
    #[error("?FS ERROR (bad FAT link at granule {0})")]
    CorruptFat(u8),
    #[error("?FS ERROR (bad directory entry in sector {0})")]
    CorruptDirectory(u8),
    #[error("?IO ERROR")]
    IOError
}

/// Enumerates the four DECB file types, available conversions are:
/// * FileType to u8: `as u8`
/// * u8 to FileType: `FileType::from_u8` (use FromPrimitive trait)
/// * &str to FileType: `FileType::from_str`, str can be a number or mnemonic
#[derive(FromPrimitive,PartialEq,Eq,Clone,Copy,Debug)]
pub enum FileType {
    Basic = 0x00,
    Data = 0x01,
    MachineLanguage = 0x02,
    Text = 0x03
}

impl FromStr for FileType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        // string can be the number itself
        if let Ok(num) = u8::from_str(s) {
            return match FileType::from_u8(num) {
                Some(typ) => Ok(typ),
                _ => Err(Error::FileTypeMismatch)
            };
        }
        // or a mnemonic
        match s {
            "basic" | "bas" => Ok(Self::Basic),
            "data" => Ok(Self::Data),
            "ml" | "bin" => Ok(Self::MachineLanguage),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(Error::FileTypeMismatch)
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f,"BASIC"),
            Self::Data => write!(f,"DATA"),
            Self::MachineLanguage => write!(f,"ML"),
            Self::Text => write!(f,"TEXT")
        }
    }
}

/// The ascii flag in a directory entry: 0x00 is binary, 0xFF is ASCII text.
/// Independent of the file type; DECB couples them only by convention.
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub enum AsciiMode {
    Binary = 0x00,
    Ascii = 0xFF
}

impl AsciiMode {
    /// anything other than 0xFF reads as binary, matching DECB's own test
    pub fn from_byte(b: u8) -> Self {
        match b {
            0xff => Self::Ascii,
            _ => Self::Binary
        }
    }
}

impl FromStr for AsciiMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        match s {
            "0" | "bin" | "binary" => Ok(Self::Binary),
            "1" | "ascii" => Ok(Self::Ascii),
            _ => Err(Error::FileTypeMismatch)
        }
    }
}

impl fmt::Display for AsciiMode {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f,"BIN"),
            Self::Ascii => write!(f,"ASCII")
        }
    }
}

/// A single cell of the allocation table.  The byte ranges encode three
/// states; decoding through this type keeps magic numbers out of call sites.
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub enum FatEntry {
    /// granule belongs to no chain
    Free,
    /// granule is continued at the given granule
    Next(u8),
    /// terminal granule, with the count of sectors in use (1 through 9)
    Last(u8)
}

impl FatEntry {
    /// Decode a FAT byte, or None if the byte is malformed.
    /// A terminal low nibble of 0 reads as 9 sectors used.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0xff => Some(Self::Free),
            g if g < TOTAL_GRANULES => Some(Self::Next(g)),
            n if n >= 0xc0 && n <= 0xc9 => match n & 0x0f {
                0 => Some(Self::Last(9)),
                sectors => Some(Self::Last(sectors))
            },
            _ => None
        }
    }
    /// Encode the cell; a full terminal granule is written as 0xC9, never 0xC0.
    pub fn to_byte(&self) -> u8 {
        match self {
            Self::Free => 0xff,
            Self::Next(g) => *g,
            Self::Last(sectors) => 0xc0 | (*sectors % 10)
        }
    }
}

/// State of a directory slot as encoded in the first filename byte.
/// The first `NeverUsed` slot also ends the directory scan.
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub enum SlotStatus {
    NeverUsed,
    Deleted,
    Active
}

impl SlotStatus {
    pub fn from_byte(first: u8) -> Self {
        match first {
            0xff => Self::NeverUsed,
            0x00 => Self::Deleted,
            _ => Self::Active
        }
    }
}

/// byte length of a file given its chain length, terminal sector count,
/// and the last-sector byte count from the directory (0 reads as 256)
pub fn file_size(chain_len: usize,last_sectors: u8,last_sector_bytes: u16) -> usize {
    let lsb = match last_sector_bytes {
        0 => SECTOR_SIZE,
        n => n as usize
    };
    (chain_len-1)*GRANULE_SIZE + (last_sectors as usize - 1)*SECTOR_SIZE + lsb
}

/// Split `NAME.EXT` on the last dot, validate, upper-case, and pad to the
/// 8+3 layout stored in the directory.
pub fn string_to_name(s: &str) -> Result<([u8;8],[u8;3]),Error> {
    let (name,ext) = match s.rsplit_once('.') {
        Some((n,x)) => (n,x),
        None => (s,"")
    };
    if name.len() < 1 || name.len() > 8 || ext.len() > 3 {
        debug!("name `{}` does not fit the 8.3 layout",s);
        return Err(Error::NameInvalid);
    }
    let mut packed_name: [u8;8] = [0x20;8];
    let mut packed_ext: [u8;3] = [0x20;3];
    for (i,c) in name.chars().enumerate() {
        let u = c.to_ascii_uppercase();
        if !NAME_CHARS.contains(u) {
            debug!("illegal filename character `{}`",c);
            return Err(Error::NameInvalid);
        }
        packed_name[i] = u as u8;
    }
    for (i,c) in ext.chars().enumerate() {
        let u = c.to_ascii_uppercase();
        if !NAME_CHARS.contains(u) {
            debug!("illegal extension character `{}`",c);
            return Err(Error::NameInvalid);
        }
        packed_ext[i] = u as u8;
    }
    Ok((packed_name,packed_ext))
}

pub fn is_name_valid(s: &str) -> bool {
    string_to_name(s).is_ok()
}
