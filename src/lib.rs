//! # `cocokit` main library
//!
//! This library manipulates DSK/JVC disk images for the TRS-80 Color Computer,
//! with emphasis on the Disk Extended Color BASIC (DECB) file system.
//! Manipulations can be done at a level as low as sectors, or as high as language files.
//!
//! ## Architecture
//!
//! Disk image operations are built around three kinds of object:
//! * `img::Jvc` owns the raw image, i.e., the optional JVC header and the sector data
//! * `fs::decb::Disk` imposes the DECB file system on an owned image
//! * `lang::basic::Detokenizer` decodes tokenized BASIC recovered from a disk or any byte stream
//!
//! When a `Disk` object is created it takes ownership of some `Jvc` image.
//! It then uses this owned image as storage.  Any changes are not permanent until the
//! image is saved to whatever file system is hosting cocokit.
//!
//! ## File System
//!
//! DECB divides a diskette into 2304 byte granules, 68 of them on a standard 35 track
//! diskette.  Track 17 is reserved for the allocation table and the directory.
//! The `fs::decb` module exposes the usual catalog, read, write, delete, rename,
//! and format operations, and is careful to reproduce the byte-level conventions
//! of real DECB so images remain interchangeable with emulators and hardware.
//!
//! ## Language Files
//!
//! `lang::basic` converts tokenized Color BASIC, Extended Color BASIC, Disk Extended
//! Color BASIC, and Super Extended Color BASIC programs into readable source listings.
//! Going the other way (tokenizing) is not attempted.

pub mod img;
pub mod fs;
pub mod lang;
pub mod commands;

use std::fmt::Write;
use log::info;
use fs::decb::Disk;

pub type DYNERR = Box<dyn std::error::Error>;
pub type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const KNOWN_FILE_EXTENSIONS: &str = "dsk,jvc";

/// Given a bytestream return a DECB file system, or Err if the bytestream
/// cannot be interpreted.  The file system takes ownership of the image.
pub fn create_disk_from_bytestream(disk_img_data: &[u8]) -> Result<Disk,DYNERR> {
    let img = img::jvc::Jvc::from_bytes(disk_img_data)?;
    if Disk::test_img(&img) {
        info!("identified DECB file system");
        return Disk::from_img(img);
    }
    Err(Box::new(fs::Error::FileSystemMismatch))
}

/// Calls `create_disk_from_bytestream` getting the bytes from a file.
/// The file extension is not interpreted, since DSK images carry no magic number anyway.
pub fn create_disk_from_file(img_path: &str) -> Result<Disk,DYNERR> {
    let disk_img_data = std::fs::read(img_path)?;
    if let Some(ext) = img_path.split('.').last() {
        if !KNOWN_FILE_EXTENSIONS.contains(&ext.to_lowercase()) {
            info!("file extension `{}` is unusual for a disk image",ext);
        }
    }
    create_disk_from_bytestream(&disk_img_data)
}

/// Save the image file (make changes permanent)
pub fn save_disk(disk: &mut Disk,img_path: &str) -> STDRESULT {
    disk.save(img_path)
}

/// Format binary as a hex dump with columns of hex and ascii
pub fn display_block(start_addr: usize,block: &[u8]) -> String {
    let mut ans = String::new();
    let mut slice_start = 0;
    loop {
        let row_label = start_addr + slice_start;
        let mut slice_end = slice_start + 16;
        if slice_end > block.len() {
            slice_end = block.len();
        }
        let slice = &block[slice_start..slice_end];
        let txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x<32 => '.' as u8,
            x if x<127 => x,
            _ => '.' as u8
        }).collect();
        write!(&mut ans,"{:04X} : ",row_label).expect("unreachable");
        for byte in slice {
            write!(&mut ans,"{:02X} ",byte).expect("unreachable");
        }
        for _blank in slice_end..slice_start+16 {
            ans += "   ";
        }
        writeln!(&mut ans,"|{}|",String::from_utf8_lossy(&txt)).expect("unreachable");
        slice_start += 16;
        if slice_end==block.len() {
            break;
        }
    }
    return ans;
}

#[test]
fn test_display_block() {
    let block: Vec<u8> = (0u8..20u8).map(|i| i+0x40).collect();
    let dump = display_block(0x2600,&block);
    let mut lines = dump.lines();
    let first = lines.next().expect("no first row");
    assert!(first.starts_with("2600 : 40 41 42 43"));
    assert!(first.ends_with("|@ABCDEFGHIJKLMNO|"));
    let second = lines.next().expect("no second row");
    assert!(second.starts_with("2610 : 50 51 52 53"));
    assert!(second.ends_with("|PQRS|"));
}
