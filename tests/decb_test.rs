// test of the DECB file system module
use cocokit::fs::decb::Disk;
use cocokit::fs::decb::types::{FileType,AsciiMode};

// absolute offsets in a headerless 35 track image
const FAT_OFFSET: usize = (17*18 + 1)*256; // track 17, sector 2
const DIR_OFFSET: usize = (17*18 + 2)*256; // track 17, sector 3

#[test]
fn mount_and_enumerate() {
    // a virgin 160K diskette: no header, every byte 0xFF
    let raw = vec![0xff;161280];
    let mut disk = cocokit::create_disk_from_bytestream(&raw).expect("mount failed");
    assert_eq!(disk.get_img().header().len(),0);
    let geom = *disk.get_img().geometry();
    assert_eq!(geom.sectors_per_track,18);
    assert_eq!(geom.sides,1);
    assert_eq!(geom.sector_size,256);
    assert_eq!(geom.first_sector_id,1);
    assert_eq!(geom.attribute,0);
    assert_eq!(disk.catalog().expect("catalog failed").len(),0);
    assert_eq!(disk.free_granules(),68);
    assert!(!disk.is_dirty());
}

#[test]
fn undersized_image_rejected() {
    let raw = vec![0xff;34*18*256];
    assert!(cocokit::create_disk_from_bytestream(&raw).is_err());
}

#[test]
fn round_trip_small() {
    let mut disk = Disk::format(35,1,false);
    disk.insert("HELLO.TXT",b"HELLO WORLD\n",FileType::Text,AsciiMode::Ascii).expect("insert failed");

    let img = disk.get_img().to_bytes();
    // allocation starts at granule 32, one sector used
    assert_eq!(img[FAT_OFFSET+32],0xc1);
    // any file operation flips the FAT sector padding to zeros
    assert!(img[FAT_OFFSET+68..FAT_OFFSET+256].iter().all(|b| *b==0x00));
    // the directory entry lands in the first slot of sector 3
    assert_eq!(&img[DIR_OFFSET..DIR_OFFSET+8],b"HELLO   ");
    assert_eq!(&img[DIR_OFFSET+8..DIR_OFFSET+11],b"TXT");
    assert_eq!(img[DIR_OFFSET+11],0x03);
    assert_eq!(img[DIR_OFFSET+12],0xff);
    assert_eq!(img[DIR_OFFSET+13],0x20);
    assert_eq!(&img[DIR_OFFSET+14..DIR_OFFSET+16],&[0x00,0x0c]);
    assert_eq!(&img[DIR_OFFSET+16..DIR_OFFSET+32],&[0x00;16]);

    assert_eq!(disk.extract("HELLO.TXT").expect("extract failed"),b"HELLO WORLD\n");
    // lookups are case-insensitive
    assert_eq!(disk.extract("hello.txt").expect("extract failed"),b"HELLO WORLD\n");
    assert!(disk.is_dirty());
}

#[test]
fn multi_granule_file() {
    let mut disk = Disk::format(35,1,false);
    let big: Vec<u8> = (0..5000).map(|i| (i%251) as u8).collect();
    disk.insert("BIG.BIN",&big,FileType::MachineLanguage,AsciiMode::Binary).expect("insert failed");

    let img = disk.get_img().to_bytes();
    assert_eq!(img[FAT_OFFSET+32],33);
    assert_eq!(img[FAT_OFFSET+33],34);
    // 5000 = 2*2304 + 392, so 2 sectors used in the terminal granule
    assert_eq!(img[FAT_OFFSET+34],0xc2);
    // last sector byte count 5000 % 256 = 136
    assert_eq!(&img[DIR_OFFSET+14..DIR_OFFSET+16],&[0x00,0x88]);
    // granule 34 lies on track 18, since track 17 is the directory
    let track18 = (18*18)*256;
    assert_eq!(img[track18],big[2*2304]);

    let stat = disk.stat("BIG.BIN").expect("stat failed");
    assert_eq!(stat.chain,vec![32,33,34]);
    assert_eq!(stat.size,5000);
    assert_eq!(disk.extract("BIG.BIN").expect("extract failed"),big);
    assert_eq!(disk.free_granules(),65);
}

#[test]
fn delete_leaves_residue() {
    let mut disk = Disk::format(35,1,false);
    let big: Vec<u8> = (0..5000).map(|i| (i%251) as u8).collect();
    disk.insert("BIG.BIN",&big,FileType::MachineLanguage,AsciiMode::Binary).expect("insert failed");
    let before = disk.get_img().to_bytes();

    disk.delete("BIG.BIN").expect("delete failed");
    let after = disk.get_img().to_bytes();
    // the chain is freed
    assert_eq!(after[FAT_OFFSET+32],0xff);
    assert_eq!(after[FAT_OFFSET+33],0xff);
    assert_eq!(after[FAT_OFFSET+34],0xff);
    // only the kill marker is written; bytes 1..31 of the entry are stale
    assert_eq!(after[DIR_OFFSET],0x00);
    assert_eq!(&after[DIR_OFFSET+1..DIR_OFFSET+32],&before[DIR_OFFSET+1..DIR_OFFSET+32]);
    // the freed data sectors keep their residue too
    let track18 = (18*18)*256;
    assert_eq!(after[track18],before[track18]);
    assert_eq!(disk.free_granules(),68);

    // idempotence: the second delete no longer finds the file
    match disk.delete("BIG.BIN") {
        Ok(()) => panic!("deleted a file that does not exist"),
        Err(e) => assert!(e.to_string().starts_with("?NE ERROR"))
    }
}

#[test]
fn deleted_slot_is_reused() {
    let mut disk = Disk::format(35,1,false);
    disk.insert("ONE.TXT",b"FIRST",FileType::Text,AsciiMode::Ascii).expect("insert failed");
    disk.insert("TWO.TXT",b"SECOND",FileType::Text,AsciiMode::Ascii).expect("insert failed");
    disk.delete("ONE.TXT").expect("delete failed");
    disk.insert("THREE.TXT",b"THIRD",FileType::Text,AsciiMode::Ascii).expect("insert failed");
    // the new entry reclaims the killed slot ahead of the never-used ones
    let img = disk.get_img().to_bytes();
    assert_eq!(&img[DIR_OFFSET..DIR_OFFSET+8],b"THREE   ");
    assert_eq!(disk.catalog().expect("catalog failed").len(),2);
}

#[test]
fn corrupt_fat_rejected() {
    let disk = Disk::format(35,1,false);
    let mut raw = disk_to_bytes(disk);
    // granules 5 and 8 point at each other
    raw[FAT_OFFSET+5] = 8;
    raw[FAT_OFFSET+8] = 5;
    // an active entry whose chain starts inside the cycle
    raw[DIR_OFFSET..DIR_OFFSET+8].copy_from_slice(b"LOOP    ");
    raw[DIR_OFFSET+8..DIR_OFFSET+11].copy_from_slice(b"BIN");
    raw[DIR_OFFSET+11] = 0x02;
    raw[DIR_OFFSET+12] = 0x00;
    raw[DIR_OFFSET+13] = 5;
    raw[DIR_OFFSET+14] = 0x01;
    raw[DIR_OFFSET+15] = 0x00;

    let disk = cocokit::create_disk_from_bytestream(&raw).expect("mount failed");
    match disk.extract("LOOP.BIN") {
        Ok(_) => panic!("extracted through a corrupt FAT"),
        Err(e) => assert!(e.to_string().starts_with("?FS ERROR"))
    }
    // the catalog still lists the file, with zero size
    let rows = disk.catalog().expect("catalog failed");
    assert_eq!(rows.len(),1);
    assert_eq!(rows[0].size,0);
}

#[test]
fn allocation_order() {
    // the authentic search starts at granule 32 and wraps to 0
    let mut disk = Disk::format(35,1,false);
    let two_grans = vec![0x55;4608];
    for i in 0..18 {
        let name = format!("F{}.DAT",i);
        disk.insert(&name,&two_grans,FileType::Data,AsciiMode::Binary).expect("insert failed");
    }
    // granules 32..67 are now used
    assert_eq!(disk.free_granules(),32);
    disk.insert("WRAP.DAT",b"X",FileType::Data,AsciiMode::Binary).expect("insert failed");
    assert_eq!(disk.stat("WRAP.DAT").expect("stat failed").chain,vec![0]);

    // every live chain is disjoint from every other
    let mut seen: Vec<u8> = Vec::new();
    for row in disk.catalog().expect("catalog failed") {
        let stat = disk.stat(&row.name).expect("stat failed");
        for g in stat.chain {
            assert!(!seen.contains(&g),"granule {} on two chains",g);
            seen.push(g);
        }
    }
    assert_eq!(seen.len(),37);
}

#[test]
fn out_of_space() {
    let mut disk = Disk::format(35,1,false);
    // exactly fill all 68 granules
    let all: Vec<u8> = vec![0xaa;68*2304];
    disk.insert("FULL.BIN",&all,FileType::MachineLanguage,AsciiMode::Binary).expect("insert failed");
    assert_eq!(disk.free_granules(),0);
    assert_eq!(disk.extract("FULL.BIN").expect("extract failed"),all);
    match disk.insert("MORE.BIN",b"X",FileType::MachineLanguage,AsciiMode::Binary) {
        Ok(()) => panic!("wrote into a full disk"),
        Err(e) => assert!(e.to_string().starts_with("?DF ERROR"))
    }
    // the failed insert must not leave tracks behind
    assert_eq!(disk.catalog().expect("catalog failed").len(),1);
}

#[test]
fn full_terminal_granule_is_c9() {
    let mut disk = Disk::format(35,1,false);
    disk.insert("EXACT.BIN",&vec![0x11;2304],FileType::MachineLanguage,AsciiMode::Binary).expect("insert failed");
    let img = disk.get_img().to_bytes();
    assert_eq!(img[FAT_OFFSET+32],0xc9);
    // a full last sector is recorded as 256
    assert_eq!(&img[DIR_OFFSET+14..DIR_OFFSET+16],&[0x01,0x00]);
    assert_eq!(disk.extract("EXACT.BIN").expect("extract failed"),vec![0x11;2304]);
}

#[test]
fn name_errors() {
    let mut disk = Disk::format(35,1,false);
    disk.insert("GOOD.BAS",b"DATA",FileType::Basic,AsciiMode::Binary).expect("insert failed");
    match disk.insert("GOOD.BAS",b"DATA",FileType::Basic,AsciiMode::Binary) {
        Ok(()) => panic!("duplicate name accepted"),
        Err(e) => assert!(e.to_string().starts_with("?AE ERROR"))
    }
    match disk.insert("TOOLONGNAME.TXT",b"DATA",FileType::Text,AsciiMode::Ascii) {
        Ok(()) => panic!("bad name accepted"),
        Err(e) => assert!(e.to_string().starts_with("?FN ERROR"))
    }
    match disk.insert("",b"DATA",FileType::Text,AsciiMode::Ascii) {
        Ok(()) => panic!("empty name accepted"),
        Err(e) => assert!(e.to_string().starts_with("?FN ERROR"))
    }
    match disk.extract("ABSENT.BIN") {
        Ok(_) => panic!("extracted a missing file"),
        Err(e) => assert!(e.to_string().starts_with("?NE ERROR"))
    }
    match disk.insert("EMPTY.BIN",b"",FileType::MachineLanguage,AsciiMode::Binary) {
        Ok(()) => panic!("empty payload accepted"),
        Err(e) => assert!(e.to_string().starts_with("?FD ERROR"))
    }
}

#[test]
fn rename_preserves_fields() {
    let mut disk = Disk::format(35,1,false);
    disk.insert("OLD.BIN",b"PAYLOAD",FileType::MachineLanguage,AsciiMode::Binary).expect("insert failed");
    let before = disk.get_img().to_bytes();
    disk.rename("OLD.BIN","NEW.BIN").expect("rename failed");
    let after = disk.get_img().to_bytes();
    assert_eq!(&after[DIR_OFFSET..DIR_OFFSET+8],b"NEW     ");
    assert_eq!(&after[DIR_OFFSET+8..DIR_OFFSET+11],b"BIN");
    // type, mode, granule, byte count, and reserved bytes are untouched
    assert_eq!(&after[DIR_OFFSET+11..DIR_OFFSET+32],&before[DIR_OFFSET+11..DIR_OFFSET+32]);
    assert_eq!(disk.extract("NEW.BIN").expect("extract failed"),b"PAYLOAD");
    match disk.extract("OLD.BIN") {
        Ok(_) => panic!("old name still resolves"),
        Err(e) => assert!(e.to_string().starts_with("?NE ERROR"))
    }

    disk.insert("OTHER.BIN",b"X",FileType::MachineLanguage,AsciiMode::Binary).expect("insert failed");
    match disk.rename("OTHER.BIN","NEW.BIN") {
        Ok(()) => panic!("rename onto an existing name"),
        Err(e) => assert!(e.to_string().starts_with("?AE ERROR"))
    }
}

#[test]
fn save_and_remount() {
    let img_path = std::env::temp_dir().join("cocokit_decb_test.dsk");
    let img_path = img_path.to_str().expect("bad temp path");
    let mut disk = Disk::format(35,1,false);
    disk.insert("KEEP.TXT",b"STILL HERE",FileType::Text,AsciiMode::Ascii).expect("insert failed");
    assert!(disk.is_dirty());
    disk.save(img_path).expect("save failed");
    assert!(!disk.is_dirty());

    let disk2 = cocokit::create_disk_from_file(img_path).expect("remount failed");
    assert_eq!(disk2.extract("KEEP.TXT").expect("extract failed"),b"STILL HERE");
    std::fs::remove_file(img_path).expect("cleanup failed");
}

fn disk_to_bytes(mut disk: Disk) -> Vec<u8> {
    disk.get_img().to_bytes()
}
