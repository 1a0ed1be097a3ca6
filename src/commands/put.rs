use clap;
use std::io::Read;
use std::str::FromStr;
use crate::fs::decb::types::{FileType,AsciiMode};
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

pub fn put(cmd: &clap::ArgMatches) -> STDRESULT {
    let name = cmd.get_one::<String>("file").expect(RCH);
    let img_path = cmd.get_one::<String>("dimg").expect(RCH);
    let typ = FileType::from_str(cmd.get_one::<String>("type").expect(RCH))?;
    let mode = match cmd.get_flag("ascii") {
        true => AsciiMode::Ascii,
        false => AsciiMode::Binary
    };
    let mut dat: Vec<u8> = Vec::new();
    std::io::stdin().read_to_end(&mut dat)?;
    let mut disk = crate::create_disk_from_file(img_path)?;
    disk.insert(name,&dat,typ,mode)?;
    disk.save(img_path)
}
