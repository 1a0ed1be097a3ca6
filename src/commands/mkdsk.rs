use clap;
use std::str::FromStr;
use log::info;
use crate::fs::decb;
use super::CommandError;
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

pub fn mkdsk(cmd: &clap::ArgMatches) -> STDRESULT {
    let img_path = cmd.get_one::<String>("dimg").expect(RCH);
    let tracks = u8::from_str(cmd.get_one::<String>("tracks").expect(RCH))?;
    let sides = u8::from_str(cmd.get_one::<String>("sides").expect(RCH))?;
    let jvc_header = cmd.get_flag("jvc");
    // clap has already vetted the values, but never trust the caller
    if ![35,40,80].contains(&tracks) || sides < 1 || sides > 2 {
        return Err(Box::new(CommandError::OutOfRange));
    }
    let mut disk = decb::Disk::format(tracks,sides,jvc_header);
    disk.save(img_path)?;
    info!("formatted {}: {} tracks, {} side(s), {} bytes free",
        img_path,tracks,sides,disk.free_bytes());
    Ok(())
}
