use clap;
use std::io::Write;
use log::warn;
use crate::lang::basic;
use super::CommandError;
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

pub fn get(cmd: &clap::ArgMatches) -> STDRESULT {
    let name = cmd.get_one::<String>("file").expect(RCH);
    let img_path = cmd.get_one::<String>("dimg").expect(RCH);
    let typ = match cmd.get_one::<String>("type") {
        Some(s) => s.clone(),
        None => "raw".to_string()
    };
    let disk = crate::create_disk_from_file(img_path)?;
    let object = disk.extract(name)?;
    match typ.as_str() {
        "raw" => {
            std::io::stdout().write_all(&object).expect("could not write stdout");
            Ok(())
        },
        "text" => {
            // ASCII files use CR line endings, the console wants LF
            let txt: Vec<u8> = object.iter().map(|b| match *b {
                0x0d => 0x0a,
                b => b
            }).collect();
            print!("{}",String::from_utf8_lossy(&txt));
            Ok(())
        },
        "basic" => {
            if !basic::is_tokenized(&object) {
                warn!("file does not look like tokenized BASIC, output may be garbage");
            }
            print!("{}",basic::detokenize(&object));
            Ok(())
        },
        "hex" => {
            print!("{}",crate::display_block(0,&object));
            Ok(())
        },
        _ => Err(Box::new(CommandError::UnknownItemType))
    }
}
