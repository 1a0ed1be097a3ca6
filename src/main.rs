//! # Command Line Interface
//!
//! Simple subcommands are directly in `main.rs`.
//! More elaborate subcommands are in the `commands` module.

use clap::{arg,crate_version,Command,ArgAction};
use env_logger;
use std::io::Read;
use cocokit::commands;
use cocokit::commands::CommandError;
use cocokit::lang::basic;

const RCH: &str = "unreachable was reached";

fn main() -> Result<(),Box<dyn std::error::Error>> {
    env_logger::init();
    let long_help =
"cocokit is always invoked with exactly one of several subcommands.
The subcommands are generally designed to function as nodes in a pipeline.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
create a blank disk:    `cocokit mkdsk -d mydisk.dsk`
list the directory:     `cocokit catalog -d mydisk.dsk`
copy a file in:         `cocokit put -f PROG.BIN -t ml -d mydisk.dsk < prog.bin`
copy a file out:        `cocokit get -f PROG.BIN -d mydisk.dsk > prog.bin`
read a BASIC program:   `cocokit get -f HELLO.BAS -t basic -d mydisk.dsk`
detokenize a local file:`cocokit detokenize < hello.bas`";

    let file_types = ["basic","data","ml","text","0","1","2","3"];
    let get_types = ["raw","text","basic","hex"];

    let matches = Command::new("cocokit")
        .about("Manipulates TRS-80 Color Computer files and disk images.")
        .after_long_help(long_help)
        .version(crate_version!())
    .subcommand(Command::new("mkdsk")
        .arg(arg!(-d --dimg <PATH> "path of disk image to create"))
        .arg(arg!(-t --tracks <TRACKS> "track count").required(false)
            .value_parser(["35","40","80"])
            .default_value("35"))
        .arg(arg!(-s --sides <SIDES> "side count").required(false)
            .value_parser(["1","2"])
            .default_value("1"))
        .arg(arg!(--jvc "prepend a JVC header for emulators").action(ArgAction::SetTrue))
        .about("write a blank DECB disk image"))
    .subcommand(Command::new("catalog")
        .arg(arg!(-d --dimg <PATH> "path to disk image"))
        .about("write disk image catalog to stdout"))
    .subcommand(Command::new("stat")
        .arg(arg!(-f --file <NAME> "file inside disk image"))
        .arg(arg!(-d --dimg <PATH> "path to disk image"))
        .about("show granule chain and byte size of a file"))
    .subcommand(Command::new("get")
        .arg(arg!(-f --file <NAME> "file inside disk image"))
        .arg(arg!(-t --type <TYPE> "how to present the file").required(false).value_parser(get_types))
        .arg(arg!(-d --dimg <PATH> "path to disk image"))
        .about("read from disk image, write to stdout"))
    .subcommand(Command::new("put")
        .arg(arg!(-f --file <NAME> "file inside disk image"))
        .arg(arg!(-t --type <TYPE> "DECB file type").required(false)
            .value_parser(file_types)
            .default_value("ml"))
        .arg(arg!(-a --ascii "mark file as ASCII").action(ArgAction::SetTrue))
        .arg(arg!(-d --dimg <PATH> "path to disk image"))
        .about("read from stdin, write to disk image"))
    .subcommand(Command::new("delete")
        .arg(arg!(-f --file <NAME> "file inside disk image"))
        .arg(arg!(-d --dimg <PATH> "path to disk image"))
        .about("delete a file inside a disk image"))
    .subcommand(Command::new("rename")
        .arg(arg!(-f --file <NAME> "file inside disk image"))
        .arg(arg!(-n --name <NAME> "new name"))
        .arg(arg!(-d --dimg <PATH> "path to disk image"))
        .about("rename a file inside a disk image"))
    .subcommand(Command::new("detokenize")
        .about("read tokenized BASIC from stdin, write listing to stdout"))
    .get_matches();

    match matches.subcommand() {
        Some(("mkdsk",cmd)) => commands::mkdsk::mkdsk(cmd),
        Some(("catalog",cmd)) => {
            let img_path = cmd.get_one::<String>("dimg").expect(RCH);
            let disk = cocokit::create_disk_from_file(img_path)?;
            disk.catalog_to_stdout()
        },
        Some(("stat",cmd)) => {
            let img_path = cmd.get_one::<String>("dimg").expect(RCH);
            let name = cmd.get_one::<String>("file").expect(RCH);
            let disk = cocokit::create_disk_from_file(img_path)?;
            let stat = disk.stat(name)?;
            println!("{}: {} bytes in {} granule(s)",stat.name,stat.size,stat.chain.len());
            println!("chain: {:?}",stat.chain);
            println!("last sector holds {} byte(s)",stat.last_sector_bytes);
            Ok(())
        },
        Some(("get",cmd)) => commands::get::get(cmd),
        Some(("put",cmd)) => commands::put::put(cmd),
        Some(("delete",cmd)) => {
            let img_path = cmd.get_one::<String>("dimg").expect(RCH);
            let name = cmd.get_one::<String>("file").expect(RCH);
            let mut disk = cocokit::create_disk_from_file(img_path)?;
            disk.delete(name)?;
            cocokit::save_disk(&mut disk,img_path)
        },
        Some(("rename",cmd)) => {
            let img_path = cmd.get_one::<String>("dimg").expect(RCH);
            let old_name = cmd.get_one::<String>("file").expect(RCH);
            let new_name = cmd.get_one::<String>("name").expect(RCH);
            let mut disk = cocokit::create_disk_from_file(img_path)?;
            disk.rename(old_name,new_name)?;
            cocokit::save_disk(&mut disk,img_path)
        },
        Some(("detokenize",_cmd)) => {
            let mut dat: Vec<u8> = Vec::new();
            std::io::stdin().read_to_end(&mut dat)?;
            print!("{}",basic::detokenize(&dat));
            Ok(())
        },
        _ => {
            eprintln!("No subcommand was found, try `cocokit --help`");
            Err(Box::new(CommandError::InvalidCommand))
        }
    }
}
