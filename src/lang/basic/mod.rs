//! # Color BASIC language module
//!
//! Handles detokenization of Color BASIC programs, covering the Extended,
//! Disk Extended, and Super Extended (CoCo 3) token sets.  The decoder is a
//! byte stream state machine: tokens expand through two tables (single byte
//! keywords plus an 0xFF-prefixed function namespace), while quoted strings
//! and comment bodies pass through verbatim.  Unknown codes become sentinel
//! text rather than errors, and a stream that ends mid-line yields the
//! partial listing with a truncation flag; the decoder never fails on
//! content and never mutates its input.
//!
//! Tokenizing (the inverse direction) is not attempted.

mod tokens;

use std::collections::HashMap;
use log::warn;

/// line numbers above this cannot be entered, so a larger word at the start
/// of a line can only be a link pointer
pub const MAX_LINE_NUMBER: u16 = 63999;

/// length of the preamble found on machine-language style dumps:
/// 0xFF, 2-byte load address, 2-byte length
const ML_PREAMBLE: usize = 5;

/// Heuristic test that a byte stream holds a tokenized BASIC program:
/// more than a preamble's worth of bytes, at least one high-bit byte in the
/// body, and an opening line number no greater than 63999.
pub fn is_tokenized(img: &[u8]) -> bool {
    if img.len() <= ML_PREAMBLE {
        return false;
    }
    let mut addr = match img[0] {
        0xff => ML_PREAMBLE,
        _ => 0
    };
    if !img[addr..].iter().any(|b| b & 0x80 != 0) {
        return false;
    }
    while addr+2 <= img.len() && img[addr]==0 && img[addr+1]==0 {
        addr += 1;
    }
    if addr+2 > img.len() {
        return false;
    }
    let mut w = u16::from_be_bytes([img[addr],img[addr+1]]);
    if w > MAX_LINE_NUMBER {
        // that would be a link pointer, the line number follows it
        if addr+4 > img.len() {
            return false;
        }
        w = u16::from_be_bytes([img[addr+2],img[addr+3]]);
    }
    w > 0 && w <= MAX_LINE_NUMBER
}

/// Handles detokenization of Color BASIC
pub struct Detokenizer {
    detok_map: HashMap<u8,&'static str>,
    func_map: HashMap<u8,&'static str>,
    truncated: bool
}

impl Detokenizer {
    /// Create a new `Detokenizer` structure
    pub fn new() -> Self {
        Self {
            detok_map: HashMap::from(tokens::KEYWORDS),
            func_map: HashMap::from(tokens::FUNCTIONS),
            truncated: false
        }
    }
    /// True if the last `detokenize` call ran out of bytes before the
    /// expected terminator.
    pub fn truncated(&self) -> bool {
        self.truncated
    }
    /// Detokenize from byte array into a UTF8 string, one source line per
    /// text line.  The stream ends at a zero word where the next line was
    /// expected; a premature end yields the partial listing and sets the
    /// truncation flag.
    pub fn detokenize(&mut self,img: &[u8]) -> String {
        self.truncated = false;
        let mut code = String::new();
        let mut addr = 0;
        // machine language preamble
        if img.len() > 0 && img[0] == 0xff {
            if img.len() < ML_PREAMBLE {
                self.truncated = true;
                return code;
            }
            addr = ML_PREAMBLE;
        }
        // tolerate stray null padding ahead of the first line
        while addr+2 <= img.len() && img[addr]==0 && img[addr+1]==0 {
            addr += 1;
        }
        loop {
            if addr+2 > img.len() {
                // the zero word that ends the program never arrived
                self.truncated = match addr < img.len() {
                    true => img[addr] != 0,
                    false => code.len() > 0
                };
                break;
            }
            let mut w = u16::from_be_bytes([img[addr],img[addr+1]]);
            addr += 2;
            if w == 0 {
                break;
            }
            if w > MAX_LINE_NUMBER {
                // that was the link pointer; the line number follows
                if addr+2 > img.len() {
                    self.truncated = true;
                    break;
                }
                w = u16::from_be_bytes([img[addr],img[addr+1]]);
                addr += 2;
                if w == 0 {
                    break;
                }
            }
            let mut line = w.to_string() + " ";
            addr = self.detokenize_line(img,addr,&mut line);
            code += line.trim_end();
            code += "\n";
            if self.truncated {
                break;
            }
        }
        return code;
    }
    /// Decode one line body up to its 0x00 terminator, appending text to
    /// `line`.  Returns the address just past the terminator.
    fn detokenize_line(&mut self,img: &[u8],mut addr: usize,line: &mut String) -> usize {
        let mut in_string = false;
        let mut in_remark = false;
        loop {
            if addr >= img.len() {
                self.truncated = true;
                return addr;
            }
            let b = img[addr];
            if b == 0 {
                return addr + 1;
            }
            if in_string {
                line.push(b as char);
                if b == 0x22 {
                    in_string = false;
                }
                addr += 1;
                continue;
            }
            if in_remark {
                line.push(b as char);
                addr += 1;
                continue;
            }
            match b {
                0x22 => {
                    line.push('"');
                    in_string = true;
                    addr += 1;
                },
                0xff => {
                    if addr+1 >= img.len() {
                        self.truncated = true;
                        return img.len();
                    }
                    match self.func_map.get(&img[addr+1]) {
                        Some(func) => Self::push_keyword(line,func),
                        None => Self::push_keyword(line,&format!("<??FF{:02X}>",img[addr+1]))
                    };
                    addr += 2;
                },
                // GO fused with the TO or SUB that follows it
                0x81 if img.get(addr+1)==Some(&0xa5) => {
                    Self::push_keyword(line,"GOTO");
                    addr += 2;
                },
                0x81 if img.get(addr+1)==Some(&0xa6) => {
                    Self::push_keyword(line,"GOSUB");
                    addr += 2;
                },
                tok if tok >= 0x80 => {
                    match self.detok_map.get(&tok) {
                        Some(keyword) => Self::push_keyword(line,keyword),
                        None => Self::push_keyword(line,&format!("<??{:02X}>",tok))
                    };
                    // REM and ' swallow the rest of the line verbatim
                    if tok == 0x82 || tok == 0x83 {
                        in_remark = true;
                    }
                    addr += 1;
                },
                0x3a => {
                    if line.ends_with(' ') {
                        line.pop();
                    }
                    line.push(':');
                    in_remark = false;
                    addr += 1;
                },
                0x20 => {
                    if !line.ends_with(' ') {
                        line.push(' ');
                    }
                    addr += 1;
                },
                _ => {
                    line.push(b as char);
                    addr += 1;
                }
            }
        }
    }
    /// Emit a keyword with the LIST spacing rules: a space goes in front
    /// unless the previous character supplies one, and a space follows
    /// unless the keyword opens a parenthesis or starts a comment.
    fn push_keyword(line: &mut String,keyword: &str) {
        match line.chars().last() {
            Some(' ') | Some('(') | Some(',') => {},
            _ => line.push(' ')
        };
        line.push_str(keyword);
        if !keyword.ends_with('(') && keyword != "'" {
            line.push(' ');
        }
    }
}

/// Convenience wrapper around `Detokenizer`; truncation is demoted to a
/// logged warning.
pub fn detokenize(img: &[u8]) -> String {
    let mut detok = Detokenizer::new();
    let code = detok.detokenize(img);
    if detok.truncated() {
        warn!("stream ended before the line terminator, listing may be incomplete");
    }
    code
}
