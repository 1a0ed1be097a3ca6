//! # DECB granule allocation table
//!
//! The FAT is the first 68 bytes of (directory track, sector 2).  Each cell
//! either frees its granule, links it to a successor, or terminates a chain
//! with a sector count.  The remaining 188 bytes of the sector are padding:
//! 0xFF on a freshly formatted diskette, 0x00 once Disk BASIC has performed
//! any file operation.  The padding is reproduced faithfully here since it is
//! the visible difference between a virgin diskette and a used one.

use log::error;
use super::types::*;

/// In-memory copy of the allocation table, kept in sync with the image
/// by the file system layer.
pub struct Fat {
    cells: [u8;TOTAL_GRANULES as usize],
    /// fresh-format padding convention still in effect
    fresh: bool
}

impl Fat {
    /// the table of a freshly formatted diskette: everything free
    pub fn blank() -> Self {
        Self {
            cells: [0xff;TOTAL_GRANULES as usize],
            fresh: true
        }
    }
    /// Build the table from the FAT sector.  The padding bytes reveal whether
    /// the diskette has seen any file operation since it was formatted.
    pub fn from_sector(dat: &[u8]) -> Self {
        let mut cells: [u8;TOTAL_GRANULES as usize] = [0xff;TOTAL_GRANULES as usize];
        cells.copy_from_slice(&dat[0..TOTAL_GRANULES as usize]);
        Self {
            cells,
            fresh: dat[TOTAL_GRANULES as usize..].iter().all(|b| *b==0xff)
        }
    }
    /// Emit the full 256 byte FAT sector with the applicable padding convention.
    pub fn to_sector(&self) -> Vec<u8> {
        let pad: u8 = match self.fresh {
            true => 0xff,
            false => 0x00
        };
        let mut ans = vec![pad;SECTOR_SIZE];
        ans[0..TOTAL_GRANULES as usize].copy_from_slice(&self.cells);
        ans
    }
    /// Decode one cell, `CorruptFat` if the index or the byte is bad.
    pub fn entry(&self,g: u8) -> Result<FatEntry,Error> {
        if g >= TOTAL_GRANULES {
            error!("granule {} is out of range",g);
            return Err(Error::CorruptFat(g));
        }
        match FatEntry::from_byte(self.cells[g as usize]) {
            Some(cell) => Ok(cell),
            None => {
                error!("FAT cell {} holds malformed byte {:#04x}",g,self.cells[g as usize]);
                Err(Error::CorruptFat(g))
            }
        }
    }
    pub fn set_entry(&mut self,g: u8,cell: FatEntry) {
        self.cells[g as usize] = cell.to_byte();
        self.fresh = false;
    }
    /// Walk the chain from `first`.  Returns the granules in order and the
    /// sector count of the terminal granule.  Refuses to return a partial
    /// chain: any cycle, malformed cell, or link onto a free granule fails.
    pub fn walk(&self,first: u8) -> Result<(Vec<u8>,u8),Error> {
        let mut chain: Vec<u8> = Vec::new();
        let mut curr = first;
        loop {
            if chain.contains(&curr) {
                error!("granule {} revisited, FAT chain from {} has a cycle",curr,first);
                return Err(Error::CorruptFat(curr));
            }
            match self.entry(curr)? {
                FatEntry::Free => {
                    error!("FAT chain from {} ran onto free granule {}",first,curr);
                    return Err(Error::CorruptFat(curr));
                },
                FatEntry::Next(next) => {
                    chain.push(curr);
                    curr = next;
                },
                FatEntry::Last(sectors) => {
                    chain.push(curr);
                    return Ok((chain,sectors));
                }
            }
        }
    }
    /// Find `count` free granules in the authentic DECB search order:
    /// granules 32 through 67 in ascending order first, then 0 through 31.
    /// Purely positional; no attempt is made to minimize fragmentation.
    pub fn find_free(&self,count: usize) -> Result<Vec<u8>,Error> {
        let mut found: Vec<u8> = Vec::new();
        for g in (32..TOTAL_GRANULES).chain(0..32) {
            if self.cells[g as usize] == 0xff {
                found.push(g);
                if found.len() == count {
                    return Ok(found);
                }
            }
        }
        error!("need {} granules but only {} are free",count,found.len());
        Err(Error::InsufficientSpace)
    }
    /// Link an ordered set of granules into a chain, the last one terminal
    /// with `last_sectors` sectors in use.
    pub fn link(&mut self,granules: &[u8],last_sectors: u8) {
        for i in 0..granules.len() {
            match i+1 < granules.len() {
                true => self.set_entry(granules[i],FatEntry::Next(granules[i+1])),
                false => self.set_entry(granules[i],FatEntry::Last(last_sectors))
            };
        }
    }
    /// Walk the chain from `first` and free every granule on it.
    /// Nothing is freed if the chain is corrupt.
    pub fn free_chain(&mut self,first: u8) -> Result<Vec<u8>,Error> {
        let (chain,_sectors) = self.walk(first)?;
        for g in &chain {
            self.set_entry(*g,FatEntry::Free);
        }
        Ok(chain)
    }
    pub fn free_granules(&self) -> usize {
        self.cells.iter().filter(|b| **b==0xff).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentic_search_order() {
        let fat = Fat::blank();
        assert_eq!(fat.find_free(3).expect("no free granules"),vec![32,33,34]);
        let mut fat = Fat::blank();
        for g in 32..68 {
            fat.set_entry(g,FatEntry::Last(9));
        }
        // upper half exhausted, search wraps to granule 0
        assert_eq!(fat.find_free(2).expect("no free granules"),vec![0,1]);
    }

    #[test]
    fn link_and_walk() {
        let mut fat = Fat::blank();
        fat.link(&[32,33,40],2);
        assert_eq!(fat.entry(32).expect("bad cell"),FatEntry::Next(33));
        assert_eq!(fat.entry(33).expect("bad cell"),FatEntry::Next(40));
        assert_eq!(fat.entry(40).expect("bad cell"),FatEntry::Last(2));
        let (chain,sectors) = fat.walk(32).expect("walk failed");
        assert_eq!(chain,vec![32,33,40]);
        assert_eq!(sectors,2);
    }

    #[test]
    fn walk_rejects_cycle() {
        let mut fat = Fat::blank();
        fat.set_entry(5,FatEntry::Next(8));
        fat.set_entry(8,FatEntry::Next(5));
        assert!(fat.walk(5).is_err());
    }

    #[test]
    fn walk_rejects_self_pointer() {
        let mut fat = Fat::blank();
        fat.set_entry(10,FatEntry::Next(10));
        assert!(fat.walk(10).is_err());
    }

    #[test]
    fn walk_rejects_free_landing() {
        let mut fat = Fat::blank();
        fat.set_entry(32,FatEntry::Next(33));
        assert!(fat.walk(32).is_err());
    }

    #[test]
    fn walk_rejects_malformed_cell() {
        let mut sector = vec![0x00;256];
        sector[0..68].fill(0xff);
        sector[32] = 0x90; // neither pointer, terminal, nor free
        let fat = Fat::from_sector(&sector);
        assert!(fat.walk(32).is_err());
    }

    #[test]
    fn free_chain_releases_all() {
        let mut fat = Fat::blank();
        fat.link(&[32,33,34],9);
        assert_eq!(fat.free_granules(),65);
        let chain = fat.free_chain(32).expect("free failed");
        assert_eq!(chain,vec![32,33,34]);
        assert_eq!(fat.free_granules(),68);
    }

    #[test]
    fn padding_conventions() {
        let fat = Fat::blank();
        assert_eq!(fat.to_sector(),vec![0xff;256]);
        let mut fat = Fat::blank();
        fat.set_entry(32,FatEntry::Last(1));
        let sector = fat.to_sector();
        assert_eq!(sector[32],0xc1);
        assert!(sector[0..32].iter().all(|b| *b==0xff));
        // any file operation flips the padding convention to zeros
        assert!(sector[68..].iter().all(|b| *b==0x00));
        // and the convention is recovered when re-reading the sector
        let fat = Fat::from_sector(&sector);
        fat.to_sector()[68..].iter().for_each(|b| assert_eq!(*b,0x00));
    }
}
