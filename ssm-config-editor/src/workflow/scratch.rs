use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use tempfile::TempPath;

/// Local file that holds content while the user edits it.
///
/// The file is removed when the buffer is dropped, whichever way the
/// workflow ends.
#[derive(Debug)]
pub struct ScratchBuffer {
    path: TempPath,
}

impl ScratchBuffer {
    pub fn create(prefix: &str, seed: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::Builder::new().prefix(prefix).tempfile()?;
        file.write_all(seed)?;
        file.flush()?;
        // Close our handle; editors reopen the file by path.
        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }

    pub fn discard(self) -> io::Result<()> {
        self.path.close()
    }
}
