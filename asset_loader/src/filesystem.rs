use crate::{Error, Result};
use std::{
    fs::{self, File},
    io::BufReader,
    path::Path,
};

#[inline]
pub fn open_file(path: impl AsRef<Path>) -> Result<BufReader<File>> {
    let path = path.as_ref();
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })
}

#[inline]
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}
