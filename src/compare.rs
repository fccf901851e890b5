use crate::errors::Result;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 8192;

/// Returns `true` when both files hold exactly the same bytes.
///
/// A size mismatch answers early; otherwise both files are read in chunks and
/// compared until the first differing chunk.
pub fn files_identical(a: &Path, b: &Path) -> Result<bool> {
    if a.metadata()?.len() != b.metadata()?.len() {
        return Ok(false);
    }

    let mut reader_a = BufReader::new(File::open(a)?);
    let mut reader_b = BufReader::new(File::open(b)?);
    let mut buf_a = [0u8; CHUNK_SIZE];
    let mut buf_b = [0u8; CHUNK_SIZE];

    loop {
        let read_a = read_chunk(&mut reader_a, &mut buf_a)?;
        let read_b = read_chunk(&mut reader_b, &mut buf_b)?;

        if read_a != read_b || buf_a[..read_a] != buf_b[..read_b] {
            return Ok(false);
        }
        if read_a == 0 {
            return Ok(true);
        }
    }
}

/// Fills `buf` as far as the reader allows, so short reads never look like a difference.
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
