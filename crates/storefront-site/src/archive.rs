//! Zip packaging of built sites.

use std::io::{Cursor, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Errors that can occur while writing an archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Write `files` (archive path, contents) into a deflated zip.
pub fn write_zip<'a, W, I>(writer: W, files: I) -> Result<W, ArchiveError>
where
    W: Write + Seek,
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, contents) in files {
        zip.start_file(name, options)?;
        zip.write_all(contents)?;
    }

    Ok(zip.finish()?)
}

/// Zip `files` into memory.
pub fn zip_bytes<'a, I>(files: I) -> Result<Vec<u8>, ArchiveError>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    Ok(write_zip(Cursor::new(Vec::new()), files)?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    use pretty_assertions::assert_eq;

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();
        contents
    }

    #[test]
    fn writes_files_into_zip() {
        let bytes = zip_bytes([
            ("index.html", b"<h1>Home</h1>".as_slice()),
            ("assets/theme.css", b"body{}".as_slice()),
        ])
        .unwrap();

        let archive = zip::ZipArchive::new(Cursor::new(&bytes)).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort();

        assert_eq!(names, vec!["assets/theme.css", "index.html"]);
        assert_eq!(read_entry(&bytes, "index.html"), "<h1>Home</h1>");
    }
}
