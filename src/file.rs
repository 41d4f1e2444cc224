//! Encapsulates plaintext and gzip-compressed file input, and plaintext output.
//!
//! The [`InputFile`] abstraction lets genotype exports and reference maps be
//! read whether or not they were gzipped. [`OutputFile`] writes the plaintext
//! linkage files with an optional commented header.
//!
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error on '{path}': {source}")]
    IOError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    fn io(path: &Path, source: io::Error) -> Self {
        FileError::IOError {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Check if a file is gzipped by looking for the magic numbers.
///
/// Files shorter than two bytes are treated as plaintext.
fn is_gzipped_file(file_path: &Path) -> io::Result<bool> {
    let mut file = File::open(file_path)?;
    let mut buffer = [0; 2];
    match file.read_exact(&mut buffer) {
        Ok(()) => Ok(buffer == [0x1f, 0x8b]),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

/// Represents an input file.
///
/// Plaintext and gzip-compressed input are read through a common interface;
/// compression is detected from the file's contents, not its extension.
pub struct InputFile {
    pub filepath: PathBuf,
}

impl InputFile {
    /// Constructs a new `InputFile`.
    pub fn new(filepath: impl AsRef<Path>) -> Self {
        Self {
            filepath: filepath.as_ref().to_path_buf(),
        }
    }

    /// Whether the file exists and is a regular file.
    pub fn exists(&self) -> bool {
        self.filepath.is_file()
    }

    /// Opens the file and returns a buffered reader.
    ///
    /// # Returns
    ///
    /// A result containing a `BufReader<Box<dyn Read>>` on success, or a `FileError` on failure.
    ///
    pub fn reader(&self) -> Result<BufReader<Box<dyn Read>>, FileError> {
        let path = &self.filepath;
        let file = File::open(path).map_err(|e| FileError::io(path, e))?;
        let is_gzipped = is_gzipped_file(path).map_err(|e| FileError::io(path, e))?;
        let reader: Box<dyn Read> = if is_gzipped {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(BufReader::new(reader))
    }
}

/// Represents an output file.
///
/// Output is always plaintext, since linkage tools expect uncompressed PED
/// and MAP files. An optional block of commented header lines is written first.
pub struct OutputFile {
    pub filepath: PathBuf,
    pub header: Option<Vec<String>>,
}

impl OutputFile {
    /// Constructs a new `OutputFile`.
    ///
    /// # Arguments
    ///
    /// * `filepath` - The path of the file to create.
    /// * `header` - Optional header lines, each written as `# <line>`.
    pub fn new(filepath: impl AsRef<Path>, header: Option<Vec<String>>) -> Self {
        Self {
            filepath: filepath.as_ref().to_path_buf(),
            header,
        }
    }

    /// Creates (or truncates) the file and returns a buffered writer, with
    /// the header already written.
    pub fn writer(&self) -> Result<Box<dyn Write>, FileError> {
        let path = &self.filepath;
        let file = File::create(path).map_err(|e| FileError::io(path, e))?;
        let mut writer: Box<dyn Write> = Box::new(BufWriter::new(file));
        if let Some(entries) = &self.header {
            for entry in entries {
                writeln!(writer, "# {}", entry).map_err(|e| FileError::io(path, e))?;
            }
        }
        Ok(writer)
    }
}
