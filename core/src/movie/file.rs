//! Movie file persistence
//!
//! Reads and writes `.ctm` files: a fixed 256-byte header followed by the
//! raw record stream.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::error::MovieError;
use super::header::{MOVIE_MAGIC, MovieHeader, RESERVED_SIZE, REVISION_SIZE};
use super::log::InputLog;

/// Complete movie (in-memory representation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieFile {
    pub header: MovieHeader,
    pub log: InputLog,
}

impl MovieFile {
    /// Load a movie from disk
    ///
    /// Fails on I/O errors, bad magic or a truncated header. Revision and
    /// program checks are left to the caller.
    pub fn load(path: &Path) -> Result<Self, MovieError> {
        let file = fs::File::open(path).map_err(|e| MovieError::io(path, e))?;
        Self::read_from(io::BufReader::new(file)).map_err(|e| match e {
            MovieError::Stream(source) => MovieError::io(path, source),
            other => other,
        })
    }

    /// Write the header and log to disk, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<(), MovieError> {
        let mut buffer = Vec::with_capacity(super::header::HEADER_SIZE + self.log.len());
        self.write_to(&mut buffer)?;
        fs::write(path, buffer).map_err(|e| MovieError::io(path, e))
    }

    /// Parse a movie from any reader
    pub fn read_from(reader: impl Read) -> Result<Self, MovieError> {
        MovieReader::new(reader).read_movie()
    }

    /// Serialize the movie into any writer
    pub fn write_to(&self, writer: impl Write) -> io::Result<()> {
        MovieWriter::new(writer).write_movie(self)
    }
}

/// Reader for the movie format
pub struct MovieReader<R: Read> {
    reader: R,
}

impl<R: Read> MovieReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read a complete movie from the input
    pub fn read_movie(&mut self) -> Result<MovieFile, MovieError> {
        let header = self.read_header()?;

        let mut body = Vec::new();
        self.reader.read_to_end(&mut body)?;
        let log = InputLog::from_bytes(body);
        if log.trailing_bytes() != 0 {
            tracing::warn!(
                "Movie body ends with a partial record ({} stray bytes); it will be ignored",
                log.trailing_bytes()
            );
        }

        Ok(MovieFile { header, log })
    }

    /// Read and validate the 256-byte header
    fn read_header(&mut self) -> Result<MovieHeader, MovieError> {
        let mut magic = [0u8; 4];
        self.read_header_bytes(&mut magic)?;
        if magic != MOVIE_MAGIC {
            return Err(MovieError::Format(format!(
                "bad magic {:02X?}, expected {:02X?}",
                magic, MOVIE_MAGIC
            )));
        }

        let program_id = self
            .reader
            .read_u64::<LittleEndian>()
            .map_err(truncated)?;

        let mut revision = [0u8; REVISION_SIZE];
        self.read_header_bytes(&mut revision)?;

        let mut reserved = [0u8; RESERVED_SIZE];
        self.read_header_bytes(&mut reserved)?;

        Ok(MovieHeader {
            program_id,
            revision,
        })
    }

    fn read_header_bytes(&mut self, buf: &mut [u8]) -> Result<(), MovieError> {
        self.reader.read_exact(buf).map_err(truncated)
    }
}

fn truncated(e: io::Error) -> MovieError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        MovieError::Format("truncated header".to_string())
    } else {
        MovieError::Stream(e)
    }
}

/// Writer for the movie format
pub struct MovieWriter<W: Write> {
    writer: W,
}

impl<W: Write> MovieWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write header and record stream
    pub fn write_movie(&mut self, movie: &MovieFile) -> io::Result<()> {
        self.write_header(&movie.header)?;
        self.writer.write_all(movie.log.as_bytes())?;
        self.writer.flush()
    }

    fn write_header(&mut self, header: &MovieHeader) -> io::Result<()> {
        self.writer.write_all(&MOVIE_MAGIC)?;
        self.writer.write_u64::<LittleEndian>(header.program_id)?;
        self.writer.write_all(&header.revision)?;
        self.writer.write_all(&[0u8; RESERVED_SIZE])?;
        Ok(())
    }
}
