//! Movie file header
//!
//! ```text
//! offset  size  field
//! 0       4     magic "CTM" 0x1B
//! 4       8     program_id (u64 LE)
//! 12      20    build revision (raw bytes of a 40-digit hex hash)
//! 32      224   reserved, zero
//! ```
//!
//! The header is always 256 bytes, so the record stream starts at a fixed
//! offset regardless of what the header holds.

/// File type identifier
pub const MOVIE_MAGIC: [u8; 4] = *b"CTM\x1B";

/// Total header size in bytes
pub const HEADER_SIZE: usize = 256;

/// Raw revision bytes stored in the header
pub const REVISION_SIZE: usize = 20;

/// Zero padding after the revision
pub const RESERVED_SIZE: usize = HEADER_SIZE - MOVIE_MAGIC.len() - 8 - REVISION_SIZE;

/// Identity of the title and build a movie was recorded with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieHeader {
    /// Title id of the loaded program
    pub program_id: u64,
    /// Build revision, hex-decoded
    pub revision: [u8; REVISION_SIZE],
}

impl MovieHeader {
    /// Build a header from a program id and a hex revision string
    pub fn new(program_id: u64, revision_hex: &str) -> Self {
        Self {
            program_id,
            revision: revision_bytes(revision_hex),
        }
    }

    /// Revision as a lowercase hex string
    pub fn revision_hex(&self) -> String {
        hex::encode(self.revision)
    }

    /// Compare against the running title and build
    ///
    /// The running revision goes through the same conversion as a recorded
    /// one, so a movie always matches the build that wrote it.
    pub fn check(&self, program_id: u64, revision_hex: &str) -> HeaderCheck {
        HeaderCheck {
            revision_matches: self.revision == pack_revision(revision_hex).0,
            program_matches: self.program_id == program_id,
        }
    }
}

/// Convert a hex revision string into header bytes
///
/// Invalid hex yields zeros; short input is zero-padded and long input
/// truncated. Both cases are logged.
pub fn revision_bytes(revision_hex: &str) -> [u8; REVISION_SIZE] {
    let (bytes, decoded) = pack_revision(revision_hex);
    match decoded {
        Ok(len) if len != REVISION_SIZE => tracing::warn!(
            "Build revision is {} bytes, expected {}; storing it zero-padded/truncated",
            len,
            REVISION_SIZE
        ),
        Ok(_) => {}
        Err(e) => {
            tracing::warn!("Build revision '{}' is not valid hex ({}); storing zeros", revision_hex, e);
        }
    }
    bytes
}

/// Silent conversion shared by [`revision_bytes`] and [`MovieHeader::check`]
///
/// Also returns the decoded length, or the hex error.
fn pack_revision(revision_hex: &str) -> ([u8; REVISION_SIZE], Result<usize, hex::FromHexError>) {
    let mut bytes = [0u8; REVISION_SIZE];
    let decoded = hex::decode(revision_hex.trim()).map(|decoded| {
        let len = decoded.len().min(REVISION_SIZE);
        bytes[..len].copy_from_slice(&decoded[..len]);
        decoded.len()
    });
    (bytes, decoded)
}

/// Outcome of comparing a header with the running title and build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderCheck {
    pub revision_matches: bool,
    pub program_matches: bool,
}

impl HeaderCheck {
    /// Whether playback can be expected to stay in sync
    pub fn is_exact(&self) -> bool {
        self.revision_matches && self.program_matches
    }

    /// Log a warning for each mismatch
    pub fn warn(&self) {
        if !self.revision_matches {
            tracing::warn!("This movie was created on a different build, playback may desync");
        }
        if !self.program_matches {
            tracing::warn!("This movie was recorded using a ROM with a different program id");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REV: &str = "0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn test_header_layout_constants() {
        assert_eq!(RESERVED_SIZE, 224);
        assert_eq!(MOVIE_MAGIC, [b'C', b'T', b'M', 0x1B]);
    }

    #[test]
    fn test_revision_hex_roundtrip() {
        let header = MovieHeader::new(1, REV);
        assert_eq!(header.revision[0], 0x01);
        assert_eq!(header.revision[19], 0x67);
        assert_eq!(header.revision_hex(), REV);
    }

    #[test]
    fn test_revision_short_is_padded() {
        let bytes = revision_bytes("abcd");
        assert_eq!(&bytes[..2], &[0xAB, 0xCD]);
        assert!(bytes[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_revision_invalid_hex_is_zero() {
        assert_eq!(revision_bytes("not a hash"), [0u8; REVISION_SIZE]);
    }

    #[test]
    fn test_check_is_case_insensitive() {
        let header = MovieHeader::new(0x0004_0000_0012_3400, REV);
        let check = header.check(0x0004_0000_0012_3400, &REV.to_uppercase());
        assert!(check.is_exact());
    }

    #[test]
    fn test_check_matches_same_build_with_short_or_invalid_revision() {
        for revision in ["abcd", "dev-build", ""] {
            let header = MovieHeader::new(1, revision);
            let check = header.check(1, revision);
            assert!(check.revision_matches, "revision {revision:?}");
            assert!(check.is_exact());
        }
    }

    #[test]
    fn test_check_reports_mismatches() {
        let header = MovieHeader::new(7, REV);
        let check = header.check(8, "ff");
        assert!(!check.revision_matches);
        assert!(!check.program_matches);
        assert!(!check.is_exact());
    }
}
