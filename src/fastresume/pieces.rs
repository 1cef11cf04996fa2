/// Per-piece completion map in libtorrent's resume layout.
///
/// Unlike the peer-wire bitfield, libtorrent stores one byte per piece in the
/// `pieces` key: `1` when the piece is complete and `0` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceMap {
    pieces: Vec<u8>,
}

impl PieceMap {
    /// A map with every piece marked complete.
    pub fn full(piece_count: usize) -> Self {
        Self {
            pieces: vec![1; piece_count],
        }
    }

    /// A map with no piece complete.
    pub fn empty(piece_count: usize) -> Self {
        Self {
            pieces: vec![0; piece_count],
        }
    }

    /// Wraps a byte-per-piece map as found in resume files.
    ///
    /// Any non-zero byte counts as complete.
    pub fn from_resume_bytes(bytes: &[u8]) -> Self {
        Self {
            pieces: bytes.iter().map(|&b| u8::from(b != 0)).collect(),
        }
    }

    /// Expands a packed, MSB-first bitfield into a byte-per-piece map.
    ///
    /// Returns `None` when `bits` is too short to cover `piece_count` pieces.
    pub fn from_packed_bits(bits: &[u8], piece_count: usize) -> Option<Self> {
        if bits.len() < piece_count.div_ceil(8) {
            return None;
        }
        let pieces = (0..piece_count)
            .map(|index| {
                let byte_index = index / 8;
                let bit_index = 7 - (index % 8);
                (bits[byte_index] >> bit_index) & 1
            })
            .collect();
        Some(Self { pieces })
    }

    /// Number of complete pieces.
    pub fn count(&self) -> usize {
        self.pieces.iter().filter(|&&b| b == 1).count()
    }

    pub fn is_complete(&self) -> bool {
        self.count() == self.pieces.len()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pieces
    }
}
