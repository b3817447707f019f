//! Conversions between unsigned integers and fixed-width bit vectors, plus the
//! chunked bit-order reversal applied to configuration bitstreams whose stored
//! bit order is opposite to transmission order.
use alloc::vec::Vec;

use bitvec::prelude::*;

use crate::error::Error;

/// Bit container used for leg payloads and the engine's capture accumulator.
/// Index 0 is the head of the vector; whether a payload is consumed head-first
/// or tail-first is decided by the leg kind.
pub type Bits = BitVec<u8, Msb0>;

/// Binary representation of `value`, zero-padded on the left to exactly
/// `width` bits.  Values that do not fit in `width` bits are rejected rather
/// than truncated.
pub fn to_fixed_width_bits(value: u64, width: usize) -> Result<Bits, Error> {
    if width < 64 && value >> width != 0 {
        return Err(Error::WidthOverflow { value, width });
    }
    let mut bits = Bits::with_capacity(width);
    for i in (0..width).rev() {
        bits.push(i < 64 && value >> i & 1 == 1);
    }
    Ok(bits)
}

/// Interpret `bits` as an unsigned integer with the head of the vector as the
/// most significant bit.  Inverse of `to_fixed_width_bits`.
pub fn value_of(bits: &BitSlice<u8, Msb0>) -> u64 {
    bits.iter().by_vals().fold(0, |v, bit| (v << 1) | bit as u64)
}

/// Interpret `bits` with index 0 as the least significant bit.  The engine's
/// capture accumulator pushes samples in shift order, so the first-sampled bit
/// lands least significant and the newest sample most significant.  Captures
/// longer than 64 bits keep the first 64 samples.
pub fn value_lsb_first(bits: &BitSlice<u8, Msb0>) -> u64 {
    bits.iter()
        .by_vals()
        .take(64)
        .enumerate()
        .fold(0, |v, (i, bit)| v | (bit as u64) << i)
}

/// Partition `block` into consecutive chunks of `chunk_bit_width` bits and
/// reverse the bit order within each chunk, preserving chunk boundaries and
/// overall length.  A chunk width of 0 is the identity.  The chunk width must
/// be a whole number of bytes and must evenly divide the block.
pub fn reverse_bit_order(block: &[u8], chunk_bit_width: usize) -> Result<Vec<u8>, Error> {
    if chunk_bit_width == 0 {
        return Ok(block.to_vec());
    }
    if chunk_bit_width % 8 != 0 {
        return Err(Error::ChunkWidth { width: chunk_bit_width });
    }
    let chunk_bytes = chunk_bit_width / 8;
    if block.len() % chunk_bytes != 0 {
        return Err(Error::RaggedBlock { len: block.len(), chunk_bytes });
    }

    // Reversing a whole chunk is a byte reversal plus a bit reversal within
    // each byte.
    let mut out = Vec::with_capacity(block.len());
    for chunk in block.chunks_exact(chunk_bytes) {
        out.extend(chunk.iter().rev().map(|b| b.reverse_bits()));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn fixed_width_round_trip() {
        for (value, width) in [(0, 1), (1, 1), (22, 5), (0b001001, 6), (0x557b, 32), (u64::MAX, 64)] {
            let bits = to_fixed_width_bits(value, width).unwrap();
            assert_eq!(bits.len(), width);
            assert_eq!(value_of(&bits), value);
        }
    }

    #[test]
    fn fixed_width_pads_left() {
        let bits = to_fixed_width_bits(0b101, 8).unwrap();
        assert_eq!(bits, bits![u8, Msb0; 0, 0, 0, 0, 0, 1, 0, 1]);
    }

    #[test]
    fn fixed_width_rejects_overflow() {
        assert_eq!(
            to_fixed_width_bits(32, 5),
            Err(Error::WidthOverflow { value: 32, width: 5 })
        );
        assert!(to_fixed_width_bits(31, 5).is_ok());
    }

    #[test]
    fn lsb_first_matches_shift_order() {
        // Samples 0,1,1,0,1 in shift order read back as 0b10110.
        let mut acc = Bits::new();
        for bit in [false, true, true, false, true] {
            acc.push(bit);
        }
        assert_eq!(value_lsb_first(&acc), 22);
    }

    #[test]
    fn reverse_is_involution() {
        let block = [0x11u8, 0x22, 0x33, 0x44, 0xa5, 0x00, 0xff, 0x7e];
        for width in [8, 16, 32, 64] {
            let once = reverse_bit_order(&block, width).unwrap();
            let twice = reverse_bit_order(&once, width).unwrap();
            assert_eq!(twice, block);
        }
    }

    #[test]
    fn reverse_32bit_chunks() {
        let block = [0x80u8, 0x00, 0x00, 0x00];
        assert_eq!(reverse_bit_order(&block, 32).unwrap(), vec![0x00, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn reverse_zero_width_is_identity() {
        let block = [0x12u8, 0x34, 0x56];
        assert_eq!(reverse_bit_order(&block, 0).unwrap(), block.to_vec());
    }

    #[test]
    fn reverse_rejects_bad_shapes() {
        assert_eq!(
            reverse_bit_order(&[0u8; 4], 12),
            Err(Error::ChunkWidth { width: 12 })
        );
        assert_eq!(
            reverse_bit_order(&[0u8; 5], 32),
            Err(Error::RaggedBlock { len: 5, chunk_bytes: 4 })
        );
    }
}
