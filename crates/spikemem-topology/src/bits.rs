// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Binary ↔ one-hot bit decomposition.

All codes are least-significant bit first. Everything here is an iterative
loop over the bits of a value.
*/

/// Number of bits needed to write `n` in binary: ⌈log2(n + 1)⌉
///
/// ```
/// use spikemem_topology::bits::bit_width;
///
/// assert_eq!(bit_width(5), 3);
/// assert_eq!(bit_width(8), 4);
/// ```
pub fn bit_width(n: usize) -> usize {
    let mut remaining = n;
    let mut width = 0;
    while remaining > 0 {
        remaining >>= 1;
        width += 1;
    }
    width
}

/// The low `width` bits of `n`, LSB first
pub fn decimal_to_binary(n: usize, width: usize) -> Vec<u8> {
    let mut bits = Vec::with_capacity(width);
    let mut remaining = n;
    for _ in 0..width {
        bits.push((remaining & 1) as u8);
        remaining >>= 1;
    }
    bits
}

/// Positions of the set bits of `n`, ascending
pub fn set_bits(n: usize) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut remaining = n;
    let mut position = 0;
    while remaining > 0 {
        if remaining & 1 == 1 {
            positions.push(position);
        }
        remaining >>= 1;
        position += 1;
    }
    positions
}

/// Value of an LSB-first bit vector; any non-zero entry counts as set
pub fn binary_to_decimal(bits: &[u8]) -> usize {
    bits.iter()
        .enumerate()
        .filter(|(_, &b)| b != 0)
        .fold(0, |acc, (position, _)| acc | (1 << position))
}

/// Value whose set bits are exactly `positions`
pub fn set_bits_to_decimal<I: IntoIterator<Item = usize>>(positions: I) -> usize {
    positions.into_iter().fold(0, |acc, position| acc | (1 << position))
}

/// `width` entries, a single 1 at `index`; all zero when `index >= width`
pub fn one_hot(index: usize, width: usize) -> Vec<u8> {
    let mut code = vec![0; width];
    if let Some(slot) = code.get_mut(index) {
        *slot = 1;
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_width() {
        assert_eq!(bit_width(0), 0);
        assert_eq!(bit_width(1), 1);
        assert_eq!(bit_width(3), 2);
        assert_eq!(bit_width(4), 3);
        assert_eq!(bit_width(10), 4);
    }

    #[test]
    fn test_decimal_to_binary_lsb_first() {
        assert_eq!(decimal_to_binary(6, 4), vec![0, 1, 1, 0]);
        assert_eq!(decimal_to_binary(5, 2), vec![1, 0]);
        assert_eq!(binary_to_decimal(&decimal_to_binary(13, 4)), 13);
    }

    #[test]
    fn test_set_bits() {
        assert_eq!(set_bits(0), Vec::<usize>::new());
        assert_eq!(set_bits(3), vec![0, 1]);
        assert_eq!(set_bits(10), vec![1, 3]);
        assert_eq!(set_bits_to_decimal(set_bits(10)), 10);
    }

    #[test]
    fn test_one_hot() {
        assert_eq!(one_hot(2, 5), vec![0, 0, 1, 0, 0]);
        assert_eq!(one_hot(7, 3), vec![0, 0, 0]);
    }

    #[test]
    fn test_every_code_up_to_width_is_distinct() {
        let width = bit_width(20);
        let codes: std::collections::BTreeSet<Vec<u8>> =
            (1..=20).map(|k| decimal_to_binary(k, width)).collect();
        assert_eq!(codes.len(), 20);
    }
}
