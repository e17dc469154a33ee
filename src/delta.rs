//! Reversible byte-delta filter.
//!
//! The first byte is kept as is and each later byte is replaced by its
//! wrapping difference from the byte before it.

pub fn encode(data: &mut [u8]) {
    let mut previous = 0u8;
    for byte in data.iter_mut() {
        let current = *byte;
        *byte = current.wrapping_sub(previous);
        previous = current;
    }
}

pub fn decode(data: &mut [u8]) {
    let mut previous = 0u8;
    for byte in data.iter_mut() {
        *byte = byte.wrapping_add(previous);
        previous = *byte;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_becomes_constant() {
        let mut data: Vec<u8> = (10..20).collect();
        encode(&mut data);
        assert_eq!(data[0], 10);
        assert!(data[1..].iter().all(|&d| d == 1));
        decode(&mut data);
        assert_eq!(data, (10..20).collect::<Vec<u8>>());
    }

    #[test]
    fn test_wrapping() {
        let original = vec![0xFF, 0x00, 0x80, 0x7F];
        let mut data = original.clone();
        encode(&mut data);
        assert_eq!(data, vec![0xFF, 0x01, 0x80, 0xFF]);
        decode(&mut data);
        assert_eq!(data, original);
    }
}
