//! Property tests for the codec invariants.

use proptest::prelude::*;

use huffpack::code::{CodeAssigner, HuffmanAssigner, UnaryAssigner};
use huffpack::frequency::FrequencyModel;
use huffpack::header::read_header;
use huffpack::{CodecConfig, Strategy as CodeStrategy, compress, decompress};

/// Inputs drawn from a small alphabet so frequencies are uneven.
fn narrow_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop_oneof![4 => Just(b'e'), 2 => 0u8..8, 1 => any::<u8>()], 0..2000)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_roundtrip_any_bytes(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        let config = CodecConfig::default();
        let packed = compress(&data, &config).unwrap();
        prop_assert_eq!(decompress(&packed, &config).unwrap(), data);
    }

    #[test]
    fn prop_roundtrip_with_delta(data in narrow_bytes()) {
        let config = CodecConfig { delta: true, ..CodecConfig::default() };
        let packed = compress(&data, &config).unwrap();
        prop_assert_eq!(decompress(&packed, &config).unwrap(), data);
    }

    #[test]
    fn prop_roundtrip_unary(data in prop::collection::vec(0u8..48, 0..1000)) {
        let config = CodecConfig { strategy: CodeStrategy::Unary, ..CodecConfig::default() };
        let packed = compress(&data, &config).unwrap();
        prop_assert_eq!(decompress(&packed, &config).unwrap(), data);
    }

    #[test]
    fn prop_huffman_codes_prefix_free(data in narrow_bytes()) {
        let dict = HuffmanAssigner.assign(FrequencyModel::scan(&data).into_table());
        let codes: Vec<_> = dict.iter().collect();
        for (a, code_a) in &codes {
            prop_assert!(!code_a.is_empty());
            for (b, code_b) in &codes {
                if a != b {
                    prop_assert!(!code_a.is_prefix_of(code_b), "{:?} prefixes {:?}", code_a, code_b);
                }
            }
        }
    }

    #[test]
    fn prop_unary_codes_prefix_free(data in narrow_bytes()) {
        let dict = UnaryAssigner.assign(FrequencyModel::scan(&data).into_table());
        prop_assert!(dict.check_prefix_free().is_ok());
    }

    #[test]
    fn prop_huffman_tree_is_full(data in narrow_bytes()) {
        let dict = HuffmanAssigner.assign(FrequencyModel::scan(&data).into_table());
        prop_assume!(dict.len() >= 2);
        // Kraft sum of a full binary tree is exactly one.
        let kraft: f64 = dict.iter().map(|(_, code)| 0.5f64.powi(code.len() as i32)).sum();
        prop_assert!((kraft - 1.0).abs() < 1e-9);
    }

    #[test]
    fn prop_dictionary_is_a_bijection(data in narrow_bytes()) {
        let config = CodecConfig::default();
        let dict = HuffmanAssigner.assign(FrequencyModel::scan(&data).into_table());
        let reverse = dict.reverse();
        prop_assert_eq!(reverse.len(), dict.len());

        let packed = compress(&data, &config).unwrap();
        let header = read_header(&mut packed.as_slice(), config.count_width).unwrap();
        prop_assert_eq!(header.dictionary.reverse(), reverse);
    }
}
