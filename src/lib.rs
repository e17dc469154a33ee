//! # huffpack
//!
//! Single-file lossless byte compression with Huffman codes and a
//! self-describing header.
//!
//! ```rust
//! use huffpack::{CodecConfig, compress, decompress};
//!
//! let config = CodecConfig::default();
//! let packed = compress(b"abracadabra", &config)?;
//! assert_eq!(decompress(&packed, &config)?, b"abracadabra");
//! # Ok::<(), huffpack::Error>(())
//! ```

pub mod code;
pub mod codec;
pub mod config;
pub mod delta;
pub mod error;
pub mod frequency;
pub mod header;
pub mod packer;
pub mod tree;
pub mod unpacker;

pub use code::{CodeAssigner, Codeword, Dictionary, HuffmanAssigner, UnaryAssigner};
pub use codec::{Report, compress, compress_file, compress_to, decompress, decompress_file, decompress_from};
pub use config::{CodecConfig, CountWidth, Strategy};
pub use error::{Error, FormatError, Result};
