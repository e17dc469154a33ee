//! Compress and decompress entry points, in memory and on files.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::code::Dictionary;
use crate::config::CodecConfig;
use crate::delta;
use crate::error::{Error, Result};
use crate::frequency::FrequencyModel;
use crate::header::{HeaderEncoder, read_header};
use crate::packer::BitPacker;
use crate::unpacker::BitUnpacker;

/// Sizes of one file-level run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub symbols: usize,
}

impl Report {
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 1.0;
        }
        self.output_bytes as f64 / self.input_bytes as f64
    }
}

pub fn compress(input: &[u8], config: &CodecConfig) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    compress_to(input, &mut output, config)?;
    Ok(output)
}

/// Everything needed to write a stream, built and checked before any output
/// exists.
struct Plan<'a> {
    data: Cow<'a, [u8]>,
    total: u64,
    dictionary: Dictionary,
}

impl<'a> Plan<'a> {
    fn new(input: &'a [u8], config: &CodecConfig) -> Result<Self> {
        let data: Cow<'a, [u8]> = if config.delta {
            let mut filtered = input.to_vec();
            delta::encode(&mut filtered);
            Cow::Owned(filtered)
        } else {
            Cow::Borrowed(input)
        };

        let model = FrequencyModel::scan(&data);
        let total = model.total();
        for (symbol, probability) in model.probabilities() {
            tracing::trace!(symbol, probability, "symbol probability");
        }
        debug!(total, distinct = model.distinct(), "frequencies counted");

        let assigner = config.strategy.assigner();
        let dictionary = assigner.assign(model.into_table());
        debug!(
            strategy = assigner.name(),
            symbols = dictionary.len(),
            longest = dictionary.max_len(),
            "dictionary built"
        );

        // Field widths are checked before any output is opened.
        HeaderEncoder::new(total, &dictionary, config.count_width)?;
        Ok(Self {
            data,
            total,
            dictionary,
        })
    }

    fn write_to<W: Write>(&self, out: &mut W, config: &CodecConfig) -> Result<u64> {
        let header = HeaderEncoder::new(self.total, &self.dictionary, config.count_width)?;
        let mut written = 0u64;
        for byte in header {
            out.write_all(&[byte])?;
            written += 1;
        }
        debug!(header_bytes = written, "header written");

        for byte in BitPacker::new(&self.dictionary, self.data.iter().copied(), self.total) {
            out.write_all(&[byte?])?;
            written += 1;
        }
        Ok(written)
    }
}

/// Writes the header and payload for `input` to `out`, returning the byte
/// count written and the number of distinct symbols. Capacity errors are
/// raised before the first write.
pub fn compress_to<W: Write>(
    input: &[u8],
    out: &mut W,
    config: &CodecConfig,
) -> Result<(u64, usize)> {
    let plan = Plan::new(input, config)?;
    let written = plan.write_to(out, config)?;
    Ok((written, plan.dictionary.len()))
}

pub fn decompress(input: &[u8], config: &CodecConfig) -> Result<Vec<u8>> {
    decompress_from(input, config)
}

/// Reads a header and payload from `reader`. Bytes past the payload are
/// left unread apart from a check that logs their presence.
pub fn decompress_from<R: Read>(reader: R, config: &CodecConfig) -> Result<Vec<u8>> {
    decode_stream(reader, config).map(|(output, _)| output)
}

// Returns the decoded bytes and the dictionary size from the header.
fn decode_stream<R: Read>(mut reader: R, config: &CodecConfig) -> Result<(Vec<u8>, usize)> {
    let header = read_header(&mut reader, config.count_width)?;
    let capacity = usize::try_from(header.byte_count).unwrap_or(usize::MAX);
    let mut output = Vec::with_capacity(capacity.min(1 << 20));

    let mut unpacker = BitUnpacker::new(&header, reader);
    for byte in unpacker.by_ref() {
        output.push(byte?);
    }

    let mut rest = unpacker.into_inner();
    let mut probe = [0u8; 1];
    if rest.read(&mut probe)? > 0 {
        warn!("ignoring trailing bytes after payload");
    }

    if config.delta {
        delta::decode(&mut output);
    }
    Ok((output, header.dictionary.len()))
}

fn file_hash(data: &[u8]) -> Vec<u8> {
    Sha256::digest(data).to_vec()
}

pub fn compress_file(
    input: &Path,
    output: &Path,
    config: &CodecConfig,
    verify: bool,
) -> Result<Report> {
    let data = fs::read(input)?;

    let plan = Plan::new(&data, config)?;
    let output_bytes = {
        let mut writer = BufWriter::new(File::create(output)?);
        let written = plan.write_to(&mut writer, config)?;
        writer.flush()?;
        written
    };
    let symbols = plan.dictionary.len();

    let report = Report {
        input_bytes: data.len() as u64,
        output_bytes,
        symbols,
    };
    info!(
        input = %input.display(),
        output = %output.display(),
        input_bytes = report.input_bytes,
        output_bytes = report.output_bytes,
        ratio = report.ratio(),
        "compressed"
    );

    if verify {
        let reader = BufReader::new(File::open(output)?);
        let restored = decompress_from(reader, config)?;
        if file_hash(&restored) != file_hash(&data) {
            return Err(Error::VerifyMismatch {
                path: output.display().to_string(),
            });
        }
        info!(output = %output.display(), "round trip verified");
    }
    Ok(report)
}

pub fn decompress_file(input: &Path, output: &Path, config: &CodecConfig) -> Result<Report> {
    let file = File::open(input)?;
    let input_bytes = file.metadata()?.len();
    let (data, symbols) = decode_stream(BufReader::new(file), config)?;

    let mut writer = BufWriter::new(File::create(output)?);
    io::copy(&mut data.as_slice(), &mut writer)?;
    writer.flush()?;

    let report = Report {
        input_bytes,
        output_bytes: data.len() as u64,
        symbols,
    };
    info!(
        input = %input.display(),
        output = %output.display(),
        output_bytes = report.output_bytes,
        "decompressed"
    );
    Ok(report)
}
