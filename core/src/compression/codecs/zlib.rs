//! codecs/zlib.rs
//! DEFLATE (zlib envelope) and GZIP through flate2's low-level stream API.
//!
//! Output is chunked through a fixed scratch window: every time the window
//! fills it becomes an output segment and a fresh window takes its place.
//! The last window is trimmed to the bytes actually produced.

use std::sync::Arc;
use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::buffer::{ScratchWindow, SegmentAllocator, SegmentedBuffer};
use crate::compression::types::{CompressionError, Compressor, Decompressor};
use crate::constants::{MAX_DEFLATE_LEVEL, MAX_WINDOW_SIZE, ZLIB_WINDOW_BITS};

/// Envelope around the DEFLATE payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ZlibFormat {
    /// RFC 1950 zlib stream.
    Zlib,
    /// RFC 1952 gzip member.
    Gzip,
}

impl ZlibFormat {
    pub fn codec_name(self) -> &'static str {
        match self {
            ZlibFormat::Zlib => "deflate",
            ZlibFormat::Gzip => "gzip",
        }
    }
}

enum FlateStream {
    Deflate(Compress),
    Inflate(Decompress),
}

impl FlateStream {
    fn deflate(format: ZlibFormat, level: Compression) -> Self {
        let stream = match format {
            ZlibFormat::Zlib => Compress::new(level, true),
            ZlibFormat::Gzip => Compress::new_gzip(level, ZLIB_WINDOW_BITS),
        };
        FlateStream::Deflate(stream)
    }

    fn inflate(format: ZlibFormat) -> Self {
        let stream = match format {
            ZlibFormat::Zlib => Decompress::new(true),
            ZlibFormat::Gzip => Decompress::new_gzip(ZLIB_WINDOW_BITS),
        };
        FlateStream::Inflate(stream)
    }

    /// One flate step. `BufError` comes back as `Ok` and is not fatal.
    fn run(&mut self, input: &[u8], output: &mut [u8], finish: bool) -> Result<Status, String> {
        match self {
            FlateStream::Deflate(c) => {
                let flush = if finish { FlushCompress::Finish } else { FlushCompress::None };
                c.compress(input, output, flush).map_err(|e| e.to_string())
            }
            FlateStream::Inflate(d) => {
                let flush = if finish { FlushDecompress::Finish } else { FlushDecompress::None };
                d.decompress(input, output, flush).map_err(|e| e.to_string())
            }
        }
    }

    fn totals(&self) -> (u64, u64) {
        match self {
            FlateStream::Deflate(c) => (c.total_in(), c.total_out()),
            FlateStream::Inflate(d) => (d.total_in(), d.total_out()),
        }
    }
}

/// Drive `stream` over every input segment, appending windows to `output`.
///
/// The last segment is fed with a finish flush; all earlier ones with no
/// flush. A segment that is not fully consumed once the backend stops
/// filling the window is an internal backend error.
fn run_stream(
    stream: &mut FlateStream,
    codec: &'static str,
    input: &SegmentedBuffer,
    output: &mut SegmentedBuffer,
    allocator: &dyn SegmentAllocator,
    window_size: usize,
    limit: Option<usize>,
) -> Result<(), CompressionError> {
    let mut window = ScratchWindow::new(allocator, window_size);
    let mut emitted = 0usize;
    // Do not fail on an empty input.
    let mut status = Status::StreamEnd;
    let count = input.segment_count();

    for (index, segment) in input.segments().enumerate() {
        let finish = index + 1 == count;
        let mut consumed = 0usize;
        loop {
            if window.is_full() {
                emitted += window.capacity();
                check_limit(limit, emitted)?;
                output.append(window.rotate());
            }
            let (in_before, out_before) = stream.totals();
            status = stream
                .run(&segment[consumed..], window.spare_mut(), finish)
                .map_err(|msg| CompressionError::stream(codec, msg))?;
            let (in_after, out_after) = stream.totals();
            consumed += (in_after - in_before) as usize;
            window.advance((out_after - out_before) as usize);
            if !window.is_full() {
                break;
            }
        }
        if consumed < segment.len() {
            return Err(CompressionError::stream(
                codec,
                format!("not all input consumed ({} of {} bytes left)", segment.len() - consumed, segment.len()),
            ));
        }
    }

    if status != Status::StreamEnd {
        return Err(match stream {
            FlateStream::Inflate(_) => CompressionError::TruncatedFrame(format!(
                "{} stream ended before its end-of-stream marker",
                codec
            )),
            FlateStream::Deflate(_) => CompressionError::stream(codec, "stream did not finish"),
        });
    }

    if let Some(last) = window.finish() {
        emitted += last.len();
        check_limit(limit, emitted)?;
        output.append(last);
    }
    Ok(())
}

fn check_limit(limit: Option<usize>, emitted: usize) -> Result<(), CompressionError> {
    match limit {
        Some(limit) if emitted > limit => Err(CompressionError::DecompressedSizeExceeded { limit }),
        _ => Ok(()),
    }
}

fn check_window(format: ZlibFormat, window_size: usize) -> Result<(), CompressionError> {
    if window_size == 0 || window_size > MAX_WINDOW_SIZE {
        return Err(CompressionError::init(
            format.codec_name(),
            format!("scratch window size {} outside 1..={}", window_size, MAX_WINDOW_SIZE),
        ));
    }
    Ok(())
}

pub struct ZlibCompressor {
    format: ZlibFormat,
    stream: FlateStream,
    window_size: usize,
    allocator: Arc<dyn SegmentAllocator>,
}

impl ZlibCompressor {
    pub fn new(
        format: ZlibFormat,
        level: u32,
        window_size: usize,
        allocator: Arc<dyn SegmentAllocator>,
    ) -> Result<Box<dyn Compressor + Send>, CompressionError> {
        if level > MAX_DEFLATE_LEVEL {
            return Err(CompressionError::init(
                format.codec_name(),
                format!("level {} outside 0..={}", level, MAX_DEFLATE_LEVEL),
            ));
        }
        check_window(format, window_size)?;
        Ok(Box::new(Self {
            format,
            stream: FlateStream::deflate(format, Compression::new(level)),
            window_size,
            allocator,
        }))
    }
}

impl Compressor for ZlibCompressor {
    fn compress(self: Box<Self>, input: &SegmentedBuffer, output: &mut SegmentedBuffer)
        -> Result<(), CompressionError>
    {
        let ZlibCompressor { format, mut stream, window_size, allocator } = *self;
        run_stream(&mut stream, format.codec_name(), input, output, allocator.as_ref(), window_size, None)
    }
}

pub struct ZlibDecompressor {
    format: ZlibFormat,
    stream: FlateStream,
    window_size: usize,
    limit: Option<usize>,
    allocator: Arc<dyn SegmentAllocator>,
}

impl ZlibDecompressor {
    pub fn new(
        format: ZlibFormat,
        window_size: usize,
        limit: Option<usize>,
        allocator: Arc<dyn SegmentAllocator>,
    ) -> Result<Box<dyn Decompressor + Send>, CompressionError> {
        check_window(format, window_size)?;
        Ok(Box::new(Self {
            format,
            stream: FlateStream::inflate(format),
            window_size,
            limit,
            allocator,
        }))
    }
}

impl Decompressor for ZlibDecompressor {
    fn decompress(self: Box<Self>, input: &SegmentedBuffer, output: &mut SegmentedBuffer)
        -> Result<(), CompressionError>
    {
        let ZlibDecompressor { format, mut stream, window_size, limit, allocator } = *self;
        run_stream(&mut stream, format.codec_name(), input, output, allocator.as_ref(), window_size, limit)
    }
}
