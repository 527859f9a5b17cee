#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::sync::Arc;

    use bytes::Bytes;
    use rand::{rngs::StdRng, RngCore, SeedableRng};

    use message_compress::buffer::{HeapAllocator, SegmentAllocator, SegmentedBuffer};
    use message_compress::compression::codecs::{ZlibCompressor, ZlibDecompressor, ZlibFormat};
    use message_compress::compression::{Compressor, Decompressor, ErrorKind};

    const WINDOW: usize = 1024;

    fn alloc() -> Arc<dyn SegmentAllocator> {
        Arc::new(HeapAllocator)
    }

    fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut data = vec![0u8; len];
        rng.fill_bytes(&mut data);
        data
    }

    fn text(len: usize) -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog. "
            .iter()
            .copied()
            .cycle()
            .take(len)
            .collect()
    }

    fn compress(format: ZlibFormat, input: &SegmentedBuffer) -> SegmentedBuffer {
        let mut out = SegmentedBuffer::new();
        ZlibCompressor::new(format, 6, WINDOW, alloc())
            .unwrap()
            .compress(input, &mut out)
            .unwrap();
        out
    }

    fn decompress(format: ZlibFormat, input: &SegmentedBuffer, limit: Option<usize>)
        -> Result<SegmentedBuffer, ErrorKind>
    {
        let mut out = SegmentedBuffer::new();
        ZlibDecompressor::new(format, WINDOW, limit, alloc())
            .map_err(|e| e.kind())?
            .decompress(input, &mut out)
            .map_err(|e| e.kind())?;
        Ok(out)
    }

    #[test]
    fn test_deflate_round_trip_multi_segment() {
        let data = text(10_000);
        let input = SegmentedBuffer::chunked(&data, 333);
        let compressed = compress(ZlibFormat::Zlib, &input);
        assert!(compressed.total_length() < data.len());

        let restored = decompress(ZlibFormat::Zlib, &compressed, None).unwrap();
        assert_eq!(restored.to_vec(), data);
    }

    #[test]
    fn test_gzip_round_trip() {
        let data = text(4096);
        let compressed = compress(ZlibFormat::Gzip, &SegmentedBuffer::from(data.clone()));
        let restored = decompress(ZlibFormat::Gzip, &compressed, None).unwrap();
        assert_eq!(restored.to_vec(), data);
    }

    #[test]
    fn test_envelope_headers() {
        let input = SegmentedBuffer::from(text(512));
        let zlib = compress(ZlibFormat::Zlib, &input).to_vec();
        assert_eq!(zlib[0], 0x78);
        assert_eq!(((zlib[0] as u16) << 8 | zlib[1] as u16) % 31, 0);

        let gzip = compress(ZlibFormat::Gzip, &input).to_vec();
        assert_eq!(&gzip[..2], &[0x1f, 0x8b]);
        assert_eq!(gzip[2], 8);
    }

    #[test]
    fn test_output_is_cut_into_full_windows() {
        let data = text(10_000);
        let compressed = compress(ZlibFormat::Zlib, &SegmentedBuffer::from(data.clone()));
        let restored = decompress(ZlibFormat::Zlib, &compressed, None).unwrap();

        assert_eq!(restored.segment_count(), 10);
        let lens: Vec<usize> = restored.segments().map(|s| s.len()).collect();
        assert!(lens[..9].iter().all(|&l| l == WINDOW));
        assert_eq!(lens[9], 10_000 - 9 * WINDOW);
    }

    #[test]
    fn test_incompressible_output_segments() {
        let data = random_bytes(5000, 7);
        let compressed = compress(ZlibFormat::Gzip, &SegmentedBuffer::from(data.clone()));
        assert!(compressed.total_length() > data.len());

        let lens: Vec<usize> = compressed.segments().map(|s| s.len()).collect();
        let (last, full) = lens.split_last().unwrap();
        assert!(full.iter().all(|&l| l == WINDOW));
        assert!(*last > 0 && *last <= WINDOW);
    }

    #[test]
    fn test_interop_with_flate2_streams() {
        let data = text(3000);

        // ours -> flate2
        let ours = compress(ZlibFormat::Zlib, &SegmentedBuffer::from(data.clone())).to_vec();
        let mut decoded = Vec::new();
        flate2::read::ZlibDecoder::new(&ours[..]).read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, data);

        // flate2 -> ours
        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::best());
        enc.write_all(&data).unwrap();
        let theirs = enc.finish().unwrap();
        let restored = decompress(ZlibFormat::Gzip, &SegmentedBuffer::chunked(&theirs, 17), None).unwrap();
        assert_eq!(restored.to_vec(), data);
    }

    #[test]
    fn test_truncated_stream_is_truncated_frame() {
        let data = text(2000);
        let compressed = compress(ZlibFormat::Zlib, &SegmentedBuffer::from(data)).to_vec();
        let cut = SegmentedBuffer::from(compressed[..compressed.len() - 10].to_vec());
        assert_eq!(decompress(ZlibFormat::Zlib, &cut, None).unwrap_err(), ErrorKind::TruncatedFrame);
    }

    #[test]
    fn test_trailing_garbage_is_stream_error() {
        let mut compressed = compress(ZlibFormat::Gzip, &SegmentedBuffer::from(text(600)));
        compressed.append(Bytes::from_static(b"garbage"));
        assert_eq!(decompress(ZlibFormat::Gzip, &compressed, None).unwrap_err(), ErrorKind::CodecStream);
    }

    #[test]
    fn test_corrupt_header_is_stream_error() {
        let input = SegmentedBuffer::from(random_bytes(64, 3));
        let mut bogus = input.to_vec();
        bogus[0] = 0x00;
        let err = decompress(ZlibFormat::Zlib, &SegmentedBuffer::from(bogus), None).unwrap_err();
        assert_eq!(err, ErrorKind::CodecStream);
    }

    #[test]
    fn test_decompressed_size_limit() {
        let data = text(10_000);
        let compressed = compress(ZlibFormat::Zlib, &SegmentedBuffer::from(data));
        assert_eq!(
            decompress(ZlibFormat::Zlib, &compressed, Some(4096)).unwrap_err(),
            ErrorKind::DecompressedSizeExceeded
        );
        assert!(decompress(ZlibFormat::Zlib, &compressed, Some(10_000)).is_ok());
    }

    #[test]
    fn test_invalid_level_and_window_rejected() {
        let err = ZlibCompressor::new(ZlibFormat::Zlib, 10, WINDOW, alloc()).err().map(|e| e.kind());
        assert_eq!(err, Some(ErrorKind::CodecInit));

        let err = ZlibDecompressor::new(ZlibFormat::Gzip, 0, None, alloc()).err().map(|e| e.kind());
        assert_eq!(err, Some(ErrorKind::CodecInit));
    }

    #[test]
    fn test_oversized_window_rejected() {
        let huge = message_compress::constants::MAX_WINDOW_SIZE + 1;
        let err = ZlibCompressor::new(ZlibFormat::Zlib, 6, huge, alloc()).err().map(|e| e.kind());
        assert_eq!(err, Some(ErrorKind::CodecInit));
        let err = ZlibDecompressor::new(ZlibFormat::Zlib, usize::MAX, None, alloc()).err().map(|e| e.kind());
        assert_eq!(err, Some(ErrorKind::CodecInit));
    }
}
