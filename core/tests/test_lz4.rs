#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::sync::Arc;

    use bytes::Bytes;
    use rand::{rngs::StdRng, RngCore, SeedableRng};

    use message_compress::buffer::{HeapAllocator, SegmentAllocator, SegmentedBuffer};
    use message_compress::compression::codecs::{BlockSizeId, FrameHeader, Lz4Compressor, Lz4Decompressor, FRAME_PREFERENCES};
    use message_compress::compression::{CompressionAlgorithm, CompressionEngine, Compressor, Decompressor, ErrorKind};
    use message_compress::constants::{lz4_block_sizes, LZ4_FRAME_MAGIC};

    fn alloc() -> Arc<dyn SegmentAllocator> {
        Arc::new(HeapAllocator)
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    fn compress(input: &SegmentedBuffer) -> SegmentedBuffer {
        let mut out = SegmentedBuffer::new();
        Lz4Compressor::new(0, alloc()).unwrap().compress(input, &mut out).unwrap();
        out
    }

    fn decompress_with(input: &SegmentedBuffer, threshold: usize, limit: Option<usize>)
        -> Result<SegmentedBuffer, ErrorKind>
    {
        let mut out = SegmentedBuffer::new();
        Lz4Decompressor::new(threshold, limit, alloc())
            .map_err(|e| e.kind())?
            .decompress(input, &mut out)
            .map_err(|e| e.kind())?;
        Ok(out)
    }

    fn decompress(input: &SegmentedBuffer) -> Result<SegmentedBuffer, ErrorKind> {
        decompress_with(input, 1024, None)
    }

    #[test]
    fn test_frame_starts_with_magic_and_preferences() {
        let out = compress(&SegmentedBuffer::from(pattern(4096)));
        let bytes = out.to_vec();
        assert_eq!(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), LZ4_FRAME_MAGIC);

        let header = FrameHeader::parse(out.cursor()).unwrap();
        assert_eq!(header.block_size, BlockSizeId::Max256KB);
        assert_eq!(header.block_size.bytes(), lz4_block_sizes::MAX_256KB);
        assert_eq!(header.linked_blocks, FRAME_PREFERENCES.linked_blocks);
        assert!(!header.content_checksum);
        assert!(!header.block_checksum);
    }

    #[test]
    fn test_header_is_its_own_segment() {
        let out = compress(&SegmentedBuffer::from(pattern(4096)));
        assert!(out.segment_count() >= 2);
        // magic + FLG + BD + HC
        assert_eq!(out.segments().next().map(|s| s.len()), Some(7));
    }

    #[test]
    fn test_repeating_megabyte_shrinks() {
        let data = pattern(1 << 20);
        let input = SegmentedBuffer::chunked(&data, 64 * 1024);
        let out = compress(&input);
        assert!(out.total_length() < data.len() / 10);

        let restored = decompress(&out).unwrap();
        assert_eq!(restored.to_vec(), data);
    }

    #[test]
    fn test_round_trip_random_small_segments() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut data = vec![0u8; 20_000];
        rng.fill_bytes(&mut data);
        let out = compress(&SegmentedBuffer::chunked(&data, 100));
        let restored = decompress(&SegmentedBuffer::chunked(&out.to_vec(), 13)).unwrap();
        assert_eq!(restored.to_vec(), data);
    }

    #[test]
    fn test_coalescing_threshold_controls_segments() {
        let data = pattern(1 << 20);
        let out = compress(&SegmentedBuffer::from(data.clone()));

        let batched = decompress_with(&out, 2 << 20, None).unwrap();
        assert_eq!(batched.segment_count(), 1);
        assert_eq!(batched.to_vec(), data);

        let per_step = decompress_with(&out, 0, None).unwrap();
        assert!(per_step.segment_count() >= 4);
        assert!(per_step.segments().all(|s| s.len() <= lz4_block_sizes::MAX_256KB));
        assert_eq!(per_step.to_vec(), data);
    }

    #[test]
    fn test_short_header_is_truncated() {
        let input = SegmentedBuffer::from_slices([&[0x04u8, 0x22, 0x4D][..]]);
        assert_eq!(decompress(&input).unwrap_err(), ErrorKind::TruncatedFrame);
    }

    #[test]
    fn test_bad_magic_is_stream_error() {
        let input = SegmentedBuffer::from(vec![0xFFu8; 32]);
        assert_eq!(decompress(&input).unwrap_err(), ErrorKind::CodecStream);
    }

    #[test]
    fn test_unknown_block_size_id_is_truncated() {
        // FLG version 01, BD block id 3
        let input = SegmentedBuffer::from(vec![0x04, 0x22, 0x4D, 0x18, 0x60, 0x30, 0x00]);
        assert_eq!(FrameHeader::parse(input.cursor()).unwrap_err().kind(), ErrorKind::TruncatedFrame);
    }

    #[test]
    fn test_missing_end_mark_is_truncated() {
        let bytes = compress(&SegmentedBuffer::from(pattern(10_000))).to_vec();
        let cut = SegmentedBuffer::from(bytes[..bytes.len() - 4].to_vec());
        assert_eq!(decompress(&cut).unwrap_err(), ErrorKind::TruncatedFrame);
    }

    #[test]
    fn test_trailing_data_is_truncated() {
        let mut out = compress(&SegmentedBuffer::from(pattern(1000)));
        out.append(Bytes::from_static(b"tail"));
        assert_eq!(decompress(&out).unwrap_err(), ErrorKind::TruncatedFrame);
    }

    #[test]
    fn test_empty_input_decodes_to_nothing() {
        let restored = decompress(&SegmentedBuffer::new()).unwrap();
        assert_eq!(restored.segment_count(), 0);
    }

    #[test]
    fn test_decompressed_size_limit() {
        let out = compress(&SegmentedBuffer::from(pattern(1 << 20)));
        assert_eq!(
            decompress_with(&out, 1024, Some(1000)).unwrap_err(),
            ErrorKind::DecompressedSizeExceeded
        );
    }

    #[test]
    fn test_interop_with_lz4_streams() {
        let data = pattern(300_000);

        let ours = compress(&SegmentedBuffer::from(data.clone())).to_vec();
        let mut decoded = Vec::new();
        lz4::Decoder::new(&ours[..]).unwrap().read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, data);

        // library defaults: 64 KiB independent blocks, content checksum on
        let mut enc = lz4::EncoderBuilder::new().build(Vec::new()).unwrap();
        enc.write_all(&data).unwrap();
        let (theirs, result) = enc.finish();
        result.unwrap();
        let header = FrameHeader::parse(SegmentedBuffer::from(theirs.clone()).cursor()).unwrap();
        assert_eq!(header.block_size, BlockSizeId::Max64KB);
        assert!(header.content_checksum);

        let restored = decompress(&SegmentedBuffer::chunked(&theirs, 4096)).unwrap();
        assert_eq!(restored.to_vec(), data);
    }

    #[test]
    fn test_level_out_of_range() {
        let err = Lz4Compressor::new(17, alloc()).err().map(|e| e.kind());
        assert_eq!(err, Some(ErrorKind::CodecInit));
    }

    #[test]
    fn test_engine_frames_carry_no_checksums() {
        let engine = CompressionEngine::default();
        let data = b"abcd".repeat(256 * 1024);
        let mut out = SegmentedBuffer::new();
        let res = engine.compress(CompressionAlgorithm::Lz4, &SegmentedBuffer::from(data), &mut out);
        assert!(res.is_compressed());

        // FLG: version 01, linked blocks, no block/content checksum, no content size
        let flg = out.to_vec()[4];
        assert_eq!(flg & 0x10, 0, "block checksum bit set in FLG 0x{:02x}", flg);
        assert_eq!(flg, 0x40);
        assert!(!FRAME_PREFERENCES.block_checksum);
    }

    #[test]
    fn test_coalesce_threshold_out_of_range() {
        let err = Lz4Decompressor::new(lz4_block_sizes::MAX_4MB + 1, None, alloc()).err().map(|e| e.kind());
        assert_eq!(err, Some(ErrorKind::CodecInit));
        assert!(Lz4Decompressor::new(lz4_block_sizes::MAX_4MB, None, alloc()).is_ok());
    }
}
