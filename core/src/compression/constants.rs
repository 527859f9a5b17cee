/// Stable algorithm selector values (u8) shared with callers and peers.
pub mod algorithm_ids {
    pub const NONE: u8    = 0x00;
    pub const DEFLATE: u8 = 0x01;
    pub const GZIP: u8    = 0x02;
    pub const LZ4: u8     = 0x03;
}

/// Wire names used during encoding negotiation.
pub mod algorithm_names {
    pub const NONE: &str    = "identity";
    pub const DEFLATE: &str = "deflate";
    pub const GZIP: &str    = "gzip";
    pub const LZ4: &str     = "lz4";
}
