//! buffer/mod.rs
//! Segmented buffers and the scoped helpers backends use to fill them.

pub mod alloc;
pub mod scratch;
pub mod segmented;
pub mod transaction;

pub use alloc::*;
pub use scratch::*;
pub use segmented::*;
pub use transaction::*;
