//! ByteSource trait - Reader input interface

use crate::ContractError;

/// Byte input trait
///
/// The Reader pulls chunks through this interface.
#[trait_variant::make(ByteSource: Send)]
pub trait LocalByteSource {
    /// Source name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Read up to `buf.len()` bytes into `buf`
    ///
    /// Returns the number of bytes read; `Ok(0)` means clean end-of-stream.
    ///
    /// # Errors
    /// Any failure other than end-of-stream. The Reader treats it as fatal.
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ContractError>;
}
