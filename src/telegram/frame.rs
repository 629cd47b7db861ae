//! Telegram trailer: carriage return followed by an XOR checksum
//!
//! | name     | length in bytes | description                                          |
//! |----------|-----------------|------------------------------------------------------|
//! | body     | 0 - 262         | marker, header fields, payload                       |
//! | cr       | 1               | `0x0d`                                               |
//! | checksum | 1               | `0x7f` XOR every byte of body and cr                 |
use core::ops::Deref;
#[cfg(feature = "std")]
use core::fmt;
use heapless::Vec;

use super::{Error, MAX_TELEGRAM_LENGTH};

pub const TELEGRAM_END: u8 = 0x0d;
pub const CHECKSUM_SEED: u8 = 0x7f;
pub const TRAILER_LENGTH: usize = 2;

pub type TelegramVec = Vec<u8, MAX_TELEGRAM_LENGTH>;

/// XOR checksum of `bytes`, seeded with [`CHECKSUM_SEED`]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(CHECKSUM_SEED, |acc, b| acc ^ b)
}

/// Appends the trailer to `body` and freezes it.
///
/// The checksum covers the carriage return as well.
pub fn seal(body: &[u8]) -> Result<SealedTelegram, Error> {
    if body.len() + TRAILER_LENGTH > MAX_TELEGRAM_LENGTH {
        return Err(Error::BufferFull);
    }
    let mut result = TelegramVec::new();
    result
        .extend_from_slice(body)
        .map_err(|_| Error::BufferFull)?;
    result.push(TELEGRAM_END).map_err(|_| Error::BufferFull)?;
    let sum = checksum(&result);
    result.push(sum).map_err(|_| Error::BufferFull)?;
    Ok(SealedTelegram(result))
}

/// Complete telegram as it goes over the wire.
///
/// Can only be created by [`seal`], so the second to last byte is always [`TELEGRAM_END`] and the
/// last byte is the checksum.
#[derive(Clone, PartialEq, Eq)]
pub struct SealedTelegram(TelegramVec);

#[allow(clippy::len_without_is_empty)]
impl SealedTelegram {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Everything before the trailer
    pub fn body(&self) -> &[u8] {
        &self.0[..self.0.len() - TRAILER_LENGTH]
    }

    pub fn checksum(&self) -> u8 {
        self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_inner(self) -> TelegramVec {
        self.0
    }
}

impl Deref for SealedTelegram {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for SealedTelegram {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "std")]
impl fmt::Debug for SealedTelegram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "SealedTelegram {{ body: {:?}, checksum: {:02x?} }}",
            String::from_utf8_lossy(self.body()),
            self.checksum()
        )
    }
}
