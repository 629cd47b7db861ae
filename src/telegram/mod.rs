//! IBIS telegram definitions
//!
//! Every telegram starts with a marker identifying its type. Text telegrams which are split into
//! blocks carry the number of blocks right after the marker, and their text is padded with spaces
//! up to the next block boundary.
//!
//! | telegram       | marker | header fields               | block length |
//! |----------------|--------|-----------------------------|--------------|
//! | DS003a         | `zA`   | block count                 | 16           |
//! | DS003c         | `zI`   | block count                 | 4            |
//! | DS009          | `v`    | -                           | -            |
//! | GSP            | `aA`   | display address, block count| 16           |
//!
//! Numeric header fields use [`vdv_hex`](crate::vdv_hex) encoding. Text is stored already
//! converted to the IBIS character set (see [`charset`](crate::charset)), so all lengths below
//! count displayed characters.
#[cfg(feature = "std")]
use core::fmt;
use core::str::FromStr;
use heapless::Vec;

use crate::charset::{self, NormalizeError};
use crate::vdv_hex::{self, MAX_VDV_HEX_LENGTH};

pub mod frame;

use frame::{SealedTelegram, TRAILER_LENGTH};

pub const FREE_TEXT_MARKER: &[u8] = b"zA";
pub const COMPACT_TEXT_MARKER: &[u8] = b"zI";
pub const RUN_NUMBER_MARKER: &[u8] = b"v";
pub const TWO_LINE_DISPLAY_MARKER: &[u8] = b"aA";

pub const BLOCK_LENGTH: usize = 16;
pub const COMPACT_BLOCK_LENGTH: usize = 4;
/// Upper bound of the block count field, limits the length of every blocked telegram
pub const MAX_BLOCK_COUNT: usize = 16;

pub const MAX_FREE_TEXT_LENGTH: usize = MAX_BLOCK_COUNT * BLOCK_LENGTH;
pub const MAX_COMPACT_TEXT_LENGTH: usize = MAX_BLOCK_COUNT * COMPACT_BLOCK_LENGTH;
pub const MAX_RUN_NUMBER_LENGTH: usize = 32;
/// Both lines including separators and the closing newlines
pub const MAX_DISPLAY_BODY_LENGTH: usize = MAX_BLOCK_COUNT * BLOCK_LENGTH;

const LINE_SEPARATOR: u8 = 0x0a;
const PADDING: u8 = b' ';

/// Computed as
///
/// ```ignore - not a test
/// 2 => longest marker
/// +
/// 2 + 2 => address and block count, both at most two vdv hex characters
/// +
/// max_payload_length => padded text
/// +
/// 2 => cr and checksum
/// ---
/// <result>
/// ```
const fn calculate_max_telegram_length(max_payload_length: usize) -> usize {
    2 + MAX_VDV_HEX_LENGTH + MAX_VDV_HEX_LENGTH + max_payload_length + TRAILER_LENGTH
}
pub const MAX_TELEGRAM_LENGTH: usize = calculate_max_telegram_length(MAX_DISPLAY_BODY_LENGTH);
pub const MAX_BODY_LENGTH: usize = MAX_TELEGRAM_LENGTH - TRAILER_LENGTH;
pub type BodyVec = Vec<u8, MAX_BODY_LENGTH>;

#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum Error {
    /// Text (counted in displayed characters) does not fit the telegram
    TextTooLong { length: usize, max: usize },
    /// Character has no representation in the IBIS character set
    UnsupportedCharacter(char),
    BufferFull,
}

impl From<NormalizeError> for Error {
    fn from(e: NormalizeError) -> Error {
        match e {
            NormalizeError::UnsupportedCharacter(c) => Error::UnsupportedCharacter(c),
            NormalizeError::BufferFull => Error::BufferFull,
        }
    }
}

#[cfg(feature = "std")]
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::TextTooLong { length, max } => write!(
                f,
                "text is {} characters long, telegram allows at most {}",
                length, max
            ),
            Error::UnsupportedCharacter(c) => {
                write!(f, "character {:?} cannot be displayed", c)
            }
            Error::BufferFull => write!(f, "telegram does not fit its buffer"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Telegrams this crate can send
///
/// Text fields hold bytes of the IBIS character set. Use the constructors
/// ([`Telegram::free_text`] etc.) to convert from regular strings.
#[derive(Clone, PartialEq)]
pub enum Telegram {
    /// DS003a, destination text for the exterior signs
    FreeText {
        text: Vec<u8, MAX_FREE_TEXT_LENGTH>,
    },
    /// DS003c, destination text in 4 character blocks
    CompactText {
        text: Vec<u8, MAX_COMPACT_TEXT_LENGTH>,
    },
    /// DS009, run number, sent without blocks or padding
    RunNumber {
        text: Vec<u8, MAX_RUN_NUMBER_LENGTH>,
    },
    /// GSP, two lines of static text for the display at `address`
    TwoLineDisplay {
        address: u8,
        line1: Vec<u8, MAX_DISPLAY_BODY_LENGTH>,
        line2: Vec<u8, MAX_DISPLAY_BODY_LENGTH>,
    },
}

#[cfg(feature = "std")]
impl fmt::Debug for Telegram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lossy = |bytes: &[u8]| String::from_utf8_lossy(bytes).into_owned();
        match self {
            Telegram::FreeText { text } => write!(f, "FreeText({:?})", lossy(&text[..])),
            Telegram::CompactText { text } => write!(f, "CompactText({:?})", lossy(&text[..])),
            Telegram::RunNumber { text } => write!(f, "RunNumber({:?})", lossy(&text[..])),
            Telegram::TwoLineDisplay {
                address,
                line1,
                line2,
            } => write!(
                f,
                "TwoLineDisplay {{ address: {:02x?}, line1: {:?}, line2: {:?} }}",
                address,
                lossy(&line1[..]),
                lossy(&line2[..])
            ),
        }
    }
}

impl Telegram {
    pub fn free_text(text: &str) -> Result<Self, Error> {
        Ok(Telegram::FreeText {
            text: normalize(text)?,
        })
    }

    pub fn compact_text(text: &str) -> Result<Self, Error> {
        Ok(Telegram::CompactText {
            text: normalize(text)?,
        })
    }

    pub fn run_number(text: &str) -> Result<Self, Error> {
        Ok(Telegram::RunNumber {
            text: normalize(text)?,
        })
    }

    /// `line2` may be empty, the display then shows a single line
    pub fn two_line_display(address: u8, line1: &str, line2: &str) -> Result<Self, Error> {
        let line1 = normalize::<MAX_DISPLAY_BODY_LENGTH>(line1)?;
        let line2 = normalize::<MAX_DISPLAY_BODY_LENGTH>(line2)?;
        let length = display_body_length(&line1, &line2);
        if length > MAX_DISPLAY_BODY_LENGTH {
            return Err(Error::TextTooLong {
                length,
                max: MAX_DISPLAY_BODY_LENGTH,
            });
        }
        Ok(Telegram::TwoLineDisplay {
            address,
            line1,
            line2,
        })
    }

    /// Telegram without the trailer
    pub fn body(&self) -> Result<BodyVec, Error> {
        let mut res = BodyVec::new();
        match self {
            Telegram::FreeText { text } => {
                extend(&mut res, FREE_TEXT_MARKER)?;
                write_blocks(&mut res, text, BLOCK_LENGTH)?;
            }
            Telegram::CompactText { text } => {
                extend(&mut res, COMPACT_TEXT_MARKER)?;
                write_blocks(&mut res, text, COMPACT_BLOCK_LENGTH)?;
            }
            Telegram::RunNumber { text } => {
                extend(&mut res, RUN_NUMBER_MARKER)?;
                extend(&mut res, text)?;
            }
            Telegram::TwoLineDisplay {
                address,
                line1,
                line2,
            } => {
                let too_long = || Error::TextTooLong {
                    length: display_body_length(line1, line2),
                    max: MAX_DISPLAY_BODY_LENGTH,
                };
                let mut lines = Vec::<u8, MAX_DISPLAY_BODY_LENGTH>::new();
                lines.extend_from_slice(line1).map_err(|_| too_long())?;
                if !line2.is_empty() {
                    lines.push(LINE_SEPARATOR).map_err(|_| too_long())?;
                }
                lines.extend_from_slice(line2).map_err(|_| too_long())?;
                lines
                    .extend_from_slice(&[LINE_SEPARATOR, LINE_SEPARATOR])
                    .map_err(|_| too_long())?;

                extend(&mut res, TWO_LINE_DISPLAY_MARKER)?;
                vdv_hex::encode_into(*address, &mut res).map_err(|_| Error::BufferFull)?;
                write_blocks(&mut res, &lines, BLOCK_LENGTH)?;
            }
        };
        Ok(res)
    }

    /// Builds the body and seals it, result can be written to the serial line as is
    pub fn encode(&self) -> Result<SealedTelegram, Error> {
        frame::seal(&self.body()?)
    }
}

/// Converts `body` to the IBIS character set and seals it without any further formatting.
///
/// Meant for telegram types which have no dedicated [`Telegram`] variant.
pub fn encode_raw(body: &str) -> Result<SealedTelegram, Error> {
    let body = normalize::<MAX_BODY_LENGTH>(body)?;
    frame::seal(&body)
}

/// Number of blocks of `block_length` needed to hold `length` characters
pub const fn block_count(length: usize, block_length: usize) -> usize {
    // (x+d-1) / d
    (length + block_length - 1) / block_length
}

/// Number of spaces which fill `length` characters up to the next block boundary
pub const fn padding_length(length: usize, block_length: usize) -> usize {
    match length % block_length {
        0 => 0,
        remainder => block_length - remainder,
    }
}

fn display_body_length(line1: &[u8], line2: &[u8]) -> usize {
    let separator = if line2.is_empty() { 0 } else { 1 };
    line1.len() + separator + line2.len() + 2
}

fn normalize<const N: usize>(text: &str) -> Result<Vec<u8, N>, Error> {
    let length = charset::normalized_len(text);
    if length > N {
        return Err(Error::TextTooLong { length, max: N });
    }
    let mut result = Vec::new();
    charset::normalize_into(text, &mut result)?;
    Ok(result)
}

fn extend(buf: &mut BodyVec, bytes: &[u8]) -> Result<(), Error> {
    buf.extend_from_slice(bytes).map_err(|_| Error::BufferFull)
}

/// Writes block count, `payload` and the padding up to the next block boundary
fn write_blocks(buf: &mut BodyVec, payload: &[u8], block_length: usize) -> Result<(), Error> {
    let count = block_count(payload.len(), block_length);
    let count = u8::try_from(count).map_err(|_| Error::TextTooLong {
        length: payload.len(),
        max: u8::MAX as usize * block_length,
    })?;
    vdv_hex::encode_into(count, buf).map_err(|_| Error::BufferFull)?;
    extend(buf, payload)?;
    for _ in 0..padding_length(payload.len(), block_length) {
        buf.push(PADDING).map_err(|_| Error::BufferFull)?;
    }
    Ok(())
}

#[derive(PartialEq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum ParseTelegramError {
    MissingSeparator,
    InvalidTelegram,
    InvalidAddress,
    Encoding(Error),
}

impl From<Error> for ParseTelegramError {
    fn from(e: Error) -> ParseTelegramError {
        ParseTelegramError::Encoding(e)
    }
}

/// Parses `<type>@<payload>` commands:
///
/// * `ds003a@<text>`
/// * `ds003c@<text>`
/// * `ds009@<run number>`
/// * `gsp@<address>|<line 1>|<line 2>`, line 2 is optional
impl FromStr for Telegram {
    type Err = ParseTelegramError;

    fn from_str(s: &str) -> Result<Self, ParseTelegramError> {
        let (telegram_type, payload) = s
            .split_once('@')
            .ok_or(ParseTelegramError::MissingSeparator)?;
        match telegram_type {
            "ds003a" => Ok(Telegram::free_text(payload)?),
            "ds003c" => Ok(Telegram::compact_text(payload)?),
            "ds009" => Ok(Telegram::run_number(payload)?),
            "gsp" => {
                let mut parts = payload.splitn(3, '|');
                let address = parts
                    .next()
                    .and_then(|a| u8::from_str(a.trim()).ok())
                    .ok_or(ParseTelegramError::InvalidAddress)?;
                let line1 = parts.next().unwrap_or("");
                let line2 = parts.next().unwrap_or("");
                Ok(Telegram::two_line_display(address, line1, line2)?)
            }
            _ => Err(ParseTelegramError::InvalidTelegram),
        }
    }
}
