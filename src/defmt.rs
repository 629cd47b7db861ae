use defmt::Formatter;

use crate::charset::NormalizeError;
use crate::telegram::{frame::SealedTelegram, Error, ParseTelegramError, Telegram};
use crate::transport::SendError;

impl defmt::Format for Error {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            Error::TextTooLong { length, max } => {
                defmt::write!(fmt, "TextTooLong({=usize} > {=usize})", *length, *max)
            }
            Error::UnsupportedCharacter(c) => {
                defmt::write!(fmt, "UnsupportedCharacter({=u32:#x})", *c as u32)
            }
            Error::BufferFull => defmt::write!(fmt, "BufferFull"),
        }
    }
}

impl defmt::Format for NormalizeError {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            NormalizeError::UnsupportedCharacter(c) => {
                defmt::write!(fmt, "UnsupportedCharacter({=u32:#x})", *c as u32)
            }
            NormalizeError::BufferFull => defmt::write!(fmt, "BufferFull"),
        }
    }
}

impl defmt::Format for ParseTelegramError {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            ParseTelegramError::MissingSeparator => defmt::write!(fmt, "MissingSeparator"),
            ParseTelegramError::InvalidTelegram => defmt::write!(fmt, "InvalidTelegram"),
            ParseTelegramError::InvalidAddress => defmt::write!(fmt, "InvalidAddress"),
            ParseTelegramError::Encoding(e) => defmt::write!(fmt, "Encoding({})", e),
        }
    }
}

impl<E: defmt::Format> defmt::Format for SendError<E> {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            SendError::Encode(e) => defmt::write!(fmt, "Encode({})", e),
            SendError::Transmit(e) => defmt::write!(fmt, "Transmit({})", e),
        }
    }
}

// text is IBIS charset, which is plain ASCII apart from the umlaut substitutes
impl defmt::Format for Telegram {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            Telegram::FreeText { text } => defmt::write!(fmt, "FreeText({=[u8]:a})", &text[..]),
            Telegram::CompactText { text } => {
                defmt::write!(fmt, "CompactText({=[u8]:a})", &text[..])
            }
            Telegram::RunNumber { text } => defmt::write!(fmt, "RunNumber({=[u8]:a})", &text[..]),
            Telegram::TwoLineDisplay {
                address,
                line1,
                line2,
            } => defmt::write!(
                fmt,
                "TwoLineDisplay {{ address: {=u8:#x}, line1: {=[u8]:a}, line2: {=[u8]:a} }}",
                *address,
                &line1[..],
                &line2[..]
            ),
        }
    }
}

impl defmt::Format for SealedTelegram {
    fn format(&self, fmt: Formatter<'_>) {
        defmt::write!(
            fmt,
            "SealedTelegram {{ body: {=[u8]:a}, checksum: {=u8:#x} }}",
            self.body(),
            self.checksum()
        )
    }
}
