//! Writing telegrams to the vehicle bus
//!
//! IBIS is a one way, unacknowledged serial line. A [`TelegramSender`] encodes a telegram and
//! hands the sealed bytes to a [`ByteSink`], nothing is retried and nothing is read back.
//!
//! With the `serial` feature [`open`] configures a serial port the way the bus expects it
//! (1200 baud, 7 data bits, even parity, 2 stop bits).
#[cfg(feature = "std")]
use core::fmt;
use heapless::Vec;

use crate::telegram::{self, frame::SealedTelegram, Error, Telegram};

pub const BAUD_RATE: u32 = 1200;

/// Destination of sealed telegrams
///
/// Implementations must transmit the bytes in order and unmodified. The checksum byte can take
/// any value, including ones outside of printable ASCII.
pub trait ByteSink {
    type Error;

    /// Write all of `bytes`, blocking until done or failed
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Collects telegrams in memory, fails once the capacity is exhausted
impl<const N: usize> ByteSink for Vec<u8, N> {
    type Error = ();

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), ()> {
        self.extend_from_slice(bytes)
    }
}

/// Adapter for anything implementing [`std::io::Write`]
#[cfg(feature = "std")]
pub struct IoSink<W: std::io::Write>(pub W);

#[cfg(feature = "std")]
impl<W: std::io::Write> ByteSink for IoSink<W> {
    type Error = std::io::Error;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), std::io::Error> {
        self.0.write_all(bytes)
    }

    fn flush(&mut self) -> Result<(), std::io::Error> {
        self.0.flush()
    }
}

#[derive(PartialEq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum SendError<E> {
    /// Telegram could not be built, nothing was written
    Encode(Error),
    /// Sink failed, the display may have received a partial telegram
    Transmit(E),
}

impl<E> From<Error> for SendError<E> {
    fn from(e: Error) -> SendError<E> {
        SendError::Encode(e)
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Display> fmt::Display for SendError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SendError::Encode(e) => write!(f, "cannot encode telegram: {}", e),
            SendError::Transmit(e) => write!(f, "transmission failed: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug + fmt::Display> std::error::Error for SendError<E> {}

/// Encodes telegrams and writes them to `S`
pub struct TelegramSender<S: ByteSink> {
    sink: S,
}

impl<S: ByteSink> TelegramSender<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn send(&mut self, telegram: &Telegram) -> Result<(), SendError<S::Error>> {
        let sealed = telegram.encode()?;
        self.send_sealed(&sealed)
    }

    /// Sends a telegram type without a [`Telegram`] variant, see [`telegram::encode_raw`]
    pub fn send_raw(&mut self, body: &str) -> Result<(), SendError<S::Error>> {
        let sealed = telegram::encode_raw(body)?;
        self.send_sealed(&sealed)
    }

    pub fn send_sealed(&mut self, sealed: &SealedTelegram) -> Result<(), SendError<S::Error>> {
        #[cfg(feature = "defmt-impl")]
        defmt::trace!("sending telegram {=[u8]:02x}", sealed.as_bytes());

        let result = self
            .sink
            .write_all(sealed.as_bytes())
            .and_then(|_| self.sink.flush());
        if result.is_err() {
            #[cfg(feature = "defmt-impl")]
            defmt::warn!("telegram transmission failed");
        }
        result.map_err(SendError::Transmit)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

#[cfg(feature = "serial")]
pub use serial::{open, open_with_timeout, SerialSink, DATA_BITS, PARITY, STOP_BITS};

#[cfg(feature = "serial")]
mod serial {
    use std::time::Duration;

    use serialport::{DataBits, Parity, SerialPort, StopBits};

    use super::{IoSink, TelegramSender, BAUD_RATE};

    pub const DATA_BITS: DataBits = DataBits::Seven;
    pub const PARITY: Parity = Parity::Even;
    pub const STOP_BITS: StopBits = StopBits::Two;

    const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

    pub type SerialSink = IoSink<Box<dyn SerialPort>>;

    /// Opens `port_name` configured for the IBIS bus
    pub fn open(port_name: &str) -> serialport::Result<TelegramSender<SerialSink>> {
        open_with_timeout(port_name, DEFAULT_TIMEOUT)
    }

    /// `timeout` bounds each write, at 1200 baud a full telegram takes a little over two seconds
    pub fn open_with_timeout(
        port_name: &str,
        timeout: Duration,
    ) -> serialport::Result<TelegramSender<SerialSink>> {
        let port = serialport::new(port_name, BAUD_RATE)
            .data_bits(DATA_BITS)
            .parity(PARITY)
            .stop_bits(STOP_BITS)
            .timeout(timeout)
            .open()?;
        Ok(TelegramSender::new(IoSink(port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl ByteSink for FailingSink {
        type Error = &'static str;

        fn write_all(&mut self, _bytes: &[u8]) -> Result<(), Self::Error> {
            Err("line disconnected")
        }
    }

    #[test]
    fn test_send_writes_sealed_telegram() {
        let mut sender = TelegramSender::new(Vec::<u8, 64>::new());
        sender.send(&Telegram::run_number("12").unwrap()).unwrap();
        let checksum = 0x7f ^ b'v' ^ b'1' ^ b'2' ^ 0x0d;
        assert_eq!(&sender.sink()[..], &[b'v', b'1', b'2', 0x0d, checksum]);
    }

    #[test]
    fn test_send_multiple_in_order() {
        let mut sender = TelegramSender::new(Vec::<u8, 128>::new());
        let first = Telegram::free_text("Zoo").unwrap();
        let second = Telegram::run_number("7").unwrap();
        sender.send(&first).unwrap();
        sender.send(&second).unwrap();

        let first = first.encode().unwrap();
        let second = second.encode().unwrap();
        let written = sender.into_inner();
        assert_eq!(&written[..first.len()], first.as_bytes());
        assert_eq!(&written[first.len()..], second.as_bytes());
    }

    #[test]
    fn test_send_raw_normalizes() {
        let mut sender = TelegramSender::new(Vec::<u8, 16>::new());
        sender.send_raw("l0ß").unwrap();
        assert_eq!(&sender.sink()[..3], b"l0~");
        assert_eq!(sender.sink()[3], 0x0d);
    }

    #[test]
    fn test_transmit_error() {
        let mut sender = TelegramSender::new(FailingSink);
        assert_eq!(
            sender.send(&Telegram::run_number("1").unwrap()),
            Err(SendError::Transmit("line disconnected"))
        );
    }

    #[test]
    fn test_encode_error_writes_nothing() {
        let mut sender = TelegramSender::new(Vec::<u8, 16>::new());
        assert_eq!(
            sender.send_raw("naïve"),
            Err(SendError::Encode(Error::UnsupportedCharacter('ï')))
        );
        assert!(sender.sink().is_empty());
    }

    #[test]
    fn test_sink_capacity_exhausted() {
        let mut sender = TelegramSender::new(Vec::<u8, 8>::new());
        assert_eq!(
            sender.send(&Telegram::free_text("Hauptbahnhof").unwrap()),
            Err(SendError::Transmit(()))
        );
    }

    #[test]
    fn test_io_sink_checksum_outside_ascii() {
        // bytes >= 0x80 never occur in real text, make sure they pass the sink unchanged anyway
        let sealed = telegram::frame::seal(&[0x80]).unwrap();
        assert_eq!(sealed.checksum(), 0x7f ^ 0x80 ^ 0x0d);
        let mut sender = TelegramSender::new(IoSink(std::vec::Vec::new()));
        sender.send_sealed(&sealed).unwrap();
        assert_eq!(sender.into_inner().0, vec![0x80, 0x0d, 0xf2]);
    }
}
