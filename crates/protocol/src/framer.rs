//! Byte-to-frame accumulation.
//!
//! [`Framer`] owns the command buffer: bytes go in one at a time as the
//! command task dequeues them, and the framer reports when a complete frame
//! is ready to parse. Frame boundaries are dispatch-to-dispatch — the caller
//! resets the buffer after every dispatch, and the framer resets itself on
//! overflow so a runaway input stream can never wedge the task.

/// Capacity of the accumulating command buffer.
pub const COMMAND_BUFFER_CAPACITY: usize = 256;

/// Lead byte of the escape-toggle dialect.
const ESCAPE: u8 = b'^';

/// Which framing rule a board's command stream uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dialect {
    /// Structured keyword commands, one per CR- or LF-terminated line.
    Keyword,
    /// `^` followed by a single command letter; everything else is echo.
    EscapeToggle,
}

/// Outcome of feeding one byte to the framer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramerEvent {
    /// Byte absorbed; no frame yet.
    Pending,
    /// A complete keyword-dialect line is available via [`Framer::line`].
    /// Call [`Framer::reset`] after parsing it.
    Frame,
    /// Escape-toggle dialect: the letter following `^`.
    Escape(u8),
    /// Escape-toggle dialect: an ordinary byte, candidate for echo.
    Echo(u8),
    /// The buffer filled without a terminator and has been reset.
    Overflow,
}

/// Accumulating command buffer plus completion detection.
pub struct Framer {
    dialect: Dialect,
    buf: heapless::Vec<u8, COMMAND_BUFFER_CAPACITY>,
    armed_escape: bool,
    overflows: u32,
}

impl Framer {
    /// Empty framer for `dialect`.
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            buf: heapless::Vec::new(),
            armed_escape: false,
            overflows: 0,
        }
    }

    /// Feed one received byte.
    pub fn push(&mut self, byte: u8) -> FramerEvent {
        match self.dialect {
            Dialect::Keyword => self.push_keyword(byte),
            Dialect::EscapeToggle => self.push_escape(byte),
        }
    }

    fn push_keyword(&mut self, byte: u8) -> FramerEvent {
        if byte == b'\r' || byte == b'\n' {
            // Bare terminators (and the LF of a CRLF pair) are not frames.
            if self.buf.is_empty() {
                return FramerEvent::Pending;
            }
            return FramerEvent::Frame;
        }
        if self.buf.push(byte).is_err() {
            self.buf.clear();
            self.overflows = self.overflows.saturating_add(1);
            return FramerEvent::Overflow;
        }
        FramerEvent::Pending
    }

    fn push_escape(&mut self, byte: u8) -> FramerEvent {
        if self.armed_escape {
            self.armed_escape = false;
            return FramerEvent::Escape(byte);
        }
        if byte == ESCAPE {
            self.armed_escape = true;
            return FramerEvent::Pending;
        }
        FramerEvent::Echo(byte)
    }

    /// The accumulated frame. Valid after [`FramerEvent::Frame`] until
    /// [`Framer::reset`].
    #[must_use]
    pub fn line(&self) -> &[u8] {
        &self.buf
    }

    /// Discard the accumulated frame and any pending escape state.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.armed_escape = false;
    }

    /// How many times the buffer filled without a recognised terminator.
    #[must_use]
    pub fn overflows(&self) -> u32 {
        self.overflows
    }
}
