//! Seam to the external wire-protocol engine.
//!
//! Connection negotiation, pixel encodings, and message framing all live
//! in the protocol library; this crate only drives it. [`ProtocolEngine`]
//! covers the outbound operations the session invokes plus the two-step
//! poll/dispatch cycle the message pump runs. Inbound traffic surfaces as
//! [`ProtocolUpdate`] values returned from
//! [`dispatch`](ProtocolEngine::dispatch).
//!
//! ```text
//! Session ──send_pointer / send_key / send_cut_text──► engine ──► wire
//! Pump    ──poll(timeout)──► engine
//!         ──dispatch()─────► engine ──► [ProtocolUpdate, …]
//! ```

use std::time::Duration;

use crate::error::SessionError;

// ── ButtonMask ───────────────────────────────────────────────────

bitflags::bitflags! {
    /// RFB-style pointer mask: which buttons/wheel directions are
    /// currently "held" from the remote side's perspective.
    ///
    /// Wheel bits are only ever *pulsed* (set in one send, cleared in
    /// the immediately following send) because the protocol has no
    /// dedicated scroll message.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ButtonMask: u8 {
        const PRIMARY     = 0x01;
        const MIDDLE      = 0x02;
        const SECONDARY   = 0x04;
        const WHEEL_UP    = 0x08;
        const WHEEL_DOWN  = 0x10;
        const WHEEL_LEFT  = 0x20;
        const WHEEL_RIGHT = 0x40;

        /// All wheel direction bits.
        const WHEEL = Self::WHEEL_UP.bits()
            | Self::WHEEL_DOWN.bits()
            | Self::WHEEL_LEFT.bits()
            | Self::WHEEL_RIGHT.bits();
    }
}

impl ButtonMask {
    /// Map a raw platform button identifier to its mask bit.
    ///
    /// `1` = primary, `2` = middle, `3` = secondary. Anything else is
    /// unknown and yields `None` (the caller logs and drops the event).
    pub fn from_raw_button(button: u32) -> Option<Self> {
        match button {
            1 => Some(Self::PRIMARY),
            2 => Some(Self::MIDDLE),
            3 => Some(Self::SECONDARY),
            _ => None,
        }
    }
}

// ── ProtocolUpdate ───────────────────────────────────────────────

/// Inbound notifications produced by one dispatch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolUpdate {
    /// A region of the remote framebuffer changed.
    ///
    /// The presenter deliberately ignores the rectangle and repaints
    /// the full surface, so these fields are informational only.
    Framebuffer { x: u16, y: u16, width: u16, height: u16 },

    /// The remote side pushed clipboard text.
    ///
    /// Raw bytes, **not** NUL-terminated — the session copies exactly
    /// this many bytes into an owned value before the engine reuses
    /// the buffer.
    Clipboard(Vec<u8>),
}

// ── Framebuffer ──────────────────────────────────────────────────

/// Borrowed view of the engine-owned pixel buffer.
///
/// 8-bit RGBA channel order, row stride = `width * 4`. The reference
/// is only valid until control returns to the engine; the presenter
/// must not hold onto it past a single present call.
#[derive(Debug, Clone, Copy)]
pub struct Framebuffer<'a> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Raw RGBA8 pixel data, at least `width * height * 4` bytes.
    pub data: &'a [u8],
}

// ── ProtocolEngine ───────────────────────────────────────────────

/// The operations this crate requires from the external protocol
/// engine.
///
/// Implemented by the real wire-protocol connection in the embedding
/// application, and by scripted fakes in tests so the pump can be
/// driven deterministically without a network connection.
pub trait ProtocolEngine {
    /// Send a pointer update at remote coordinates with the given mask.
    fn send_pointer(&mut self, x: i32, y: i32, mask: ButtonMask) -> Result<(), SessionError>;

    /// Send a key-down or key-up event with the raw key symbol.
    fn send_key(&mut self, keysym: u32, down: bool) -> Result<(), SessionError>;

    /// Send local clipboard text to the remote side.
    fn send_cut_text(&mut self, text: &str) -> Result<(), SessionError>;

    /// Ask the remote side for an incremental framebuffer refresh.
    fn request_incremental_update(&mut self) -> Result<(), SessionError>;

    /// Bounded wait for inbound data.
    ///
    /// Returns `Ok(true)` when a dispatch is needed, `Ok(false)` when
    /// the timeout elapsed with nothing to read.
    fn poll(&mut self, timeout: Duration) -> Result<bool, SessionError>;

    /// Read and process pending messages, returning the resulting
    /// updates. A failure here is fatal to the session.
    fn dispatch(&mut self) -> Result<Vec<ProtocolUpdate>, SessionError>;

    /// Current contents of the remote framebuffer.
    fn framebuffer(&self) -> Framebuffer<'_>;
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_button_mapping() {
        assert_eq!(ButtonMask::from_raw_button(1), Some(ButtonMask::PRIMARY));
        assert_eq!(ButtonMask::from_raw_button(2), Some(ButtonMask::MIDDLE));
        assert_eq!(ButtonMask::from_raw_button(3), Some(ButtonMask::SECONDARY));
        assert_eq!(ButtonMask::from_raw_button(0), None);
        assert_eq!(ButtonMask::from_raw_button(8), None);
    }

    #[test]
    fn mask_bit_values_match_rfb() {
        assert_eq!(ButtonMask::PRIMARY.bits(), 1);
        assert_eq!(ButtonMask::MIDDLE.bits(), 2);
        assert_eq!(ButtonMask::SECONDARY.bits(), 4);
        assert_eq!(ButtonMask::WHEEL_UP.bits(), 8);
        assert_eq!(ButtonMask::WHEEL_DOWN.bits(), 16);
        assert_eq!(ButtonMask::WHEEL_LEFT.bits(), 32);
        assert_eq!(ButtonMask::WHEEL_RIGHT.bits(), 64);
    }

    #[test]
    fn wheel_composite_covers_all_directions() {
        assert!(ButtonMask::WHEEL.contains(ButtonMask::WHEEL_UP));
        assert!(ButtonMask::WHEEL.contains(ButtonMask::WHEEL_DOWN));
        assert!(ButtonMask::WHEEL.contains(ButtonMask::WHEEL_LEFT));
        assert!(ButtonMask::WHEEL.contains(ButtonMask::WHEEL_RIGHT));
        assert!(!ButtonMask::WHEEL.contains(ButtonMask::PRIMARY));
    }
}
