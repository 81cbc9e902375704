//! # vnc-session
//!
//! Interactive session bridge for a VNC remote desktop viewer.
//!
//! The wire protocol (handshake, encodings, framing) is an external
//! collaborator behind the [`protocol::ProtocolEngine`] trait; the
//! window layer sits behind [`platform::Platform`] and
//! [`present::PresentTarget`]. This crate supplies everything in
//! between:
//!
//! - **State**: [`session::SessionState`] — pointer mask, cursor
//!   position, capture flag, remote clipboard text
//! - **Scaling**: [`scale::scale_point`] — local surface → remote
//!   framebuffer coordinates
//! - **Pointer**: [`pointer::PointerTranslator`] — edge-corrected
//!   press/release and wheel pulses
//! - **Capture**: [`capture::CaptureController`] — hotkey-driven
//!   exclusive-input toggle with bidirectional clipboard hand-off
//! - **Presentation**: [`present::FramebufferPresenter`] — full
//!   surface repaint per inbound pixel update
//! - **Pump**: [`pump::MessagePump`] — timer-driven, bounded-wait
//!   poll/dispatch loop, fatal on protocol failure
//! - **Error**: [`error::SessionError`] — typed, `thiserror`-based
//!   error hierarchy

pub mod capture;
pub mod config;
pub mod error;
pub mod platform;
pub mod pointer;
pub mod present;
pub mod protocol;
pub mod pump;
pub mod scale;
pub mod session;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use capture::{CaptureAction, CaptureController, KEYSYM_PAUSE};
pub use config::{EncodingConfig, InputConfig, LoggingConfig, PumpConfig, SessionConfig};
pub use error::SessionError;
pub use platform::{Platform, PlatformEvent};
pub use pointer::PointerTranslator;
pub use present::{FramebufferPresenter, PresentTarget, Surface};
pub use protocol::{ButtonMask, Framebuffer, ProtocolEngine, ProtocolUpdate};
pub use pump::{MessagePump, Tick};
pub use scale::scale_point;
pub use session::{InputEvent, Session, SessionState};
