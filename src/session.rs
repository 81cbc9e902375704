//! Session state and the input/update orchestrator.
//!
//! [`Session`] owns the protocol engine, the platform seam, and the
//! present target for the lifetime of one connection. It routes local
//! input through the scaler, the pointer translator, and the capture
//! controller; it consumes inbound [`ProtocolUpdate`]s and
//! [`PlatformEvent`]s delivered by the message pump.
//!
//! # Forwarding asymmetry
//!
//! Gating by capture mode is intentionally uneven — a deliberate
//! asymmetry, not an oversight:
//!
//! - **clicks** are always forwarded, captured or not;
//! - **motion and scroll** are forwarded only while captured;
//! - **keys** (other than the bare hotkey) are always forwarded.
//!
//! # Concurrency
//!
//! Everything here runs cooperatively on the UI thread; there is no
//! parallel mutation and no locking. The two asynchronous inputs —
//! the shortcut-inhibition confirmation and the clipboard-read
//! completion — arrive as [`PlatformEvent`]s on an explicit channel,
//! so handlers never assume `capture_active` already reflects a
//! request they just issued.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::capture::{CaptureAction, CaptureController};
use crate::error::SessionError;
use crate::platform::{Platform, PlatformEvent};
use crate::pointer::PointerTranslator;
use crate::present::{FramebufferPresenter, PresentTarget};
use crate::protocol::{ButtonMask, ProtocolEngine, ProtocolUpdate};
use crate::scale::scale_point;

// ── InputEvent ───────────────────────────────────────────────────

/// A local input event from the windowing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to `(x, y)` in local surface coordinates.
    PointerMotion { x: f64, y: f64 },
    /// Raw button identifier pressed or released
    /// (`1` = primary, `2` = middle, `3` = secondary).
    Button { button: u32, pressed: bool },
    /// Scroll deltas; both axes may be non-zero.
    Scroll { dx: f64, dy: f64 },
    /// Key event with raw keysym and modifier state.
    Key {
        keysym: u32,
        modifiers: u32,
        pressed: bool,
    },
}

// ── SessionState ─────────────────────────────────────────────────

/// Shared mutable record for one session, mutated only from the UI
/// thread.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Pointer mask state machine (owns the button mask).
    pointer: PointerTranslator,
    /// Last scaled position sent to the remote side; `None` until the
    /// first motion event while captured.
    cursor_position: Option<(i32, i32)>,
    /// Confirmed shortcuts-inhibited status. Written only from the
    /// platform-event channel; eventually consistent with requests.
    capture_active: bool,
    /// Last text received from the remote side, replaced wholesale on
    /// each clipboard push.
    remote_clipboard: Option<String>,
}

impl SessionState {
    /// The mask of buttons currently held.
    pub fn button_mask(&self) -> ButtonMask {
        self.pointer.mask()
    }

    /// Last scaled cursor position, if any motion has occurred.
    pub fn cursor_position(&self) -> Option<(i32, i32)> {
        self.cursor_position
    }

    /// Confirmed capture-mode status.
    pub fn capture_active(&self) -> bool {
        self.capture_active
    }

    /// Last remote clipboard text, if any.
    pub fn remote_clipboard(&self) -> Option<&str> {
        self.remote_clipboard.as_deref()
    }
}

// ── Session ──────────────────────────────────────────────────────

/// The interactive session bridge for one connection.
pub struct Session<E, P, T>
where
    E: ProtocolEngine,
    P: Platform,
    T: PresentTarget,
{
    state: SessionState,
    engine: E,
    platform: P,
    target: T,
    presenter: FramebufferPresenter,
    controller: CaptureController,
    platform_rx: mpsc::UnboundedReceiver<PlatformEvent>,
    /// Local surface dimensions (W, H).
    surface_size: (u32, u32),
    /// Remote framebuffer dimensions (RW, RH).
    remote_size: (u32, u32),
}

impl<E, P, T> Session<E, P, T>
where
    E: ProtocolEngine,
    P: Platform,
    T: PresentTarget,
{
    /// Create a session over a live, handshaken protocol connection.
    ///
    /// The bootstrap layer supplies the initial remote framebuffer
    /// dimensions, the local surface dimensions, and the receiving
    /// half of the platform-event channel (the platform keeps the
    /// sending half).
    pub fn new(
        engine: E,
        platform: P,
        target: T,
        controller: CaptureController,
        platform_rx: mpsc::UnboundedReceiver<PlatformEvent>,
        surface_size: (u32, u32),
        remote_size: (u32, u32),
    ) -> Self {
        Self {
            state: SessionState::default(),
            engine,
            platform,
            target,
            presenter: FramebufferPresenter::new(),
            controller,
            platform_rx,
            surface_size,
            remote_size,
        }
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The protocol engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the engine, for the embedding layer (e.g.
    /// applying [`crate::config::EncodingConfig`] preferences before
    /// the pump starts).
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// The platform seam.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// The present target.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Frames handed to the present target so far.
    pub fn frames_presented(&self) -> u64 {
        self.presenter.frames_presented()
    }

    /// Update the local surface dimensions (call on resize).
    pub fn set_surface_size(&mut self, width: u32, height: u32) {
        self.surface_size = (width, height);
    }

    // ── Input handling ───────────────────────────────────────────

    /// Route one local input event.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<(), SessionError> {
        match event {
            InputEvent::PointerMotion { x, y } => self.handle_motion(x, y),
            InputEvent::Button { button, pressed } => self.handle_button(button, pressed),
            InputEvent::Scroll { dx, dy } => self.handle_scroll(dx, dy),
            InputEvent::Key {
                keysym,
                modifiers,
                pressed,
            } => self.handle_key(keysym, modifiers, pressed),
        }
    }

    /// Motion is forwarded only while captured.
    fn handle_motion(&mut self, x: f64, y: f64) -> Result<(), SessionError> {
        if !self.state.capture_active {
            return Ok(());
        }

        let (sw, sh) = self.surface_size;
        let (rw, rh) = self.remote_size;
        let (rx, ry) = scale_point(x, y, sw, sh, rw, rh);
        self.state.cursor_position = Some((rx, ry));
        self.engine.send_pointer(rx, ry, self.state.pointer.mask())
    }

    /// Clicks are always forwarded, captured or not.
    fn handle_button(&mut self, button: u32, pressed: bool) -> Result<(), SessionError> {
        let sends = if pressed {
            self.state.pointer.press(button)
        } else {
            self.state.pointer.release(button)
        };
        self.send_masks(&sends)
    }

    /// Scroll is forwarded only while captured, as a wheel pulse.
    fn handle_scroll(&mut self, dx: f64, dy: f64) -> Result<(), SessionError> {
        if !self.state.capture_active {
            return Ok(());
        }
        let sends = self.state.pointer.scroll(dx, dy);
        self.send_masks(&sends)
    }

    /// The bare hotkey drives the capture toggle; every other key is
    /// forwarded verbatim with its raw keysym.
    fn handle_key(
        &mut self,
        keysym: u32,
        modifiers: u32,
        pressed: bool,
    ) -> Result<(), SessionError> {
        if !self.controller.is_hotkey(keysym, modifiers) {
            return self.engine.send_key(keysym, pressed);
        }

        if pressed {
            let actions = self.controller.on_hotkey_press(self.state.capture_active);
            for action in actions {
                self.run_capture_action(action)?;
            }
        } else {
            let action = self.controller.on_hotkey_release(self.state.capture_active);
            self.run_capture_action(action)?;
        }
        Ok(())
    }

    fn run_capture_action(&mut self, action: CaptureAction) -> Result<(), SessionError> {
        debug!(?action, "capture action");
        match action {
            CaptureAction::SyncRemoteToLocal => {
                if let Some(text) = &self.state.remote_clipboard {
                    self.platform.write_clipboard_text(text);
                }
            }
            CaptureAction::RequestLocalClipboard => {
                self.platform.request_clipboard_text();
            }
            CaptureAction::RequestIncrementalUpdate => {
                self.engine.request_incremental_update()?;
            }
            CaptureAction::InhibitShortcuts => {
                self.platform.inhibit_shortcuts();
            }
            CaptureAction::RestoreShortcuts => {
                self.platform.restore_shortcuts();
            }
        }
        Ok(())
    }

    /// Send each mask in order at the last known cursor position
    /// (clicks and scroll do not go through the scaler).
    fn send_masks(&mut self, masks: &[ButtonMask]) -> Result<(), SessionError> {
        let (x, y) = self.state.cursor_position.unwrap_or((0, 0));
        for &mask in masks {
            self.engine.send_pointer(x, y, mask)?;
        }
        Ok(())
    }

    // ── Inbound handling ─────────────────────────────────────────

    /// One poll/dispatch cycle against the engine. Returns the number
    /// of updates dispatched; errors here are fatal to the pump.
    pub fn pump_cycle(&mut self, poll_timeout: Duration) -> Result<usize, SessionError> {
        if !self.engine.poll(poll_timeout)? {
            return Ok(0);
        }
        let updates = self.engine.dispatch()?;
        let count = updates.len();
        for update in updates {
            self.handle_update(update);
        }
        Ok(count)
    }

    /// Apply one inbound protocol update.
    pub fn handle_update(&mut self, update: ProtocolUpdate) {
        match update {
            ProtocolUpdate::Framebuffer {
                x,
                y,
                width,
                height,
            } => {
                trace!(x, y, width, height, "pixel update, repainting full surface");
                let fb = self.engine.framebuffer();
                self.presenter.present_full(fb, &mut self.target);
            }
            ProtocolUpdate::Clipboard(bytes) => {
                // Length-delimited, not NUL-terminated: copy exactly
                // these bytes into an owned value.
                let text = String::from_utf8_lossy(&bytes).into_owned();
                debug!(len = bytes.len(), "remote clipboard push");
                self.state.remote_clipboard = Some(text);
            }
        }
    }

    /// Apply one platform notification.
    pub fn handle_platform_event(&mut self, event: PlatformEvent) -> Result<(), SessionError> {
        match event {
            PlatformEvent::ShortcutsInhibited(inhibited) => {
                debug!(inhibited, "shortcuts-inhibited confirmation");
                self.state.capture_active = inhibited;
                Ok(())
            }
            // Completion writes only into the outbound call, never
            // into session state.
            PlatformEvent::ClipboardText(Some(text)) => self.engine.send_cut_text(&text),
            PlatformEvent::ClipboardText(None) => Ok(()),
        }
    }

    /// Drain all pending platform notifications.
    pub fn drain_platform_events(&mut self) -> Result<(), SessionError> {
        while let Ok(event) = self.platform_rx.try_recv() {
            self.handle_platform_event(event)?;
        }
        Ok(())
    }

    // ── Teardown ─────────────────────────────────────────────────

    /// Tear the session down, returning the engine so the caller can
    /// release the protocol connection.
    ///
    /// Shutdown ordering is strict: stop the message pump first (it
    /// must not fire once teardown begins), call this, release the
    /// returned connection, and only then is the session state gone.
    pub fn shutdown(self) -> E {
        self.engine
    }
}
