//! Capture-toggle state machine and clipboard hand-off.
//!
//! Capture mode (local shortcuts inhibited, pointer motion/scroll
//! routed to the remote side) is toggled by a single designated hotkey
//! pressed with no modifiers held. The gesture is decomposed into
//! press and release phases because the windowing layer delivers them
//! as separate events and the gesture must survive partial delivery:
//!
//! - **press** drives the clipboard hand-off for the direction the
//!   user is about to switch *out of*, plus an incremental refresh;
//! - **release** requests the actual shortcut inhibit/restore.
//!
//! The controller only *requests* the transition. The platform
//! confirms it asynchronously via
//! [`PlatformEvent::ShortcutsInhibited`](crate::platform::PlatformEvent),
//! so the `capture_active` value read here may lag a request that was
//! just issued. The controller must never assume otherwise.

// ── Hotkey ───────────────────────────────────────────────────────

/// Default capture-toggle keysym: Pause.
pub const KEYSYM_PAUSE: u32 = 0xFF13;

// ── CaptureAction ────────────────────────────────────────────────

/// Side effects requested by the capture controller, executed by the
/// session against the platform and the protocol engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureAction {
    /// Push the last known remote clipboard text into the local
    /// system clipboard (remote → local sync, on exiting capture).
    SyncRemoteToLocal,

    /// Kick off a non-blocking read of the local clipboard; its
    /// result is forwarded to the remote side as cut-text
    /// (local → remote sync, on entering capture).
    RequestLocalClipboard,

    /// Ask the remote side for an incremental framebuffer refresh
    /// (covers any compositor redraw the mode switch needs).
    RequestIncrementalUpdate,

    /// Ask the platform to inhibit system shortcuts (enter capture).
    InhibitShortcuts,

    /// Ask the platform to restore system shortcuts (exit capture).
    RestoreShortcuts,
}

// ── CaptureController ────────────────────────────────────────────

/// Decides what the hotkey gesture does given the current *confirmed*
/// capture status.
#[derive(Debug, Clone)]
pub struct CaptureController {
    hotkey_keysym: u32,
}

impl CaptureController {
    /// Create a controller bound to the given hotkey keysym.
    pub fn new(hotkey_keysym: u32) -> Self {
        Self { hotkey_keysym }
    }

    /// The keysym that toggles capture mode.
    pub fn hotkey_keysym(&self) -> u32 {
        self.hotkey_keysym
    }

    /// Whether a key event is the capture-toggle gesture.
    ///
    /// Only the bare hotkey counts — with any modifier held the key is
    /// forwarded to the remote side like every other key.
    pub fn is_hotkey(&self, keysym: u32, modifiers: u32) -> bool {
        modifiers == 0 && keysym == self.hotkey_keysym
    }

    /// Actions for the hotkey **press** phase.
    ///
    /// Reads the current confirmed capture status: when captured, the
    /// user is about to exit and expects to paste what was on the
    /// remote side; when not captured, the remote side is primed with
    /// the local clipboard before the user starts typing into it.
    pub fn on_hotkey_press(&self, capture_active: bool) -> [CaptureAction; 2] {
        if capture_active {
            [
                CaptureAction::SyncRemoteToLocal,
                CaptureAction::RequestIncrementalUpdate,
            ]
        } else {
            [
                CaptureAction::RequestLocalClipboard,
                CaptureAction::RequestIncrementalUpdate,
            ]
        }
    }

    /// Action for the hotkey **release** phase.
    ///
    /// `capture_active` is read again here — it may have changed since
    /// the press phase (the confirmation arrives on a channel, not as
    /// a synchronous return value).
    pub fn on_hotkey_release(&self, capture_active: bool) -> CaptureAction {
        if capture_active {
            CaptureAction::RestoreShortcuts
        } else {
            CaptureAction::InhibitShortcuts
        }
    }
}

impl Default for CaptureController {
    fn default() -> Self {
        Self::new(KEYSYM_PAUSE)
    }
}

// ── Tests ────────────────────────────────────────────────────────
