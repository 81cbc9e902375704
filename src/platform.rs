//! Platform seam: shortcut inhibition and the system clipboard.
//!
//! Everything here is *request only*. The platform confirms shortcut
//! inhibition and delivers clipboard reads asynchronously as
//! [`PlatformEvent`]s on an explicit channel that the message pump
//! drains into the session — never as synchronous return values. This
//! keeps the press/release race of the capture toggle observable
//! instead of hidden in a callback.

// ── PlatformEvent ────────────────────────────────────────────────

/// Notifications delivered asynchronously by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    /// The compositor/OS reports the *actual* shortcuts-inhibited
    /// status. This is the source of truth for `capture_active`; it
    /// may lag a request the session just issued.
    ShortcutsInhibited(bool),

    /// Completion of a clipboard read requested via
    /// [`Platform::request_clipboard_text`]. `None` means the
    /// clipboard held no text; the session treats that as a no-op.
    ClipboardText(Option<String>),
}

// ── Platform ─────────────────────────────────────────────────────

/// The operations this crate requires from the windowing platform.
///
/// The implementation holds the (non-owning) reference to the display
/// surface; its lifetime is bound to the window, not to the session.
/// Completions are sent on the platform-event channel the session was
/// constructed with.
pub trait Platform {
    /// Request exclusive-input mode: inhibit system shortcuts for the
    /// session surface. Completion arrives later as
    /// [`PlatformEvent::ShortcutsInhibited`]`(true)`.
    fn inhibit_shortcuts(&mut self);

    /// Request that system shortcuts be restored. Completion arrives
    /// later as [`PlatformEvent::ShortcutsInhibited`]`(false)`.
    fn restore_shortcuts(&mut self);

    /// Start a non-blocking read of the local system clipboard. The
    /// result arrives later as [`PlatformEvent::ClipboardText`].
    fn request_clipboard_text(&mut self);

    /// Replace the local system clipboard contents with `text`.
    fn write_clipboard_text(&mut self, text: &str);
}
