//! Edge-correcting pointer mask state machine.
//!
//! Raw press/release events from the windowing layer are not always
//! well paired: a drag that leaves and re-enters the input surface can
//! deliver two button-down events with no release in between. The
//! remote side tracks button state purely from the mask we send, so a
//! stale bit would leave a button stuck "held" remotely.
//!
//! [`PointerTranslator`] corrects these edges: every press is
//! guaranteed to reach the remote side as a clean 0→1 transition, and
//! every release as a clean 1→0. Wheel scroll is emitted as a *pulse*
//! (set then immediately clear) because the protocol has no dedicated
//! scroll message.

use tracing::warn;

use crate::protocol::ButtonMask;

// ── PointerTranslator ────────────────────────────────────────────

/// Translates raw press/release/scroll events into an ordered list of
/// outbound pointer masks.
///
/// The caller sends each returned mask in order, all at the last known
/// cursor position.
#[derive(Debug, Default)]
pub struct PointerTranslator {
    mask: ButtonMask,
}

impl PointerTranslator {
    /// Create a translator with no buttons held.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mask of buttons currently held (never contains wheel bits
    /// between calls — wheel bits only appear inside a scroll pulse).
    pub fn mask(&self) -> ButtonMask {
        self.mask
    }

    /// Handle a button press.
    ///
    /// If the bit is already set (stale press), first clears it and
    /// emits the corrected mask, then sets it and emits again, so the
    /// remote side always observes 0→1.
    ///
    /// Unknown raw button identifiers are logged and dropped with no
    /// state change.
    pub fn press(&mut self, raw_button: u32) -> Vec<ButtonMask> {
        let Some(bit) = ButtonMask::from_raw_button(raw_button) else {
            warn!(raw_button, "unknown pointer button, dropping press");
            return Vec::new();
        };

        let mut out = Vec::with_capacity(2);
        if self.mask.contains(bit) {
            // Stale press: release first.
            self.mask.remove(bit);
            out.push(self.mask);
        }
        self.mask.insert(bit);
        out.push(self.mask);
        out
    }

    /// Handle a button release. Symmetric to [`press`](Self::press):
    /// if the bit is already clear, sets it and emits, then clears it
    /// and emits the final mask.
    pub fn release(&mut self, raw_button: u32) -> Vec<ButtonMask> {
        let Some(bit) = ButtonMask::from_raw_button(raw_button) else {
            warn!(raw_button, "unknown pointer button, dropping release");
            return Vec::new();
        };

        let mut out = Vec::with_capacity(2);
        if !self.mask.contains(bit) {
            // Stale release: press first.
            self.mask.insert(bit);
            out.push(self.mask);
        }
        self.mask.remove(bit);
        out.push(self.mask);
        out
    }

    /// Handle a scroll event by pulsing the wheel bits.
    ///
    /// Derives up to 4 wheel bits from the deltas (up if `dy < 0`,
    /// down if `dy > 0`, left if `dx < 0`, right if `dx > 0`; both
    /// axes may combine) and emits exactly two masks: one with the
    /// bits set, one with them cleared. Zero deltas emit nothing.
    pub fn scroll(&mut self, dx: f64, dy: f64) -> Vec<ButtonMask> {
        let mut bits = ButtonMask::empty();
        if dy < 0.0 {
            bits |= ButtonMask::WHEEL_UP;
        } else if dy > 0.0 {
            bits |= ButtonMask::WHEEL_DOWN;
        }
        if dx < 0.0 {
            bits |= ButtonMask::WHEEL_LEFT;
        } else if dx > 0.0 {
            bits |= ButtonMask::WHEEL_RIGHT;
        }

        if bits.is_empty() {
            return Vec::new();
        }

        self.mask.insert(bits);
        let pulsed = self.mask;
        self.mask.remove(bits);
        vec![pulsed, self.mask]
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_press_release() {
        let mut t = PointerTranslator::new();

        let sends = t.press(1);
        assert_eq!(sends, vec![ButtonMask::PRIMARY]);

        let sends = t.release(1);
        assert_eq!(sends, vec![ButtonMask::empty()]);
    }

    #[test]
    fn duplicate_press_emits_clean_transition() {
        let mut t = PointerTranslator::new();
        t.press(1);

        // A second press with no intervening release must emit a
        // corrected release first, then the press.
        let sends = t.press(1);
        assert_eq!(sends, vec![ButtonMask::empty(), ButtonMask::PRIMARY]);
        assert_eq!(t.mask(), ButtonMask::PRIMARY);
    }

    #[test]
    fn duplicate_release_emits_clean_transition() {
        let mut t = PointerTranslator::new();

        // Release without a press: emit press first, then release.
        let sends = t.release(3);
        assert_eq!(sends, vec![ButtonMask::SECONDARY, ButtonMask::empty()]);
        assert_eq!(t.mask(), ButtonMask::empty());
    }

    #[test]
    fn odd_press_runs_never_leave_stuck_bits() {
        let mut t = PointerTranslator::new();
        for _ in 0..5 {
            t.press(2);
        }
        assert_eq!(t.mask(), ButtonMask::MIDDLE);
        let sends = t.release(2);
        assert_eq!(*sends.last().unwrap(), ButtonMask::empty());
        assert_eq!(t.mask(), ButtonMask::empty());
    }

    #[test]
    fn unknown_button_is_dropped() {
        let mut t = PointerTranslator::new();
        assert!(t.press(7).is_empty());
        assert!(t.release(0).is_empty());
        assert_eq!(t.mask(), ButtonMask::empty());
    }

    #[test]
    fn independent_buttons_combine() {
        let mut t = PointerTranslator::new();
        t.press(1);
        let sends = t.press(3);
        assert_eq!(sends, vec![ButtonMask::PRIMARY | ButtonMask::SECONDARY]);

        let sends = t.release(1);
        assert_eq!(sends, vec![ButtonMask::SECONDARY]);
    }

    #[test]
    fn scroll_up_is_a_two_send_pulse() {
        let mut t = PointerTranslator::new();
        let sends = t.scroll(0.0, -1.0);
        assert_eq!(sends, vec![ButtonMask::WHEEL_UP, ButtonMask::empty()]);
        assert_eq!(t.mask(), ButtonMask::empty());
    }

    #[test]
    fn diagonal_scroll_combines_axes() {
        let mut t = PointerTranslator::new();
        let sends = t.scroll(1.0, 1.0);
        assert_eq!(
            sends,
            vec![
                ButtonMask::WHEEL_DOWN | ButtonMask::WHEEL_RIGHT,
                ButtonMask::empty(),
            ]
        );
    }

    #[test]
    fn scroll_preserves_held_buttons() {
        let mut t = PointerTranslator::new();
        t.press(1);
        let sends = t.scroll(0.0, 1.0);
        assert_eq!(
            sends,
            vec![
                ButtonMask::PRIMARY | ButtonMask::WHEEL_DOWN,
                ButtonMask::PRIMARY,
            ]
        );
        // Wheel bits never survive past the pulse.
        assert_eq!(t.mask(), ButtonMask::PRIMARY);
    }

    #[test]
    fn zero_delta_scroll_emits_nothing() {
        let mut t = PointerTranslator::new();
        assert!(t.scroll(0.0, 0.0).is_empty());
    }

    #[test]
    fn mask_bounded_by_truly_held_buttons() {
        let mut t = PointerTranslator::new();
        t.press(1);
        t.press(2);
        t.press(1); // stale
        t.release(3); // stale
        t.scroll(-1.0, 0.0);

        // After any interleaving, the steady-state mask holds exactly
        // the truly-held buttons: primary and middle.
        assert_eq!(t.mask(), ButtonMask::PRIMARY | ButtonMask::MIDDLE);
    }
}
