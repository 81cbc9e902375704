//! Framebuffer presenter — full-surface repaint on every update.
//!
//! Each inbound pixel-update notification carries a dirty rectangle,
//! and this presenter deliberately ignores it: the displayable surface
//! is rebuilt from the *entire* current pixel buffer, replacing
//! whatever was previously shown. Partial compositing is a non-goal.

use tracing::warn;

use crate::protocol::Framebuffer;

// ── Surface ──────────────────────────────────────────────────────

/// Zero-copy view of one presentable frame.
///
/// Borrows the engine-owned pixel buffer; valid only for the duration
/// of the present call. RGBA8, row stride = `width * 4`.
#[derive(Debug, Clone, Copy)]
pub struct Surface<'a> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Exactly `width * height * 4` bytes of RGBA8 pixel data.
    pub data: &'a [u8],
}

impl Surface<'_> {
    /// Bytes per pixel (8-bit RGBA).
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.width as usize * Self::BYTES_PER_PIXEL
    }
}

// ── PresentTarget ────────────────────────────────────────────────

/// Where finished surfaces go — implemented by the window layer
/// (a texture upload, a picture widget, …) and by test doubles.
pub trait PresentTarget {
    /// Display `surface`, discarding whatever was previously shown.
    fn present(&mut self, surface: Surface<'_>);
}

// ── FramebufferPresenter ─────────────────────────────────────────

/// Re-presents each inbound framebuffer notification as a full
/// surface.
#[derive(Debug, Default)]
pub struct FramebufferPresenter {
    frames_presented: u64,
}

impl FramebufferPresenter {
    /// Create a presenter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total frames handed to the target since creation.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Wrap the full current framebuffer into a [`Surface`] and hand
    /// it to `target`.
    ///
    /// An empty or undersized buffer (possible before the first frame
    /// arrives) is skipped, not an error.
    pub fn present_full<T: PresentTarget>(&mut self, fb: Framebuffer<'_>, target: &mut T) {
        if fb.width == 0 || fb.height == 0 {
            return;
        }

        let expected = fb.width as usize * fb.height as usize * Surface::BYTES_PER_PIXEL;
        if fb.data.len() < expected {
            warn!(
                have = fb.data.len(),
                expected, "framebuffer smaller than its dimensions, skipping frame"
            );
            return;
        }

        target.present(Surface {
            width: fb.width,
            height: fb.height,
            data: &fb.data[..expected],
        });
        self.frames_presented += 1;
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingTarget {
        frames: Vec<(u32, u32, Vec<u8>)>,
    }

    impl PresentTarget for RecordingTarget {
        fn present(&mut self, surface: Surface<'_>) {
            self.frames
                .push((surface.width, surface.height, surface.data.to_vec()));
        }
    }

    #[test]
    fn presents_the_entire_buffer() {
        let pixels: Vec<u8> = (0..2 * 2 * 4).map(|i| i as u8).collect();
        let fb = Framebuffer {
            width: 2,
            height: 2,
            data: &pixels,
        };

        let mut presenter = FramebufferPresenter::new();
        let mut target = RecordingTarget { frames: Vec::new() };
        presenter.present_full(fb, &mut target);

        assert_eq!(presenter.frames_presented(), 1);
        let (w, h, data) = &target.frames[0];
        assert_eq!((*w, *h), (2, 2));
        assert_eq!(data, &pixels);
    }

    #[test]
    fn truncates_oversized_buffers_to_the_surface() {
        let pixels = vec![7u8; 2 * 2 * 4 + 16];
        let fb = Framebuffer {
            width: 2,
            height: 2,
            data: &pixels,
        };

        let mut presenter = FramebufferPresenter::new();
        let mut target = RecordingTarget { frames: Vec::new() };
        presenter.present_full(fb, &mut target);

        assert_eq!(target.frames[0].2.len(), 2 * 2 * 4);
    }

    #[test]
    fn undersized_buffer_is_skipped() {
        let pixels = vec![0u8; 4];
        let fb = Framebuffer {
            width: 100,
            height: 100,
            data: &pixels,
        };

        let mut presenter = FramebufferPresenter::new();
        let mut target = RecordingTarget { frames: Vec::new() };
        presenter.present_full(fb, &mut target);

        assert!(target.frames.is_empty());
        assert_eq!(presenter.frames_presented(), 0);
    }

    #[test]
    fn empty_framebuffer_is_skipped() {
        let fb = Framebuffer {
            width: 0,
            height: 0,
            data: &[],
        };
        let mut presenter = FramebufferPresenter::new();
        let mut target = RecordingTarget { frames: Vec::new() };
        presenter.present_full(fb, &mut target);
        assert!(target.frames.is_empty());
    }

    #[test]
    fn stride_is_width_times_four() {
        let surface = Surface {
            width: 640,
            height: 480,
            data: &[],
        };
        assert_eq!(surface.stride(), 2560);
    }
}
