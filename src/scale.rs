//! Local-surface → remote-framebuffer coordinate mapping.

/// Scale a local surface point to remote framebuffer coordinates.
///
/// Given local surface dimensions `(surface_w, surface_h)` and remote
/// framebuffer dimensions `(remote_w, remote_h)`, maps `(x, y)` to
/// `(x * remote_w / surface_w, y * remote_h / surface_h)`.
///
/// Pure, no error conditions: the caller guarantees the surface
/// dimensions are non-zero (a degenerate surface is a caller concern).
/// Only pointer *motion* goes through this mapping — clicks and scroll
/// are sent at the last known scaled position.
pub fn scale_point(
    x: f64,
    y: f64,
    surface_w: u32,
    surface_h: u32,
    remote_w: u32,
    remote_h: u32,
) -> (i32, i32) {
    let rx = x * remote_w as f64 / surface_w as f64;
    let ry = y * remote_h as f64 / surface_h as f64;
    (rx as i32, ry as i32)
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_point_scales_down() {
        let (x, y) = scale_point(960.0, 540.0, 1920, 1080, 1280, 720);
        assert_eq!((x, y), (640, 360));
    }

    #[test]
    fn origin_maps_to_origin() {
        let (x, y) = scale_point(0.0, 0.0, 1920, 1080, 1280, 720);
        assert_eq!((x, y), (0, 0));
    }

    #[test]
    fn output_stays_within_remote_bounds() {
        let (sw, sh, rw, rh) = (1920u32, 1080u32, 1280u32, 720u32);
        for &(x, y) in &[(0.0, 0.0), (1.0, 1.0), (959.5, 539.5), (1919.0, 1079.0)] {
            let (rx, ry) = scale_point(x, y, sw, sh, rw, rh);
            assert!((0..rw as i32).contains(&rx), "x={x} → rx={rx}");
            assert!((0..rh as i32).contains(&ry), "y={y} → ry={ry}");
        }
    }

    #[test]
    fn identity_when_dimensions_match() {
        let (x, y) = scale_point(123.0, 456.0, 800, 600, 800, 600);
        assert_eq!((x, y), (123, 456));
    }

    #[test]
    fn upscales_to_larger_remote() {
        let (x, y) = scale_point(100.0, 100.0, 640, 480, 1280, 960);
        assert_eq!((x, y), (200, 200));
    }
}
