use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::window::RenderMode;

/// Shared rotation state: one angle (degrees) and the auto-rotation flag.
///
/// Cloning yields another handle to the same state. Input handling and the
/// render loop each hold a handle; the atomics are the hand-off point, so no
/// lock is needed even when input arrives on a different thread.
#[derive(Debug, Clone)]
pub struct RotationHandle {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    /// `f32` bit pattern.
    angle_bits: AtomicU32,
    continuous: AtomicBool,
}

impl RotationHandle {
    pub fn new(angle_degrees: f32, continuous: bool) -> Self {
        Self {
            shared: Arc::new(Shared {
                angle_bits: AtomicU32::new(wrap_degrees(angle_degrees).to_bits()),
                continuous: AtomicBool::new(continuous),
            }),
        }
    }

    /// Current angle in degrees, in `[0, 360)`.
    #[inline]
    pub fn angle(&self) -> f32 {
        f32::from_bits(self.shared.angle_bits.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set_angle(&self, degrees: f32) {
        self.shared
            .angle_bits
            .store(wrap_degrees(degrees).to_bits(), Ordering::Release);
    }

    /// Adds `delta` degrees atomically and returns the new (wrapped) angle.
    pub fn add_degrees(&self, delta: f32) -> f32 {
        let prev = self
            .shared
            .angle_bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some(wrap_degrees(f32::from_bits(bits) + delta).to_bits())
            });

        match prev {
            Ok(bits) | Err(bits) => wrap_degrees(f32::from_bits(bits) + delta),
        }
    }

    #[inline]
    pub fn is_continuous(&self) -> bool {
        self.shared.continuous.load(Ordering::Acquire)
    }

    /// Sets the auto-rotation flag; returns the previous value.
    #[inline]
    pub fn set_continuous(&self, continuous: bool) -> bool {
        self.shared.continuous.swap(continuous, Ordering::AcqRel)
    }

    #[inline]
    pub fn render_mode(&self) -> RenderMode {
        RenderMode::from_continuous(self.is_continuous())
    }
}

/// Folds any angle into `[0, 360)` so small increments keep full precision.
fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // A tiny negative input rounds up to exactly 360.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

impl Default for RotationHandle {
    fn default() -> Self {
        Self::new(0.0, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let a = RotationHandle::new(0.0, false);
        let b = a.clone();

        a.add_degrees(15.0);
        b.set_continuous(true);

        assert_eq!(b.angle(), 15.0);
        assert!(a.is_continuous());
        assert_eq!(a.render_mode(), RenderMode::Continuous);
    }

    #[test]
    fn add_returns_new_angle() {
        let h = RotationHandle::new(10.0, false);
        assert_eq!(h.add_degrees(5.0), 15.0);
        assert_eq!(h.angle(), 15.0);
    }

    // ── wrapping ─────────────────────────────────────────────────────────

    #[test]
    fn angle_wraps_past_full_turn() {
        let h = RotationHandle::new(350.0, false);
        assert_eq!(h.add_degrees(20.0), 10.0);
        assert_eq!(h.angle(), 10.0);
    }

    #[test]
    fn negative_angle_wraps_below_zero() {
        let h = RotationHandle::new(10.0, false);
        assert_eq!(h.add_degrees(-25.0), 345.0);
        assert_eq!(h.angle(), 345.0);
    }

    #[test]
    fn set_angle_wraps() {
        let h = RotationHandle::default();
        h.set_angle(-90.0);
        assert_eq!(h.angle(), 270.0);
        h.set_angle(720.0);
        assert_eq!(h.angle(), 0.0);
        h.set_angle(-1e-9);
        assert!((0.0..360.0).contains(&h.angle()));
    }

    #[test]
    fn long_run_keeps_small_steps() {
        // 1e9 = 2_777_777 turns + 280 degrees.
        let h = RotationHandle::new(1.0e9, true);
        assert_eq!(h.angle(), 280.0);

        let after = h.add_degrees(0.36);
        assert!((after - 280.36).abs() < 1e-4, "angle = {after}");
        assert_ne!(h.angle(), 280.0);
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let h = RotationHandle::new(0.0, false);

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let h = h.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        h.add_degrees(1.0);
                    }
                })
            })
            .collect();

        for w in workers {
            w.join().unwrap();
        }

        // Integer steps stay exact; 4000 = 11 turns + 40.
        assert_eq!(h.angle(), 40.0);
    }
}
