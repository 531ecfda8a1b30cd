//! Gesture debounce - removes single-frame classification flicker
//!
//! Fixed-length ring buffer of raw classifications. The confirmed gesture
//! only changes on sustained agreement, so consumers never see flicker
//! faster than the confirmation window.

use super::gesture::GestureKind;

/// Confirmation window: raw gesture must fill the whole history to confirm
pub const HISTORY_SIZE: usize = 5;

/// Losing the hand is trusted sooner than gaining a gesture. A stale
/// confirmed gesture while tracking has dropped feels worse than a late
/// confirmation, so None only needs this many consecutive frames.
pub const NONE_EXIT_FRAMES: usize = 3;

/// Ring buffer of recent raw classifications plus the confirmed result
pub struct GestureStabilizer {
    history: [GestureKind; HISTORY_SIZE],
    /// Next slot to write
    write_index: usize,
    /// Number of valid entries (saturates at HISTORY_SIZE)
    len: usize,
    confirmed: GestureKind,
}

impl GestureStabilizer {
    pub fn new() -> Self {
        Self {
            history: [GestureKind::None; HISTORY_SIZE],
            write_index: 0,
            len: 0,
            confirmed: GestureKind::None,
        }
    }

    /// Push one raw classification and return the (possibly updated)
    /// confirmed gesture.
    pub fn push(&mut self, raw: GestureKind) -> GestureKind {
        self.history[self.write_index] = raw;
        self.write_index = (self.write_index + 1) % HISTORY_SIZE;
        self.len = (self.len + 1).min(HISTORY_SIZE);

        if self.len == HISTORY_SIZE && self.history.iter().all(|&g| g == raw) {
            self.confirmed = raw;
        } else if raw == GestureKind::None && self.recent_all(GestureKind::None, NONE_EXIT_FRAMES) {
            self.confirmed = GestureKind::None;
        }
        // Otherwise sticky: keep the previous confirmed gesture.

        self.confirmed
    }

    #[allow(dead_code)]
    pub fn confirmed(&self) -> GestureKind {
        self.confirmed
    }

    /// Clear history and confirmed gesture (detector re-initialization)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// True when the newest `count` entries all equal `kind`
    fn recent_all(&self, kind: GestureKind, count: usize) -> bool {
        if self.len < count {
            return false;
        }
        (1..=count).all(|back| {
            let idx = (self.write_index + HISTORY_SIZE - back) % HISTORY_SIZE;
            self.history[idx] == kind
        })
    }
}

impl Default for GestureStabilizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GestureKind::*;

    #[test]
    fn five_agreeing_frames_confirm() {
        let mut s = GestureStabilizer::new();
        for _ in 0..4 {
            assert_eq!(s.push(OpenPalm), None);
        }
        assert_eq!(s.push(OpenPalm), OpenPalm);
    }

    #[test]
    fn single_flicker_blocks_confirmation() {
        let mut s = GestureStabilizer::new();
        for _ in 0..4 {
            s.push(OpenPalm);
        }
        s.push(ClosedFist);
        for _ in 0..4 {
            s.push(OpenPalm);
        }
        // Never 5 consecutive agreeing frames, so confirmed never moved.
        assert_eq!(s.confirmed(), None);
    }

    #[test]
    fn flicker_does_not_dislodge_an_established_gesture() {
        let mut s = GestureStabilizer::new();
        for _ in 0..5 {
            s.push(OpenPalm);
        }
        assert_eq!(s.confirmed(), OpenPalm);
        s.push(ClosedFist);
        for _ in 0..4 {
            s.push(OpenPalm);
        }
        assert_eq!(s.confirmed(), OpenPalm);
    }

    #[test]
    fn losing_the_hand_exits_after_three_frames() {
        let mut s = GestureStabilizer::new();
        for _ in 0..5 {
            s.push(Pinch);
        }
        assert_eq!(s.confirmed(), Pinch);
        s.push(None);
        s.push(None);
        assert_eq!(s.confirmed(), Pinch);
        assert_eq!(s.push(None), None);
    }

    #[test]
    fn none_exit_works_with_short_history() {
        // Fresh stabilizer: only 3 frames seen, all None, still confirms None.
        let mut s = GestureStabilizer::new();
        s.push(ClosedFist);
        s.push(None);
        s.push(None);
        assert_eq!(s.push(None), None);
    }

    #[test]
    fn reset_clears_confirmed() {
        let mut s = GestureStabilizer::new();
        for _ in 0..5 {
            s.push(OpenPalm);
        }
        s.reset();
        assert_eq!(s.confirmed(), None);
    }
}
