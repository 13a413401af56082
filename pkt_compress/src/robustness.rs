use crate::bit_vector::BitVector;
use crate::constants::{CHANGE_HISTORY_SIZE, FLAG_HISTORY_SIZE, MAX_EFFECTIVE_ROBUSTNESS};

/// Ring buffers of recent mask changes and new-mask flags, from which
/// the per-frame wire quantities are derived:
/// * the transmitted window: the union of the last R + 1 change
///   vectors, letting a decoder that missed up to R packets re-derive
///   the mask moves it skipped;
/// * the effective robustness: R plus the run of all-zero changes
///   just outside that window, saturating at 15;
/// * the repeated-replacement flag: whether the new-mask flag fired
///   at least twice within the effective window.
///
/// Index discipline: `record_change` stores the current frame's change
/// at the cursor WITHOUT advancing, the derived quantities are read,
/// and `advance` then stores the frame's flag and moves both cursors.
#[derive(Debug)]
pub(crate) struct RobustnessWindow {
  robustness: usize,
  change_history: [BitVector; CHANGE_HISTORY_SIZE],
  history_index: usize,
  flag_history: [bool; FLAG_HISTORY_SIZE],
  flag_history_index: usize,
}

impl RobustnessWindow {
  pub fn new(packet_length: usize, robustness: usize) -> Self {
    RobustnessWindow {
      robustness,
      change_history: std::array::from_fn(|_| BitVector::new(packet_length)),
      history_index: 0,
      flag_history: [false; FLAG_HISTORY_SIZE],
      flag_history_index: 0,
    }
  }

  /// Stores the current frame's change vector at the cursor.
  pub fn record_change(&mut self, change: &BitVector) {
    self.change_history[self.history_index].copy_from(change);
  }

  /// Computes the transmitted window into `dst`: the current change
  /// OR'd with the changes of the previous min(t, R) frames.
  pub fn window_into(&self, dst: &mut BitVector, change: &BitVector, t: usize) {
    dst.copy_from(change);
    for i in 1..=t.min(self.robustness) {
      let idx = (self.history_index + CHANGE_HISTORY_SIZE - i) % CHANGE_HISTORY_SIZE;
      dst.or_with(&self.change_history[idx]);
    }
  }

  /// Computes the effective robustness: R, plus one for each
  /// consecutive all-zero change going further back, saturating at 15.
  pub fn effective_robustness(&self, t: usize) -> usize {
    let r = self.robustness;
    if t <= r {
      return r;
    }

    let mut quiet = 0;
    for i in (r + 1)..=t.min(MAX_EFFECTIVE_ROBUSTNESS) {
      let idx = (self.history_index + CHANGE_HISTORY_SIZE - i) % CHANGE_HISTORY_SIZE;
      if self.change_history[idx].hamming_weight() > 0 {
        break;
      }
      quiet += 1;
      if quiet >= MAX_EFFECTIVE_ROBUSTNESS - r {
        break;
      }
    }
    r + quiet
  }

  /// True when the new-mask flag was raised at least twice within the
  /// current frame plus the `effective` most recent recorded flags.
  pub fn repeated_new_mask(&self, effective: usize, new_mask_flag: bool, t: usize) -> bool {
    if effective == 0 {
      return false;
    }

    let mut count = new_mask_flag as usize;
    for i in 0..effective.min(t) {
      let idx =
        (self.flag_history_index + FLAG_HISTORY_SIZE - 1 - i) % FLAG_HISTORY_SIZE;
      if self.flag_history[idx] {
        count += 1;
        if count >= 2 {
          return true;
        }
      }
    }
    count >= 2
  }

  /// Stores the frame's new-mask flag and advances both cursors.
  pub fn advance(&mut self, new_mask_flag: bool) {
    self.flag_history[self.flag_history_index] = new_mask_flag;
    self.flag_history_index = (self.flag_history_index + 1) % FLAG_HISTORY_SIZE;
    self.history_index = (self.history_index + 1) % CHANGE_HISTORY_SIZE;
  }

  /// Returns to the t = 0 state without reallocating.
  pub fn reset(&mut self) {
    for change in self.change_history.iter_mut() {
      change.clear();
    }
    self.history_index = 0;
    self.flag_history = [false; FLAG_HISTORY_SIZE];
    self.flag_history_index = 0;
  }
}
