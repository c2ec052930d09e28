use crate::structures::RetryBudget;

impl RetryBudget {
  /// A budget allowing `attempts` tries in total, at least one
  pub fn new(attempts: u32) -> Self {
    let attempts = attempts.max(1);
    Self {
      attempts,
      remaining: attempts,
    }
  }

  /// Records a failed attempt. Returns the number of retries left if another attempt may be made.
  pub fn consume(&mut self) -> Option<u32> {
    self.remaining = self.remaining.saturating_sub(1);
    (self.remaining > 0).then_some(self.remaining)
  }

  pub fn remaining(&self) -> u32 {
    self.remaining
  }

  /// Retries made so far, the first attempt not included
  pub fn retries_attempted(&self) -> u32 {
    (self.attempts - self.remaining).min(self.attempts - 1)
  }
}
