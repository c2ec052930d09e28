/// Countdown of attempts left for a single operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
  pub(crate) attempts: u32,
  pub(crate) remaining: u32,
}
