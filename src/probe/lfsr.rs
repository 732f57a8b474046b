/// Pseudo-random pattern generator for memory probing
///
/// A 64-bit Fibonacci-style LFSR with a fixed feedback polynomial. One
/// output word is produced by eight byte stages, each byte stage by eight
/// single-bit steps. The generator is pure state plus constant, so two
/// runs from the same seed emit identical sequences and probe results are
/// diffable across hardware revisions.

pub const DEFAULT_SEED: u64 = 0xcaca_5a5a_dead_beef;
pub const FEEDBACK: u64 = 0x6c00_0039_7f00_0032;

#[derive(Debug, Clone, Copy)]
pub struct Lfsr64 {
  state: u64,
}

impl Lfsr64 {
  pub fn new(seed: u64) -> Self {
    Self { state: seed }
  }

  /// One single-bit feedback step
  fn step_bit(lfsr: u64) -> u64 {
    if lfsr & 1 != 0 {
      (lfsr >> 1) ^ FEEDBACK
    } else {
      lfsr >> 1
    }
  }

  /// One byte-equivalent mixing stage (eight bit steps)
  fn step_byte(mut lfsr: u64) -> u64 {
    for _ in 0..8 {
      lfsr = Self::step_bit(lfsr);
    }
    lfsr
  }

  /// Advance by one 64-bit output word (eight byte stages)
  pub fn next_word(&mut self) -> u64 {
    for _ in 0..8 {
      self.state = Self::step_byte(self.state);
    }
    self.state
  }
}

impl Default for Lfsr64 {
  fn default() -> Self {
    Self::new(DEFAULT_SEED)
  }
}
