/// Sparse memory model backing the port abstraction in tests and the
/// CLI self-check. Byte-granular so probe strides of any alignment
/// behave like real memory, with an access trace that callers drain to
/// assert ordering.
use crate::port::MemPort;
use std::collections::HashMap;

/// One recorded port access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
  Read32 { addr: u64 },
  Write32 { addr: u64, val: u32 },
  Read64 { addr: u64 },
  Write64 { addr: u64, val: u64 },
  Fence,
}

#[derive(Default)]
pub struct SparseMem {
  bytes: HashMap<u64, u8>,
  trace: Vec<Access>,
  // stuck-at-zero masks keyed by the 64-bit access address
  stuck_zero: HashMap<u64, u64>,
}

impl SparseMem {
  pub fn new() -> Self {
    Self::default()
  }

  /// Force the masked bits of 64-bit reads at `addr` to zero,
  /// simulating a stuck data line behind that address
  pub fn set_stuck_zero(&mut self, addr: u64, mask: u64) {
    self.stuck_zero.insert(addr, mask);
  }

  /// Direct store without touching the trace (test setup)
  pub fn poke_u32(&mut self, addr: u64, val: u32) {
    self.store(addr, &val.to_le_bytes());
  }

  /// Direct load without touching the trace (test assertions)
  pub fn peek_u32(&self, addr: u64) -> u32 {
    u32::from_le_bytes(self.load(addr))
  }

  pub fn peek_u64(&self, addr: u64) -> u64 {
    u64::from_le_bytes(self.load(addr))
  }

  /// Drain the recorded access sequence
  pub fn take_trace(&mut self) -> Vec<Access> {
    std::mem::take(&mut self.trace)
  }

  fn store(&mut self, addr: u64, data: &[u8]) {
    for (i, b) in data.iter().enumerate() {
      self.bytes.insert(addr + i as u64, *b);
    }
  }

  fn load<const N: usize>(&self, addr: u64) -> [u8; N] {
    let mut out = [0u8; N];
    for (i, b) in out.iter_mut().enumerate() {
      *b = self.bytes.get(&(addr + i as u64)).copied().unwrap_or(0);
    }
    out
  }
}

impl MemPort for SparseMem {
  fn read_u32(&mut self, addr: u64) -> u32 {
    self.trace.push(Access::Read32 { addr });
    u32::from_le_bytes(self.load(addr))
  }

  fn write_u32(&mut self, addr: u64, val: u32) {
    self.trace.push(Access::Write32 { addr, val });
    self.store(addr, &val.to_le_bytes());
  }

  fn read_u64(&mut self, addr: u64) -> u64 {
    self.trace.push(Access::Read64 { addr });
    let val = u64::from_le_bytes(self.load(addr));
    match self.stuck_zero.get(&addr) {
      Some(mask) => val & !mask,
      None => val,
    }
  }

  fn write_u64(&mut self, addr: u64, val: u64) {
    self.trace.push(Access::Write64 { addr, val });
    self.store(addr, &val.to_le_bytes());
  }

  fn fence(&mut self) {
    self.trace.push(Access::Fence);
  }
}
