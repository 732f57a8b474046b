/// Register map of the SoC-control block
///
/// The map is a fixed, total function over closed enums. Offsets are
/// relative to the SoC-control base address supplied by the platform
/// configuration, matching the generated register file layout: isolate
/// control at 0x10, isolate status at 0x30, reset at 0x50, then the
/// clock enable / select / divider banks at 0x70 / 0x90 / 0xb0.

/// A reset-capable hardware domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetDomain {
  Periph,
  SafetyIsland,
  SecurityIsland,
  IntCluster,
  FpCluster,
  L2,
}

/// All reset-capable domains, in register-file order
pub const RESET_DOMAINS: [ResetDomain; 6] = [
  ResetDomain::Periph,
  ResetDomain::SafetyIsland,
  ResetDomain::SecurityIsland,
  ResetDomain::IntCluster,
  ResetDomain::FpCluster,
  ResetDomain::L2,
];

/// A clock-gated domain; Host is a clock domain only and has no reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockDomain {
  Host,
  Periph,
  SafetyIsland,
  SecurityIsland,
  IntCluster,
  FpCluster,
  L2,
}

/// One of the three physical input clocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
  Clk0,
  Clk1,
  Clk2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationState {
  Isolated,
  Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetState {
  Asserted,
  Released,
}

impl ResetDomain {
  fn index(self) -> u64 {
    match self {
      ResetDomain::Periph => 0,
      ResetDomain::SafetyIsland => 1,
      ResetDomain::SecurityIsland => 2,
      ResetDomain::IntCluster => 3,
      ResetDomain::FpCluster => 4,
      ResetDomain::L2 => 5,
    }
  }

  /// Isolation control register offset
  pub fn isolate_offset(self) -> u64 {
    0x10 + 4 * self.index()
  }

  /// Isolation status register offset
  pub fn isolate_status_offset(self) -> u64 {
    0x30 + 4 * self.index()
  }

  /// Reset control register offset
  pub fn rst_offset(self) -> u64 {
    0x50 + 4 * self.index()
  }

  /// The clock domain gated together with this reset domain
  pub fn clock_domain(self) -> ClockDomain {
    match self {
      ResetDomain::Periph => ClockDomain::Periph,
      ResetDomain::SafetyIsland => ClockDomain::SafetyIsland,
      ResetDomain::SecurityIsland => ClockDomain::SecurityIsland,
      ResetDomain::IntCluster => ClockDomain::IntCluster,
      ResetDomain::FpCluster => ClockDomain::FpCluster,
      ResetDomain::L2 => ClockDomain::L2,
    }
  }
}

impl ClockDomain {
  /// Host runs on the fixed input clock and exposes no control registers
  fn index(self) -> Option<u64> {
    match self {
      ClockDomain::Host => None,
      ClockDomain::Periph => Some(1),
      ClockDomain::SafetyIsland => Some(2),
      ClockDomain::SecurityIsland => Some(3),
      ClockDomain::IntCluster => Some(4),
      ClockDomain::FpCluster => Some(5),
      ClockDomain::L2 => Some(6),
    }
  }

  /// Clock gate enable register offset
  pub fn clk_en_offset(self) -> Option<u64> {
    self.index().map(|i| 0x70 + 4 * i)
  }

  /// Clock source select register offset
  pub fn clk_sel_offset(self) -> Option<u64> {
    self.index().map(|i| 0x90 + 4 * i)
  }

  /// Clock divider register offset
  pub fn clk_div_offset(self) -> Option<u64> {
    self.index().map(|i| 0xb0 + 4 * i)
  }
}

impl ClockSource {
  pub fn raw(self) -> u32 {
    match self {
      ClockSource::Clk0 => 0,
      ClockSource::Clk1 => 1,
      ClockSource::Clk2 => 2,
    }
  }
}

impl IsolationState {
  /// Wire encoding: isolate enable writes 1, disable writes 0
  pub fn raw(self) -> u32 {
    match self {
      IsolationState::Isolated => 1,
      IsolationState::Connected => 0,
    }
  }
}

impl ResetState {
  /// Wire encoding: assert writes 1, release writes 0
  pub fn raw(self) -> u32 {
    match self {
      ResetState::Asserted => 1,
      ResetState::Released => 0,
    }
  }
}

// Safety-island boot registers, relative to the island peripheral base
pub const SAFETY_BOOTMODE_OFFSET: u64 = 0x1070;
pub const SAFETY_BOOTADDR_OFFSET: u64 = 0x1080;
pub const SAFETY_FETCHEN_OFFSET: u64 = 0x1090;
pub const SAFETY_CORESTATUS_OFFSET: u64 = 0x10a0;

/// Core-status bit 31 signals completion
pub const CORESTATUS_DONE: u32 = 0x8000_0000;

/// Core-status bits 0..=30 carry the exit code
pub const CORESTATUS_CODE_MASK: u32 = 0x7fff_ffff;
