use crate::regmap::ResetDomain;
use thiserror::Error;

/// Domain a fault is attributed to when reporting upward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultDomain {
  Host,
  SafetyIsland,
  SecurityIsland,
  IntCluster,
  FpCluster,
  Periph,
  L2,
}

impl FaultDomain {
  /// Flat numeric code for an execution failure in this domain
  pub fn exec_code(self) -> u32 {
    match self {
      FaultDomain::Host => 1,
      FaultDomain::SafetyIsland => 2,
      FaultDomain::IntCluster => 3,
      FaultDomain::FpCluster => 4,
      FaultDomain::Periph => 5,
      FaultDomain::SecurityIsland => 11,
      FaultDomain::L2 => 12,
    }
  }

  /// Flat numeric code for an access failure in this domain
  pub fn access_code(self) -> u32 {
    match self {
      FaultDomain::Host => 6,
      FaultDomain::SafetyIsland => 7,
      FaultDomain::IntCluster => 8,
      FaultDomain::FpCluster => 9,
      FaultDomain::Periph => 10,
      FaultDomain::SecurityIsland => 13,
      FaultDomain::L2 => 14,
    }
  }
}

impl From<ResetDomain> for FaultDomain {
  fn from(d: ResetDomain) -> Self {
    match d {
      ResetDomain::Periph => FaultDomain::Periph,
      ResetDomain::SafetyIsland => FaultDomain::SafetyIsland,
      ResetDomain::SecurityIsland => FaultDomain::SecurityIsland,
      ResetDomain::IntCluster => FaultDomain::IntCluster,
      ResetDomain::FpCluster => FaultDomain::FpCluster,
      ResetDomain::L2 => FaultDomain::L2,
    }
  }
}

/// Bring-up error taxonomy
///
/// Execution errors carry the non-zero completion code reported by the
/// target domain's own firmware. Access errors mean the hardware never
/// acknowledged an access-control change within the configured poll bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
  #[error("access not acknowledged by {0:?} domain")]
  Access(FaultDomain),

  #[error("execution failed in {domain:?} domain (status {code:#x})")]
  Execution { domain: FaultDomain, code: u32 },

  #[error("poll bound of {polls} iterations exhausted")]
  Timeout { polls: u32 },

  #[error("host clock domain has no control registers")]
  NoClockControl,
}

impl Error {
  /// Numeric code surfaced to callers that report faults by number
  pub fn code(&self) -> u32 {
    match self {
      Error::Access(d) => d.access_code(),
      Error::Execution { domain, .. } => domain.exec_code(),
      // codes past the per-domain taxonomy
      Error::Timeout { .. } => 15,
      Error::NoClockControl => 16,
    }
  }
}

pub type Result<T> = std::result::Result<T, Error>;
