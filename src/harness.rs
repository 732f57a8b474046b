/// Bring-up harness tying the platform map, the domain sequencer and
/// the probe engine together over one memory port.
use crate::error::Result;
use crate::platform::PlatformConfig;
use crate::port::MemPort;
use crate::probe::{self, ProbeError, Strategy};
use crate::regmap::ResetDomain;
use crate::safety::{IslandConfig, PayloadLoader, SafetyIsland};
use crate::soc_ctrl::{Sequencer, SequencerConfig};
use serde::Serialize;

/// Per-region probe outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
  Passed,
  /// Region not present on this board
  Skipped,
  Mismatch { index: u64, addr: u64 },
  RangeInvalid,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionReport {
  pub name: String,
  pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
  pub strategy: String,
  pub samples: i64,
  pub regions: Vec<RegionReport>,
}

impl ProbeReport {
  pub fn all_passed(&self) -> bool {
    self
      .regions
      .iter()
      .all(|r| matches!(r.outcome, Outcome::Passed | Outcome::Skipped))
  }
}

fn outcome_of(result: std::result::Result<(), ProbeError>) -> Outcome {
  match result {
    Ok(()) => Outcome::Passed,
    Err(ProbeError::Mismatch { index, addr, .. }) => Outcome::Mismatch { index, addr },
    Err(ProbeError::RangeInvalid { .. }) => Outcome::RangeInvalid,
  }
}

pub struct Harness<P: MemPort> {
  port: P,
  platform: PlatformConfig,
  seq_config: SequencerConfig,
}

impl<P: MemPort> Harness<P> {
  pub fn new(port: P, platform: PlatformConfig) -> Self {
    Self {
      port,
      platform,
      seq_config: SequencerConfig::default(),
    }
  }

  pub fn with_sequencer_config(mut self, config: SequencerConfig) -> Self {
    self.seq_config = config;
    self
  }

  pub fn platform(&self) -> &PlatformConfig {
    &self.platform
  }

  pub fn port_mut(&mut self) -> &mut P {
    &mut self.port
  }

  pub fn into_port(self) -> P {
    self.port
  }

  /// Probe every present region with the given strategy; absent regions
  /// are reported as skipped
  pub fn probe_all(&mut self, strategy: Strategy, samples: i64) -> ProbeReport {
    self.run_probes(format!("{:?}", strategy), samples, |port, from, to, n| {
      probe::probe_range(port, from, to, n, strategy)
    })
  }

  /// Quick fixed-pattern pass over every present region
  pub fn smoke_all(&mut self, samples: i64) -> ProbeReport {
    self.run_probes("DirectSmoke".to_string(), samples, probe::probe_range_direct)
  }

  fn run_probes<F>(&mut self, strategy: String, samples: i64, mut probe_fn: F) -> ProbeReport
  where
    F: FnMut(&mut P, u64, u64, i64) -> std::result::Result<(), ProbeError>,
  {
    let mut regions = Vec::new();
    for region in &self.platform.regions {
      let outcome = if region.present() {
        let result = probe_fn(&mut self.port, region.base, region.end, samples);
        if let Err(ref e) = result {
          log::error!("{}: {}", region.name, e);
        } else {
          log::info!("{}: passed", region.name);
        }
        outcome_of(result)
      } else {
        log::info!("{}: not present, skipping", region.name);
        Outcome::Skipped
      };
      regions.push(RegionReport {
        name: region.name.clone(),
        outcome,
      });
    }
    ProbeReport {
      strategy,
      samples,
      regions,
    }
  }

  /// Reset the safety domain, then run the blocking offload. Returns
  /// `Ok(false)` without touching the hardware when the island is not
  /// present on this board.
  pub fn bringup_safety<L: PayloadLoader<P>>(&mut self, loader: &mut L) -> Result<bool> {
    if !self.platform.safety_present() {
      log::info!("safety island not present, skipping offload");
      return Ok(false);
    }

    let mut sequencer =
      Sequencer::with_config(&mut self.port, self.platform.soc_ctrl.base, self.seq_config);
    sequencer.reset_domain(ResetDomain::SafetyIsland)?;

    let config = IslandConfig::new(self.platform.safety_island.entry_point);
    let mut island = SafetyIsland::new(&mut self.port, self.platform.safety_island.base, config);
    island.offload_blocking(loader)?;
    Ok(true)
  }
}
