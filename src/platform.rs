/// Platform address map
///
/// Per-deployment base addresses for the SoC-control block, the safety
/// island and the probeable memory regions, loaded from a TOML file. A
/// zero or absent base address means "not present on this board"; the
/// harness skips such targets instead of failing them.
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SocCtrlSection {
  #[serde(default)]
  pub base: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SafetyIslandSection {
  #[serde(default)]
  pub base: u64,
  #[serde(default)]
  pub entry_point: u64,
}

/// One probeable memory region, `base..end`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Region {
  pub name: String,
  #[serde(default)]
  pub base: u64,
  #[serde(default)]
  pub end: u64,
}

impl Region {
  pub fn present(&self) -> bool {
    self.base != 0
  }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlatformConfig {
  #[serde(default)]
  pub soc_ctrl: SocCtrlSection,
  #[serde(default)]
  pub safety_island: SafetyIslandSection,
  #[serde(default, rename = "region")]
  pub regions: Vec<Region>,
}

impl PlatformConfig {
  /// Load and validate a platform description from a TOML file
  pub fn load(path: &Path) -> io::Result<Self> {
    let content = fs::read_to_string(path).map_err(|e| {
      io::Error::new(
        io::ErrorKind::NotFound,
        format!("cannot read platform file {:?}: {}", path, e),
      )
    })?;
    let config: PlatformConfig = toml::from_str(&content)
      .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("platform TOML: {}", e)))?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> io::Result<()> {
    for region in &self.regions {
      if region.present() && region.end < region.base {
        return Err(io::Error::new(
          io::ErrorKind::InvalidData,
          format!(
            "region '{}' is inverted ({:#x}..{:#x})",
            region.name, region.base, region.end
          ),
        ));
      }
    }
    if self.safety_island.base != 0 && self.safety_island.entry_point == 0 {
      return Err(io::Error::new(
        io::ErrorKind::InvalidData,
        "safety island present but entry_point is zero",
      ));
    }
    Ok(())
  }

  pub fn safety_present(&self) -> bool {
    self.safety_island.base != 0
  }

  /// Regions that exist on this board
  pub fn present_regions(&self) -> impl Iterator<Item = &Region> {
    self.regions.iter().filter(|r| r.present())
  }

  /// Address map matching the built-in behavioural model, used by the
  /// CLI self-check when no platform file is given
  pub fn demo() -> Self {
    Self {
      soc_ctrl: SocCtrlSection { base: 0x0200_0000 },
      safety_island: SafetyIslandSection {
        base: 0x6000_0000,
        entry_point: 0x6001_0080,
      },
      regions: vec![
        Region {
          name: "l2_port1_interleaved".to_string(),
          base: 0x7800_0000,
          end: 0x7810_0000,
        },
        Region {
          name: "l2_port1_contiguous".to_string(),
          base: 0x7810_0000,
          end: 0x7820_0000,
        },
        Region {
          name: "safety_island_spm".to_string(),
          base: 0x6001_0000,
          end: 0x6005_0000,
        },
        Region {
          name: "int_cluster_spm".to_string(),
          base: 0x5000_0000,
          end: 0x5004_0000,
        },
        // not present on the demo board, exercises the skip path
        Region {
          name: "fp_cluster_spm".to_string(),
          base: 0,
          end: 0,
        },
      ],
    }
  }
}
