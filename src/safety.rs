/// Safety-island boot protocol
///
/// The island is a satellite core launched through a boot-address /
/// fetch-enable handshake and polled for completion via its core-status
/// register. Entered only after the safety domain has been through a
/// full reset cycle. All writes hit live hardware state and there is no
/// rollback: a failed handshake leaves the island wherever its firmware
/// stopped, and the caller must reset the domain again before retrying.
use crate::error::{Error, FaultDomain, Result};
use crate::port::MemPort;
use crate::regmap::{
  CORESTATUS_CODE_MASK, CORESTATUS_DONE, SAFETY_BOOTADDR_OFFSET, SAFETY_BOOTMODE_OFFSET,
  SAFETY_CORESTATUS_OFFSET, SAFETY_FETCHEN_OFFSET,
};

/// Copies an executable image into the island memory before the
/// handshake begins. External collaborator; completion is a
/// precondition of `offload_blocking`, not part of the protocol.
pub trait PayloadLoader<P: MemPort> {
  fn load(&mut self, port: &mut P, island_base: u64) -> Result<()>;
}

/// Loader for payloads already resident in island memory
pub struct PreloadedPayload;

impl<P: MemPort> PayloadLoader<P> for PreloadedPayload {
  fn load(&mut self, _port: &mut P, _island_base: u64) -> Result<()> {
    Ok(())
  }
}

#[derive(Debug, Clone, Copy)]
pub struct IslandConfig {
  /// Physical entry point written to the boot-address register
  pub entry_point: u64,
  /// Boot-mode selector; 1 boots from the configured address
  pub boot_mode: u32,
  /// Max core-status reads before giving up on completion
  pub status_poll_max: u32,
}

impl IslandConfig {
  pub fn new(entry_point: u64) -> Self {
    Self {
      entry_point,
      boot_mode: 1,
      status_poll_max: 100_000,
    }
  }
}

/// Boot handshake driver for the safety island
pub struct SafetyIsland<'a, P: MemPort> {
  port: &'a mut P,
  base: u64,
  config: IslandConfig,
}

impl<'a, P: MemPort> SafetyIsland<'a, P> {
  pub fn new(port: &'a mut P, island_base: u64, config: IslandConfig) -> Self {
    Self {
      port,
      base: island_base,
      config,
    }
  }

  /// Configure boot mode and entry point, then assert fetch enable.
  /// The island core starts executing as soon as the last write lands.
  pub fn prepare_boot(&mut self) {
    log::info!(
      "safety island: boot mode {}, entry point {:#x}",
      self.config.boot_mode,
      self.config.entry_point
    );
    self
      .port
      .write_u32(self.base + SAFETY_BOOTMODE_OFFSET, self.config.boot_mode);
    self
      .port
      .write_u64(self.base + SAFETY_BOOTADDR_OFFSET, self.config.entry_point);
    self.port.fence();
    self.port.write_u32(self.base + SAFETY_FETCHEN_OFFSET, 1);
  }

  /// Poll the core-status register until bit 31 reports completion.
  /// Returns the raw status word; exhaustion of the poll bound is a
  /// timeout since the island may simply still be running.
  pub fn poll_core_status(&mut self) -> Result<u32> {
    let addr = self.base + SAFETY_CORESTATUS_OFFSET;
    for _ in 0..self.config.status_poll_max {
      let status = self.port.read_u32(addr);
      if status & CORESTATUS_DONE != 0 {
        return Ok(status);
      }
    }
    Err(Error::Timeout {
      polls: self.config.status_poll_max,
    })
  }

  /// Blocking offload: payload load, boot configuration, fetch enable,
  /// completion poll, outcome decode, as one call.
  pub fn offload_blocking<L: PayloadLoader<P>>(&mut self, loader: &mut L) -> Result<()> {
    loader.load(self.port, self.base)?;
    self.prepare_boot();
    let status = self.poll_core_status()?;
    decode_status(status)
  }
}

/// Decode the outcome bits of a completed status word: zero is success,
/// anything else is the island firmware's own error code
pub fn decode_status(status: u32) -> Result<()> {
  let code = status & CORESTATUS_CODE_MASK;
  if code == 0 {
    Ok(())
  } else {
    Err(Error::Execution {
      domain: FaultDomain::SafetyIsland,
      code,
    })
  }
}
