/// Behavioural model of the SoC-control block and safety island.
///
/// Wraps `SparseMem` and adds the two pieces of register behaviour the
/// sequencer and boot protocol rely on: isolation-control writes are
/// mirrored into the matching status register (the acknowledgement the
/// sequencer polls for), and a fetch-enable write completes the
/// emulated island by setting core-status bit 31 plus a programmable
/// exit code. Acknowledgement can be suppressed per domain to exercise
/// the access-error path.
use crate::model::mem::{Access, SparseMem};
use crate::port::MemPort;
use crate::regmap::{
  ResetDomain, CORESTATUS_DONE, RESET_DOMAINS, SAFETY_CORESTATUS_OFFSET, SAFETY_FETCHEN_OFFSET,
};

pub struct SocModel {
  mem: SparseMem,
  soc_ctrl_base: u64,
  safety_base: u64,
  safety_exit_code: u32,
  no_ack: Vec<ResetDomain>,
}

impl SocModel {
  pub fn new(soc_ctrl_base: u64, safety_base: u64) -> Self {
    Self {
      mem: SparseMem::new(),
      soc_ctrl_base,
      safety_base,
      safety_exit_code: 0,
      no_ack: Vec::new(),
    }
  }

  /// Exit code the emulated island reports on completion
  pub fn set_safety_exit_code(&mut self, code: u32) {
    self.safety_exit_code = code;
  }

  /// Stop acknowledging isolation changes for one domain
  pub fn suppress_isolation_ack(&mut self, domain: ResetDomain) {
    self.no_ack.push(domain);
  }

  pub fn mem(&self) -> &SparseMem {
    &self.mem
  }

  pub fn mem_mut(&mut self) -> &mut SparseMem {
    &mut self.mem
  }

  pub fn take_trace(&mut self) -> Vec<Access> {
    self.mem.take_trace()
  }

  fn isolation_target(&self, addr: u64) -> Option<ResetDomain> {
    RESET_DOMAINS
      .into_iter()
      .find(|d| addr == self.soc_ctrl_base + d.isolate_offset())
  }
}

impl MemPort for SocModel {
  fn read_u32(&mut self, addr: u64) -> u32 {
    self.mem.read_u32(addr)
  }

  fn write_u32(&mut self, addr: u64, val: u32) {
    self.mem.write_u32(addr, val);

    if let Some(domain) = self.isolation_target(addr) {
      if !self.no_ack.contains(&domain) {
        let status = self.soc_ctrl_base + domain.isolate_status_offset();
        self.mem.poke_u32(status, val);
      }
      return;
    }

    if addr == self.safety_base + SAFETY_FETCHEN_OFFSET && val != 0 {
      // emulated island runs to completion instantly
      let status = CORESTATUS_DONE | self.safety_exit_code;
      self
        .mem
        .poke_u32(self.safety_base + SAFETY_CORESTATUS_OFFSET, status);
    }
  }

  fn read_u64(&mut self, addr: u64) -> u64 {
    self.mem.read_u64(addr)
  }

  fn write_u64(&mut self, addr: u64, val: u64) {
    self.mem.write_u64(addr, val);
  }

  fn fence(&mut self) {
    self.mem.fence();
  }
}
