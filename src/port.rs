/// Raw memory port abstraction
///
/// Every subsystem talks to the hardware through this trait only, so tests
/// and the CLI self-check can substitute an in-memory register file.
pub trait MemPort {
  /// 32-bit register read
  fn read_u32(&mut self, addr: u64) -> u32;

  /// 32-bit register write
  fn write_u32(&mut self, addr: u64, val: u32);

  /// 64-bit data read
  fn read_u64(&mut self, addr: u64) -> u64;

  /// 64-bit data write
  fn write_u64(&mut self, addr: u64, val: u64);

  /// Memory-ordering barrier between prior writes and subsequent accesses
  fn fence(&mut self);
}
