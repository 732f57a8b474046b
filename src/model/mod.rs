pub mod mem;
pub mod soc;

pub use mem::{Access, SparseMem};
pub use soc::SocModel;
