use crate::error::Result;

/// Validate the invariants of a geometric entity.
///
/// Hot-path operations never check their preconditions; call this at the
/// boundary where data enters the kernel.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
