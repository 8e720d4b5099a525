//! Modules that declare requirements.
//!
//! Reloading a store means clearing it and asking every active module to
//! declare its requirements again. Anything implementing [`Declare`] can
//! take part: YAML-configured modules, flat manifests, or code.

use crate::error::Result;
use crate::requirements::store::RequirementStore;

/// A source of requirement declarations.
pub trait Declare {
    /// Name recorded as the origin of every declaration.
    fn origin(&self) -> &str;

    /// Record this module's requirements in `store`.
    fn declare(&self, store: &mut RequirementStore) -> Result<()>;
}

/// A module whose declarations come from a function.
///
/// # Example
///
/// ```
/// use buildreq::{ModuleFn, RequirementStore};
///
/// let viewer = ModuleFn::new("viewer", |store: &mut RequirementStore, origin: &str| {
///     store.require("nodejs", Some("typescript"), Some("3.1"), false, origin)
/// });
///
/// let mut store = RequirementStore::new();
/// store.reload(&[&viewer]).unwrap();
/// assert!(store.contains("nodejs", "typescript"));
/// ```
pub struct ModuleFn<F> {
    origin: String,
    declare: F,
}

impl<F> ModuleFn<F>
where
    F: Fn(&mut RequirementStore, &str) -> Result<()>,
{
    /// Wrap a declaration function under an origin name.
    pub fn new(origin: impl Into<String>, declare: F) -> Self {
        Self {
            origin: origin.into(),
            declare,
        }
    }
}

impl<F> Declare for ModuleFn<F>
where
    F: Fn(&mut RequirementStore, &str) -> Result<()>,
{
    fn origin(&self) -> &str {
        &self.origin
    }

    fn declare(&self, store: &mut RequirementStore) -> Result<()> {
        (self.declare)(store, &self.origin)
    }
}
