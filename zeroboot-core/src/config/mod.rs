//! Configuration types
//!
//! Board selectors as authored, plus the policy knobs that decide how
//! borderline selector combinations are treated.

pub mod policy;
pub mod selectors;

pub use policy::*;
pub use selectors::*;
