//! Data models for request lists.
//!
//! Records and projects are owned by the external store; lists keep copies
//! of them for display.

pub mod mode;
pub mod project;
pub mod request;

pub use mode::{ListDensity, ListMode, StoreKind};
pub use project::Project;
pub use request::{RequestRecord, DESIGN_DOC_PREFIX};
