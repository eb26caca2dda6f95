//! Domain types shared by every gatepass crate.
//!
//! - [`types`]: id and timestamp aliases.
//! - [`error`]: the domain error taxonomy.
//! - [`status`]: visit status values and the transition guard.
//! - [`registration`]: validation of visitor registration input.

pub mod error;
pub mod registration;
pub mod status;
pub mod types;
