//! # switchboard-adapter-virtual
//!
//! Simulated endpoints used by the daemon's scripted scenario and by tests.
//!
//! ## Provided endpoints
//!
//! | Kind | Type | Behaviour |
//! |------|------|-----------|
//! | `light` | [`VirtualLight`] | Logs `"<name> Light is ON/OFF"`; logs received events |
//! | `fan` | [`VirtualFan`] | Logs `"<name> Fan is ON/OFF"`; logs received events |
//!
//! Both are wrapped by [`VirtualDevice`], which implements the `Device` and
//! `Observer` capability traits, so one `Arc<VirtualDevice>` can be
//! registered as a device and subscribed as an observer.
//!
//! ## Dependency rule
//!
//! Depends on `switchboard-domain` only.

mod devices;

pub use devices::{DeviceKind, VirtualDevice, VirtualFan, VirtualLight};
