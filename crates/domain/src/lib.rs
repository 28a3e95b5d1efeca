//! # switchboard-domain
//!
//! Pure domain model for the switchboard command/event dispatch core.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error taxonomy, timestamps
//! - Define the **capability contracts**: [`Device`](device::Device)
//!   (`turn_on` / `turn_off`) and [`Observer`](observer::Observer) (`update`)
//! - Define **Commands** (a device action bound to one device, invocable via `execute`)
//! - Define **Events** (typed notifications fanned out by the mediator)
//! - Define the **soft outcomes** reported by dispatch operations
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! Registries and their locking discipline live in the `app` crate.

pub mod error;
pub mod id;
pub mod time;

pub mod action;
pub mod command;
pub mod device;
pub mod event;
pub mod observer;
pub mod outcome;
