//! # switchboard-app
//!
//! Application layer — the process-wide registries and their dispatch
//! operations.
//!
//! ## Responsibilities
//! - [`DeviceRegistry`](device_registry::DeviceRegistry) — device handles by id and key
//! - [`CommandPool`](command_pool::CommandPool) — one command per `(device, action)` pair
//! - [`Invoker`](invoker::Invoker) — named slots bound to commands, triggered by name
//! - [`EventMediator`](mediator::EventMediator) — ordered observer lists per event type
//! - [`Switchboard`](switchboard::Switchboard) — owns one of each and is passed to callers
//!
//! ## Locking discipline
//! Each registry guards its map with a single lock that is held only while
//! the map is read or mutated. Device and observer callbacks always run
//! after the lock is released, so they may call back into any registry.
//!
//! ## Dependency rule
//! Depends on `switchboard-domain` only. Never imports adapter crates.

pub mod command_pool;
pub mod device_registry;
pub mod invoker;
pub mod mediator;
pub mod switchboard;
