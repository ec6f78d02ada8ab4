#![forbid(unsafe_code)]

//! Core: input vocabulary, direction handling, and host ports.
//!
//! # Role in colgrip
//! `colgrip-core` is the input layer. It owns the pointer and keyboard types
//! the resize engine consumes, document-direction mirroring, the per-frame
//! paint coalescer, and the input-capture port hosts implement.
//!
//! # How it fits in the system
//! `colgrip-layout` builds the width store, constraint engine, and session
//! machine on these types. `colgrip-widgets` wires them to a host through
//! the ports defined here and in its own `host`/`render` modules.

pub mod capture;
pub mod direction;
pub mod event;
pub mod frame_coalescer;
