#![forbid(unsafe_code)]

//! Core types for the veil modal library.
//!
//! This crate is the leaf of the workspace: it defines the configuration
//! value object passed to `open` ([`ModalOptions`]), the capability
//! interface that abstracts the host UI framework's view machinery
//! ([`ViewFactory`]), and the single-fire completion channel through which
//! a modal's result travels back to the caller ([`Completion`]).
//!
//! Nothing in here touches an element tree; the orchestration logic lives
//! in the `veil` crate.

pub mod completion;
pub mod options;
pub mod view;

pub use completion::{Completion, CompletionResolver, ModalResponse, channel};
pub use options::{ActionOptions, ModalOptions, OverlayOptions, SizeOptions, SurfaceOptions};
pub use view::{ViewError, ViewFactory, ViewHandle, ViewProps, ViewType};
