#![forbid(unsafe_code)]

//! Modal overlay orchestration over a pluggable view factory.
//!
//! `veil` dynamically mounts caller-registered view components inside a
//! modal overlay, manages a LIFO stack of concurrently open modals,
//! mirrors caller-supplied animation declarations onto the overlay and
//! dialog surface, and returns the user's result through a single-fire
//! completion channel.
//!
//! The library owns no element tree. The embedding supplies a
//! [`ViewFactory`] for component lifecycle, drains [`SceneEffect`]
//! commands each tick to drive its real elements, and feeds
//! animation-completion signals back in.
//!
//! ```ignore
//! let mut modals = ModalService::new(Box::new(factory));
//!
//! let completion = modals.open(
//!     ViewType("profile-form"),
//!     Some(
//!         ModalOptions::new()
//!             .modal(SurfaceOptions::default().leave("fade-out 0.5s"))
//!             .data(ViewProps::new().with("username", "ada")),
//!     ),
//! )?;
//! completion.on_close(|response| {
//!     // response.data carries whatever close() forwarded.
//! });
//! ```

pub mod host;
pub mod service;

pub use host::{HostEffect, HostPart, HostPhase, ModalHost, OverlayStyle, SurfaceStyle};
pub use service::{HOST_VIEW, InstanceId, ModalService, SceneEffect};

pub use veil_core::completion::{Completion, CompletionResolver, ModalResponse};
pub use veil_core::options::{
    ActionOptions, ModalOptions, OverlayOptions, SizeOptions, SurfaceOptions,
};
pub use veil_core::view::{ViewError, ViewFactory, ViewHandle, ViewProps, ViewType};
