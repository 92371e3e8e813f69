#![forbid(unsafe_code)]

//! Configuration value object for opening a modal.
//!
//! All fields are optional; defaults are resolved by the modal host at
//! construction time, not here. Animation values are opaque CSS-style
//! animation shorthand strings (`"fade-out 0.3s ease-in"`): this library
//! never parses them, it only mirrors them onto elements and waits for the
//! embedding's completion signal.
//!
//! Options are immutable once passed to `open`: the host captures what it
//! needs (notably the leave animations) at open time and never re-reads
//! them.

use serde::{Deserialize, Serialize};

use crate::view::ViewProps;

/// Default surface padding when `size.padding` is unset.
pub const DEFAULT_PADDING: &str = "0.5rem";

/// Default `top`/`left` when unset. Centering relies on the caller's own
/// transform styling, as in the classic 50%/50% + translate idiom.
pub const DEFAULT_POSITION: &str = "50%";

/// Options for the dialog surface element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceOptions {
    /// Enter animation declaration. Unset means no animation plays.
    pub enter: Option<String>,
    /// Leave animation declaration, captured once at open time.
    pub leave: Option<String>,
    /// CSS position string for `top`. Defaults to [`DEFAULT_POSITION`].
    pub top: Option<String>,
    /// CSS position string for `left`. Defaults to [`DEFAULT_POSITION`].
    pub left: Option<String>,
}

impl SurfaceOptions {
    /// Set the enter animation.
    pub fn enter(mut self, animation: impl Into<String>) -> Self {
        self.enter = Some(animation.into());
        self
    }

    /// Set the leave animation.
    pub fn leave(mut self, animation: impl Into<String>) -> Self {
        self.leave = Some(animation.into());
        self
    }

    /// Set the `top` position.
    pub fn top(mut self, top: impl Into<String>) -> Self {
        self.top = Some(top.into());
        self
    }

    /// Set the `left` position.
    pub fn left(mut self, left: impl Into<String>) -> Self {
        self.left = Some(left.into());
        self
    }
}

/// Options for the overlay (backdrop) element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayOptions {
    /// Enter animation declaration. Unset means no animation plays.
    pub enter: Option<String>,
    /// Leave animation declaration, captured once at open time.
    pub leave: Option<String>,
    /// Backdrop background color.
    pub background_color: Option<String>,
}

impl OverlayOptions {
    /// Set the enter animation.
    pub fn enter(mut self, animation: impl Into<String>) -> Self {
        self.enter = Some(animation.into());
        self
    }

    /// Set the leave animation.
    pub fn leave(mut self, animation: impl Into<String>) -> Self {
        self.leave = Some(animation.into());
        self
    }

    /// Set the backdrop background color.
    pub fn background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }
}

/// Size constraints for the dialog surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeOptions {
    pub width: Option<String>,
    pub max_width: Option<String>,
    pub height: Option<String>,
    pub max_height: Option<String>,
    /// Surface padding. Defaults to [`DEFAULT_PADDING`].
    pub padding: Option<String>,
}

impl SizeOptions {
    /// Set the width.
    pub fn width(mut self, value: impl Into<String>) -> Self {
        self.width = Some(value.into());
        self
    }

    /// Set the maximum width.
    pub fn max_width(mut self, value: impl Into<String>) -> Self {
        self.max_width = Some(value.into());
        self
    }

    /// Set the height.
    pub fn height(mut self, value: impl Into<String>) -> Self {
        self.height = Some(value.into());
        self
    }

    /// Set the maximum height.
    pub fn max_height(mut self, value: impl Into<String>) -> Self {
        self.max_height = Some(value.into());
        self
    }

    /// Set the padding.
    pub fn padding(mut self, value: impl Into<String>) -> Self {
        self.padding = Some(value.into());
        self
    }
}

/// Dismissal triggers. Both default to enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOptions {
    /// Close the topmost modal on the Escape key.
    pub escape: bool,
    /// Close the modal when its backdrop is clicked.
    pub click: bool,
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self {
            escape: true,
            click: true,
        }
    }
}

impl ActionOptions {
    /// Set whether Escape dismisses the modal.
    pub fn escape(mut self, enabled: bool) -> Self {
        self.escape = enabled;
        self
    }

    /// Set whether a backdrop click dismisses the modal.
    pub fn click(mut self, enabled: bool) -> Self {
        self.click = enabled;
        self
    }
}

/// Full configuration for one `open` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModalOptions {
    /// Dialog surface options.
    pub modal: SurfaceOptions,
    /// Overlay (backdrop) options.
    pub overlay: OverlayOptions,
    /// Surface size constraints.
    pub size: SizeOptions,
    /// Dismissal triggers.
    pub actions: ActionOptions,
    /// Props injected into the content view at instantiation time.
    pub data: ViewProps,
}

impl ModalOptions {
    /// Create default options (no animations, centered, dismissable).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the surface options.
    pub fn modal(mut self, modal: SurfaceOptions) -> Self {
        self.modal = modal;
        self
    }

    /// Set the overlay options.
    pub fn overlay(mut self, overlay: OverlayOptions) -> Self {
        self.overlay = overlay;
        self
    }

    /// Set the size options.
    pub fn size(mut self, size: SizeOptions) -> Self {
        self.size = size;
        self
    }

    /// Set the dismissal triggers.
    pub fn actions(mut self, actions: ActionOptions) -> Self {
        self.actions = actions;
        self
    }

    /// Set the content-view props.
    pub fn data(mut self, data: ViewProps) -> Self {
        self.data = data;
        self
    }
}
