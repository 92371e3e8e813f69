#![forbid(unsafe_code)]

//! Per-instance modal host state machine.
//!
//! One [`ModalHost`] represents one on-screen modal: the overlay element
//! behind it and the dialog surface in front. The host owns no real
//! elements; it emits [`HostEffect`] commands that the embedding applies
//! to its element tree, and it consumes animation-completion signals fed
//! back through the orchestrator.
//!
//! Lifecycle: `Opening -> Open -> Closing -> Disposed`. The opening work
//! (style resolution, z-index assignment, enter animations, capture of the
//! leave animations) happens while building the opening effect batch, so a
//! freshly constructed host is already `Open`.
//!
//! # Invariants
//!
//! - The leave animations are captured once, at open time; later mutation
//!   of the caller's options cannot affect an open modal.
//! - `Closing -> Disposed` happens exactly once, regardless of the order
//!   in which the two animation-completion signals arrive, and also when
//!   both parts close on the same synchronous path.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `begin_close` twice | Orchestrator bug | Second call is a no-op |
//! | Signal for an already-removed part | Duplicate `animationend` | Ignored |
//! | Animation never completes | Malformed declaration | Disposal stalls forever (caller error, not defended) |

use veil_core::options::{DEFAULT_PADDING, DEFAULT_POSITION, ModalOptions};

/// Z-index units reserved per element; each stacking level holds an
/// overlay and a surface, so one level spans twice this.
const Z_UNIT: u32 = 1000;

/// Lifecycle phase of a modal host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPhase {
    /// Styles are being resolved; transient, never observed externally.
    Opening,
    /// On screen, listening for dismissal triggers.
    Open,
    /// Leave animations assigned; waiting for completion signals.
    Closing,
    /// Both elements removed; the content view may be released.
    Disposed,
}

/// The two elements a host manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPart {
    /// The backdrop behind the dialog.
    Overlay,
    /// The dialog surface itself.
    Surface,
}

/// Resolved styles for the dialog surface, defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceStyle {
    pub width: Option<String>,
    pub max_width: Option<String>,
    pub height: Option<String>,
    pub max_height: Option<String>,
    pub padding: String,
    pub top: String,
    pub left: String,
    pub z_index: u32,
    /// Enter animation declaration; empty means none plays.
    pub animation: String,
}

/// Resolved styles for the overlay, defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayStyle {
    pub background_color: Option<String>,
    pub z_index: u32,
    /// Enter animation declaration; empty means none plays.
    pub animation: String,
}

/// Command for the embedding's element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEffect {
    /// Apply the resolved opening styles to both elements.
    ApplyStyles {
        surface: SurfaceStyle,
        overlay: OverlayStyle,
    },
    /// Assign an animation declaration to one element. An empty string
    /// clears it; a non-empty string plays and the embedding must report
    /// its completion back via `ModalService::animation_ended`.
    SetAnimation { part: HostPart, animation: String },
    /// Remove one element's node.
    RemovePart(HostPart),
    /// Remove the host's whole remaining subtree.
    RemoveRoot,
}

/// State machine for one open modal.
#[derive(Debug)]
pub struct ModalHost {
    phase: HostPhase,
    /// Stacking level captured at open time, for escape scoping.
    layer: u32,
    escape_enabled: bool,
    click_enabled: bool,
    /// Leave animations, captured once at open time.
    surface_leave: String,
    overlay_leave: String,
    surface_closed: bool,
    overlay_closed: bool,
}

impl ModalHost {
    /// Build a host from options, producing the opening effect batch.
    ///
    /// `layer` is the instance's captured stacking level (1-based) and
    /// `depth` the stack depth at creation, which determines the z-index
    /// pair: each level consumes two z units, so the overlay sits at
    /// `2000*depth - 1000` and the surface at `2000*depth`, strictly above
    /// every element of the level below.
    pub fn open(options: &ModalOptions, layer: u32, depth: u32) -> (Self, Vec<HostEffect>) {
        debug_assert!(depth >= 1, "depth is 1-based");
        let mut host = Self {
            phase: HostPhase::Opening,
            layer,
            escape_enabled: options.actions.escape,
            click_enabled: options.actions.click,
            surface_leave: options.modal.leave.clone().unwrap_or_default(),
            overlay_leave: options.overlay.leave.clone().unwrap_or_default(),
            surface_closed: false,
            overlay_closed: false,
        };

        let overlay_z = 2 * Z_UNIT * depth - Z_UNIT;
        let surface_z = 2 * Z_UNIT * depth;

        let surface = SurfaceStyle {
            width: options.size.width.clone(),
            max_width: options.size.max_width.clone(),
            height: options.size.height.clone(),
            max_height: options.size.max_height.clone(),
            padding: options
                .size
                .padding
                .clone()
                .unwrap_or_else(|| DEFAULT_PADDING.to_string()),
            top: options
                .modal
                .top
                .clone()
                .unwrap_or_else(|| DEFAULT_POSITION.to_string()),
            left: options
                .modal
                .left
                .clone()
                .unwrap_or_else(|| DEFAULT_POSITION.to_string()),
            z_index: surface_z,
            animation: options.modal.enter.clone().unwrap_or_default(),
        };
        let overlay = OverlayStyle {
            background_color: options.overlay.background_color.clone(),
            z_index: overlay_z,
            animation: options.overlay.enter.clone().unwrap_or_default(),
        };

        host.phase = HostPhase::Open;
        tracing::trace!(layer, depth, "modal host open");
        (host, vec![HostEffect::ApplyStyles { surface, overlay }])
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> HostPhase {
        self.phase
    }

    /// The stacking level captured at open time.
    pub fn layer(&self) -> u32 {
        self.layer
    }

    /// Whether this host has fully removed its elements.
    pub fn is_disposed(&self) -> bool {
        self.phase == HostPhase::Disposed
    }

    /// Whether this host reacts to an Escape press right now.
    ///
    /// With several modals open, every host observes the keypress; only
    /// the one whose captured layer equals the current global layer (the
    /// topmost) reacts, and only if its escape action is enabled.
    pub fn handles_escape(&self, current_layer: u32) -> bool {
        self.escape_enabled && self.phase == HostPhase::Open && self.layer == current_layer
    }

    /// Whether a backdrop click may dismiss this host right now.
    pub fn handles_backdrop_click(&self) -> bool {
        self.click_enabled && self.phase == HostPhase::Open
    }

    /// Start the close sequence, assigning the captured leave animations.
    ///
    /// Three mutually exclusive cases, evaluated in order:
    /// 1. neither element animated: the whole subtree is removed and the
    ///    host reaches `Disposed` synchronously;
    /// 2. exactly one un-animated: its node is removed now, the other
    ///    awaits its completion signal;
    /// 3. both animated: nothing is removed until the signals arrive.
    pub fn begin_close(&mut self) -> Vec<HostEffect> {
        if self.phase != HostPhase::Open {
            tracing::debug!(phase = ?self.phase, "begin_close ignored");
            return Vec::new();
        }
        self.phase = HostPhase::Closing;

        let mut effects = vec![
            HostEffect::SetAnimation {
                part: HostPart::Surface,
                animation: self.surface_leave.clone(),
            },
            HostEffect::SetAnimation {
                part: HostPart::Overlay,
                animation: self.overlay_leave.clone(),
            },
        ];

        if self.surface_leave.is_empty() && self.overlay_leave.is_empty() {
            self.surface_closed = true;
            self.overlay_closed = true;
            self.phase = HostPhase::Disposed;
            effects.push(HostEffect::RemoveRoot);
            return effects;
        }

        if self.surface_leave.is_empty() {
            self.surface_closed = true;
            effects.push(HostEffect::RemovePart(HostPart::Surface));
        }
        if self.overlay_leave.is_empty() {
            self.overlay_closed = true;
            effects.push(HostEffect::RemovePart(HostPart::Overlay));
        }

        effects
    }

    /// Record a leave-animation completion for one part.
    ///
    /// Removes that part's node; once both parts are closed, removes the
    /// remaining subtree and reaches `Disposed`. Signals arriving in
    /// either order, or duplicated, are handled.
    pub fn animation_ended(&mut self, part: HostPart) -> Vec<HostEffect> {
        if self.phase != HostPhase::Closing {
            tracing::debug!(?part, phase = ?self.phase, "animation end ignored");
            return Vec::new();
        }
        let flag = match part {
            HostPart::Surface => &mut self.surface_closed,
            HostPart::Overlay => &mut self.overlay_closed,
        };
        if *flag {
            // Duplicate signal for a part already removed.
            return Vec::new();
        }
        *flag = true;

        let mut effects = vec![HostEffect::RemovePart(part)];
        if self.surface_closed && self.overlay_closed {
            self.phase = HostPhase::Disposed;
            effects.push(HostEffect::RemoveRoot);
        }
        effects
    }
}
