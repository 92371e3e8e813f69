#![forbid(unsafe_code)]

//! Scripted walkthrough of the modal service against an in-memory scene.
//!
//! Registers a handful of named views in a toy [`ViewFactory`], opens and
//! closes modals the way an interactive embedding would, and prints the
//! scene after each step. Animations are simulated: any non-empty leave
//! animation becomes a pending signal the script delivers by hand.
//!
//! Run with `RUST_LOG=debug` to watch the service's own tracing output.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::json;
use tracing_subscriber::EnvFilter;
use veil::{
    HOST_VIEW, HostEffect, HostPart, InstanceId, ModalOptions, ModalService, OverlayOptions,
    SceneEffect, SizeOptions, SurfaceOptions, ViewError, ViewFactory, ViewHandle, ViewProps,
    ViewType,
};

const GREETING: ViewType = ViewType("greeting-dialog");
const PROFILE_FORM: ViewType = ViewType("profile-form");
const CONFIRM_BOX: ViewType = ViewType("confirm-box");

/// Shared bookkeeping behind the demo factory.
#[derive(Default)]
struct Registry {
    next: u64,
    alive: HashMap<ViewHandle, String>,
}

/// Factory over a fixed set of view names. Unknown names are rejected the
/// way a real component registry would reject an unregistered selector.
struct DemoFactory(Rc<RefCell<Registry>>);

impl DemoFactory {
    const KNOWN: [ViewType; 3] = [GREETING, PROFILE_FORM, CONFIRM_BOX];
}

impl ViewFactory for DemoFactory {
    fn instantiate(&mut self, view: ViewType, props: &ViewProps) -> Result<ViewHandle, ViewError> {
        if view != HOST_VIEW && !Self::KNOWN.contains(&view) {
            return Err(ViewError::UnknownViewType(view.name().to_owned()));
        }
        let mut registry = self.0.borrow_mut();
        registry.next += 1;
        let handle = ViewHandle::new(registry.next);
        registry.alive.insert(handle, view.name().to_owned());
        if !props.is_empty() {
            println!("  [factory] {} created with {} prop(s)", view, props.len());
        }
        Ok(handle)
    }

    fn attach(&mut self, view: ViewHandle) {
        if let Some(name) = self.0.borrow().alive.get(&view) {
            println!("  [factory] attached {name}");
        }
    }

    fn detach(&mut self, view: ViewHandle) {
        if let Some(name) = self.0.borrow().alive.get(&view) {
            println!("  [factory] detached {name}");
        }
    }

    fn dispose(&mut self, view: ViewHandle) {
        if let Some(name) = self.0.borrow_mut().alive.remove(&view) {
            println!("  [factory] disposed {name}");
        }
    }
}

/// One mounted modal subtree: overlay and surface presence plus styling.
struct Mounted {
    overlay: bool,
    surface: bool,
    surface_z: u32,
    animation: String,
}

/// The demo's stand-in for a real element tree.
#[derive(Default)]
struct Scene {
    mounted: HashMap<InstanceId, Mounted>,
    pending_animations: Vec<(InstanceId, HostPart)>,
}

impl Scene {
    fn apply(&mut self, effects: Vec<SceneEffect>) {
        for SceneEffect { instance, effect } in effects {
            match effect {
                HostEffect::ApplyStyles { surface, overlay: _ } => {
                    self.mounted.insert(
                        instance,
                        Mounted {
                            overlay: true,
                            surface: true,
                            surface_z: surface.z_index,
                            animation: surface.animation,
                        },
                    );
                }
                HostEffect::SetAnimation { part, animation } => {
                    if let Some(node) = self.mounted.get_mut(&instance) {
                        node.animation = animation.clone();
                    }
                    if !animation.is_empty() {
                        self.pending_animations.push((instance, part));
                    }
                }
                HostEffect::RemovePart(part) => {
                    if let Some(node) = self.mounted.get_mut(&instance) {
                        match part {
                            HostPart::Overlay => node.overlay = false,
                            HostPart::Surface => node.surface = false,
                        }
                    }
                }
                HostEffect::RemoveRoot => {
                    self.mounted.remove(&instance);
                }
            }
        }
    }

    /// Deliver every pending animation signal, as if all animations just
    /// reached their end at once.
    fn finish_animations(&mut self, service: &mut ModalService) {
        for (instance, part) in std::mem::take(&mut self.pending_animations) {
            println!("  [scene] animation ended: instance {} {part:?}", instance.raw());
            service.animation_ended(instance, part);
        }
        self.apply(service.drain_effects());
    }

    fn print(&self) {
        if self.mounted.is_empty() {
            println!("  [scene] empty");
            return;
        }
        let mut rows: Vec<_> = self.mounted.iter().collect();
        rows.sort_by_key(|(_, node)| node.surface_z);
        for (instance, node) in rows {
            println!(
                "  [scene] instance {} z={} overlay={} surface={} animation={:?}",
                instance.raw(),
                node.surface_z,
                node.overlay,
                node.surface,
                node.animation,
            );
        }
    }
}

fn step(scene: &mut Scene, service: &mut ModalService, label: &str) {
    scene.apply(service.drain_effects());
    println!("== {label} (depth {}) ==", service.depth());
    scene.print();
}

fn main() -> Result<(), ViewError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let registry = Rc::new(RefCell::new(Registry::default()));
    let mut service = ModalService::new(Box::new(DemoFactory(Rc::clone(&registry))));
    let mut scene = Scene::default();

    // A greeting with enter and leave animations, dismissible by Escape.
    let greeting = service.open(
        GREETING,
        Some(
            ModalOptions::new()
                .modal(
                    SurfaceOptions::default()
                        .enter("slide-in 0.4s ease-out")
                        .leave("slide-out 0.3s ease-in"),
                )
                .overlay(OverlayOptions::default().leave("fade-out 0.3s"))
                .data(ViewProps::new().with("greeting", "welcome back")),
        ),
    )?;
    greeting.on_close(|response| {
        println!(
            "  [caller] greeting closed, dismissed={}",
            response.closed_on_click_or_escape
        );
    });
    step(&mut scene, &mut service, "greeting open");

    // The user presses Escape; both leave animations must finish before
    // the subtree is torn down and the callback above fires.
    service.escape_pressed();
    step(&mut scene, &mut service, "greeting escape pressed");
    scene.finish_animations(&mut service);
    step(&mut scene, &mut service, "greeting leave animations done");

    // A form that returns data through close(). No animations, so the
    // completion is available in the same tick.
    let form = service.open(
        PROFILE_FORM,
        Some(
            ModalOptions::new()
                .size(SizeOptions::default().width("32rem").padding("1rem"))
                .data(ViewProps::new().with("username", "ada")),
        ),
    )?;
    step(&mut scene, &mut service, "profile form open");
    service.close(Some(json!({"username": "ada", "theme": "dark"})));
    step(&mut scene, &mut service, "profile form submitted");
    let response = form.try_get().expect("unanimated close resolves in the same tick");
    println!("  [caller] form returned {:?}", response.data);

    // Nested modals: a confirm box stacks above the form, 2000 z-index
    // units higher, and close_all unwinds topmost first.
    service.open(PROFILE_FORM, None)?;
    let confirm = service.open(
        CONFIRM_BOX,
        Some(ModalOptions::new().modal(SurfaceOptions::default().leave("pop-out 0.2s"))),
    )?;
    step(&mut scene, &mut service, "nested confirm above form");

    service.close_all();
    step(&mut scene, &mut service, "close_all issued");
    scene.finish_animations(&mut service);
    step(&mut scene, &mut service, "all leave animations done");
    let response = confirm.try_get().expect("confirm resolved by close_all");
    println!(
        "  [caller] confirm closed, dismissed={}",
        response.closed_on_click_or_escape
    );

    assert!(registry.borrow().alive.is_empty(), "every view disposed");
    Ok(())
}
