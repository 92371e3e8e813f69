#![forbid(unsafe_code)]

//! End-to-end close-sequencing walkthroughs over the public API.
//!
//! These tests drive a `ModalService` the way an embedding would: apply
//! drained scene effects to a fake element tree, run "animations" by
//! reporting their completion signals, and observe results through the
//! completion channel.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::json;
use veil::{
    HostEffect, HostPart, InstanceId, ModalOptions, ModalService, OverlayOptions, SceneEffect,
    SurfaceOptions, ViewError, ViewFactory, ViewHandle, ViewProps, ViewType,
};

const DIALOG: ViewType = ViewType("dialog");

/// Factory that records lifecycle calls per handle.
#[derive(Default)]
struct TreeState {
    next: u64,
    attached: Vec<ViewHandle>,
    disposed: Vec<ViewHandle>,
}

struct TreeFactory(Rc<RefCell<TreeState>>);

impl ViewFactory for TreeFactory {
    fn instantiate(&mut self, _view: ViewType, _props: &ViewProps) -> Result<ViewHandle, ViewError> {
        let mut state = self.0.borrow_mut();
        state.next += 1;
        Ok(ViewHandle::new(state.next))
    }

    fn attach(&mut self, view: ViewHandle) {
        self.0.borrow_mut().attached.push(view);
    }

    fn detach(&mut self, view: ViewHandle) {
        self.0.borrow_mut().attached.retain(|v| *v != view);
    }

    fn dispose(&mut self, view: ViewHandle) {
        self.0.borrow_mut().disposed.push(view);
    }
}

/// Overlay/surface/root presence for one mounted instance.
#[derive(Debug, Clone, Copy)]
struct Node {
    overlay: bool,
    surface: bool,
}

/// Minimal element tree: tracks which parts of each instance still exist
/// and which animations are pending a completion signal.
#[derive(Default)]
struct Scene {
    nodes: HashMap<InstanceId, Node>,
    pending_animations: Vec<(InstanceId, HostPart)>,
}

impl Scene {
    fn apply(&mut self, effects: Vec<SceneEffect>) {
        for SceneEffect { instance, effect } in effects {
            match effect {
                HostEffect::ApplyStyles { .. } => {
                    self.nodes.insert(
                        instance,
                        Node {
                            overlay: true,
                            surface: true,
                        },
                    );
                }
                HostEffect::SetAnimation { part, animation } => {
                    if !animation.is_empty() {
                        self.pending_animations.push((instance, part));
                    }
                }
                HostEffect::RemovePart(part) => {
                    let node = self.nodes.get_mut(&instance).expect("known instance");
                    match part {
                        HostPart::Overlay => node.overlay = false,
                        HostPart::Surface => node.surface = false,
                    }
                }
                HostEffect::RemoveRoot => {
                    self.nodes.remove(&instance);
                }
            }
        }
    }

    fn is_mounted(&self, instance: InstanceId) -> bool {
        self.nodes.contains_key(&instance)
    }
}

fn setup() -> (ModalService, Rc<RefCell<TreeState>>, Scene) {
    let state = Rc::new(RefCell::new(TreeState::default()));
    let service = ModalService::new(Box::new(TreeFactory(Rc::clone(&state))));
    (service, state, Scene::default())
}

#[test]
fn unanimated_close_removes_subtree_synchronously() {
    let (mut service, tree, mut scene) = setup();
    let completion = service.open(DIALOG, None).expect("open");
    let instance = service.top_instance().expect("open instance");
    scene.apply(service.drain_effects());
    assert!(scene.is_mounted(instance));
    assert_eq!(tree.borrow().attached.len(), 2);

    service.close(None);
    scene.apply(service.drain_effects());

    assert!(!scene.is_mounted(instance));
    assert!(scene.pending_animations.is_empty());
    assert!(tree.borrow().attached.is_empty());
    assert_eq!(tree.borrow().disposed.len(), 2);
    assert!(completion.try_get().is_some());
}

#[test]
fn overlay_only_animation_defers_overlay_removal() {
    let (mut service, tree, mut scene) = setup();
    let options =
        ModalOptions::new().overlay(OverlayOptions::default().leave("overlay-out 0.3s"));
    let completion = service.open(DIALOG, Some(options)).expect("open");
    let instance = service.top_instance().expect("open instance");
    scene.apply(service.drain_effects());

    service.close(None);
    scene.apply(service.drain_effects());

    // Surface gone immediately; overlay still up, waiting for its signal.
    let node = scene.nodes.get(&instance).copied().expect("still mounted");
    assert!(node.overlay, "overlay still present");
    assert!(!node.surface, "surface removed immediately");
    assert!(completion.try_get().is_none());
    assert!(tree.borrow().disposed.is_empty());

    // The pending overlay animation finishes.
    let (id, part) = scene.pending_animations.pop().expect("one pending");
    assert_eq!(id, instance);
    assert_eq!(part, HostPart::Overlay);
    service.animation_ended(instance, part);
    scene.apply(service.drain_effects());

    assert!(!scene.is_mounted(instance));
    assert_eq!(tree.borrow().disposed.len(), 2);
    assert!(completion.try_get().is_some());
}

#[test]
fn dual_animations_dispose_once_after_both_signals() {
    let (mut service, tree, mut scene) = setup();
    let options = ModalOptions::new()
        .modal(SurfaceOptions::default().leave("surface-out 0.5s"))
        .overlay(OverlayOptions::default().leave("overlay-out 0.3s"));
    let completion = service.open(DIALOG, Some(options)).expect("open");
    let instance = service.top_instance().expect("open instance");
    scene.apply(service.drain_effects());

    service.close(Some(json!({"answer": 42})));
    scene.apply(service.drain_effects());
    assert_eq!(scene.pending_animations.len(), 2);
    assert!(scene.is_mounted(instance));

    // Shorter overlay animation finishes first.
    service.animation_ended(instance, HostPart::Overlay);
    scene.apply(service.drain_effects());
    assert!(scene.is_mounted(instance));
    assert!(completion.try_get().is_none());

    service.animation_ended(instance, HostPart::Surface);
    scene.apply(service.drain_effects());
    assert!(!scene.is_mounted(instance));
    assert_eq!(tree.borrow().disposed.len(), 2);

    let response = completion.try_get().expect("resolved after both signals");
    assert_eq!(response.data, Some(json!({"answer": 42})));
}

#[test]
fn close_all_runs_each_leave_animation() {
    let (mut service, tree, mut scene) = setup();
    let animated =
        || ModalOptions::new().modal(SurfaceOptions::default().leave("surface-out 0.2s"));
    let completions: Vec<_> = (0..3)
        .map(|_| service.open(DIALOG, Some(animated())).expect("open"))
        .collect();
    scene.apply(service.drain_effects());

    service.close_all();
    scene.apply(service.drain_effects());

    // Every instance got its own leave animation rather than a bulk
    // short-circuit, and nothing is delivered until the signals arrive.
    assert_eq!(scene.pending_animations.len(), 3);
    assert_eq!(service.depth(), 0);
    assert_eq!(service.closing_count(), 3);
    assert!(completions.iter().all(|c| c.try_get().is_none()));

    for (instance, part) in std::mem::take(&mut scene.pending_animations) {
        service.animation_ended(instance, part);
        scene.apply(service.drain_effects());
    }

    assert_eq!(service.closing_count(), 0);
    assert!(scene.nodes.is_empty());
    assert_eq!(tree.borrow().disposed.len(), 6);
    assert!(completions.iter().all(|c| c.try_get().is_some()));
}

#[test]
fn nested_modals_stack_and_unwind_independently() {
    let (mut service, _, mut scene) = setup();
    let outer = service.open(DIALOG, None).expect("open");
    let inner = service
        .open(
            DIALOG,
            Some(ModalOptions::new().overlay(OverlayOptions::default().leave("fade 0.1s"))),
        )
        .expect("open");
    let inner_id = service.top_instance().expect("open instance");
    scene.apply(service.drain_effects());
    assert_eq!(service.depth(), 2);

    // Escape dismisses only the inner modal; its overlay animates out.
    service.escape_pressed();
    scene.apply(service.drain_effects());
    assert_eq!(service.depth(), 1);
    assert!(outer.try_get().is_none());

    service.animation_ended(inner_id, HostPart::Overlay);
    scene.apply(service.drain_effects());
    let response = inner.try_get().expect("inner resolved");
    assert!(response.closed_on_click_or_escape);

    // The outer modal is now topmost again and closes normally.
    service.close(Some(json!("outer done")));
    scene.apply(service.drain_effects());
    assert!(scene.nodes.is_empty());
    assert_eq!(outer.try_get().expect("outer resolved").data, Some(json!("outer done")));
}
