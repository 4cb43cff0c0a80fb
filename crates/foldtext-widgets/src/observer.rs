#![forbid(unsafe_code)]

//! Height notifications and deferred engine commands.
//!
//! The engine holds its [`HeightObserver`] through a [`Weak`] reference and
//! calls it synchronously while an update is running. An observer must not
//! reach back into the engine from the callback; it pushes a
//! [`FoldCommand`] onto the engine's [`DeferredQueue`] instead, and the
//! shell drains the queue on its next tick with
//! [`FoldEngine::process_deferred`](crate::fold::FoldEngine::process_deferred).

use foldtext_text::Content;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

/// Receives the widget's new height whenever it changes.
pub trait HeightObserver {
    fn height_did_change(&self, height: f32);
}

impl<F: Fn(f32)> HeightObserver for F {
    fn height_did_change(&self, height: f32) {
        self(height);
    }
}

/// Non-owning slot for the registered observer.
#[derive(Default)]
pub(crate) struct ObserverSlot {
    observer: Option<Weak<dyn HeightObserver>>,
}

impl ObserverSlot {
    pub(crate) fn set(&mut self, observer: Weak<dyn HeightObserver>) {
        self.observer = Some(observer);
    }

    pub(crate) fn clear(&mut self) {
        self.observer = None;
    }

    pub(crate) fn is_live(&self) -> bool {
        self.observer
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Deliver `height`. Returns whether a live observer received it.
    pub(crate) fn notify(&self, height: f32) -> bool {
        match self.observer.as_ref().and_then(Weak::upgrade) {
            Some(observer) => {
                observer.height_did_change(height);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for ObserverSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSlot")
            .field("live", &self.is_live())
            .finish()
    }
}

/// An engine mutation postponed to the next tick.
#[derive(Debug, Clone, PartialEq)]
pub enum FoldCommand {
    Toggle,
    SetLineCap(usize),
    SetContent(Content),
}

/// Shared FIFO of [`FoldCommand`]s.
///
/// Cloning yields another handle to the same queue.
#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
    commands: Rc<RefCell<VecDeque<FoldCommand>>>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: FoldCommand) {
        self.commands.borrow_mut().push_back(command);
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }

    pub(crate) fn pop(&self) -> Option<FoldCommand> {
        self.commands.borrow_mut().pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn closure_is_an_observer() {
        let seen = Rc::new(Cell::new(0.0));
        let sink = Rc::clone(&seen);
        let observer: Rc<dyn HeightObserver> = Rc::new(move |h: f32| sink.set(h));
        let mut slot = ObserverSlot::default();
        slot.set(Rc::downgrade(&observer));
        assert!(slot.notify(12.0));
        assert_eq!(seen.get(), 12.0);
    }

    #[test]
    fn dropped_observer_is_skipped() {
        let observer: Rc<dyn HeightObserver> = Rc::new(|_h: f32| {});
        let mut slot = ObserverSlot::default();
        slot.set(Rc::downgrade(&observer));
        assert!(slot.is_live());
        drop(observer);
        assert!(!slot.is_live());
        assert!(!slot.notify(1.0));
    }

    #[test]
    fn empty_slot_is_skipped() {
        let mut slot = ObserverSlot::default();
        assert!(!slot.notify(1.0));
        let observer: Rc<dyn HeightObserver> = Rc::new(|_h: f32| {});
        slot.set(Rc::downgrade(&observer));
        slot.clear();
        assert!(!slot.notify(1.0));
    }

    #[test]
    fn queue_handles_share_commands() {
        let queue = DeferredQueue::new();
        let handle = queue.clone();
        handle.push(FoldCommand::Toggle);
        handle.push(FoldCommand::SetLineCap(2));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(FoldCommand::Toggle));
        assert_eq!(queue.pop(), Some(FoldCommand::SetLineCap(2)));
        assert!(queue.is_empty());
    }
}
