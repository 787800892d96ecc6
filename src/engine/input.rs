//! Host input events
//!
//! Event handlers only append to the queue; the loop drains it at the start of
//! each frame so no event lands in the middle of a tick.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec2;

/// An input from the hosting view
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a position in canvas coordinates
    PointerMove(Vec2),
    /// Viewport changed size (CSS pixels)
    Resize { width: u32, height: u32 },
}

/// Shared FIFO of pending input events
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: Rc<RefCell<VecDeque<InputEvent>>>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: InputEvent) {
        self.events.borrow_mut().push_back(event);
    }

    /// Take every queued event in arrival order
    pub fn drain(&self) -> Vec<InputEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_queue_and_keep_order() {
        let queue = InputQueue::new();
        let handler_side = queue.clone();
        handler_side.push(InputEvent::PointerMove(Vec2::new(1.0, 2.0)));
        handler_side.push(InputEvent::Resize {
            width: 10,
            height: 20,
        });

        assert_eq!(queue.len(), 2);
        let events = queue.drain();
        assert_eq!(events[0], InputEvent::PointerMove(Vec2::new(1.0, 2.0)));
        assert!(matches!(events[1], InputEvent::Resize { width: 10, .. }));
        assert!(handler_side.is_empty());
    }
}
