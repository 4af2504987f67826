use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::RenderError;

/// Consumer of finished frames: a graphics API in a windowed build, a recorder headless.
pub trait RenderBackend<F> {
    fn submit(&mut self, frame: F) -> Result<(), RenderError>;
}

/// Shared backends let the host inspect what a scheduled system submitted.
impl<F, B: RenderBackend<F>> RenderBackend<F> for Rc<RefCell<B>> {
    fn submit(&mut self, frame: F) -> Result<(), RenderError> {
        self.borrow_mut().submit(frame)
    }
}

/// Headless backend keeping the most recent frames.
#[derive(Debug)]
pub struct RecordingBackend<F> {
    frames: VecDeque<F>,
    capacity: Option<usize>,
    submitted: u64,
}

impl<F> Default for RecordingBackend<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> RecordingBackend<F> {
    /// Keeps every frame.
    pub fn new() -> Self {
        Self {
            frames: VecDeque::new(),
            capacity: None,
            submitted: 0,
        }
    }

    /// Keeps only the last `capacity` frames.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
            submitted: 0,
        }
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Retained frames, oldest first.
    pub fn frames(&self) -> &VecDeque<F> {
        &self.frames
    }

    pub fn last(&self) -> Option<&F> {
        self.frames.back()
    }

    /// Frames submitted over the backend's lifetime, including dropped ones.
    pub fn submitted(&self) -> u64 {
        self.submitted
    }
}

impl<F> RenderBackend<F> for RecordingBackend<F> {
    fn submit(&mut self, frame: F) -> Result<(), RenderError> {
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return Err(RenderError::Backend("recorder has no room for frames".into()));
            }
            if self.frames.len() == capacity {
                self.frames.pop_front();
            }
        }
        self.frames.push_back(frame);
        self.submitted += 1;
        Ok(())
    }
}
