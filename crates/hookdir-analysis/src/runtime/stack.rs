//! Call-stack inspection for runtime attribution.

use std::cell::RefCell;
use std::path::PathBuf;

/// One frame of the host call stack. Frames from native code may lack both
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackFrame {
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
}

impl StackFrame {
    pub fn new(file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
        }
    }
}

/// Source of the current call stack.
pub trait StackProbe {
    /// Up to `limit` frames, innermost first.
    fn frames(&self, limit: usize) -> Vec<StackFrame>;
}

/// Explicitly maintained stack for hosts without native introspection.
/// Callers push a frame with [`ShadowStack::enter`] and the returned guard
/// pops it.
#[derive(Debug, Default)]
pub struct ShadowStack {
    frames: RefCell<Vec<StackFrame>>,
}

impl ShadowStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self, frame: StackFrame) -> FrameGuard<'_> {
        self.frames.borrow_mut().push(frame);
        FrameGuard { stack: self }
    }

    pub fn depth(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl StackProbe for ShadowStack {
    fn frames(&self, limit: usize) -> Vec<StackFrame> {
        self.frames.borrow().iter().rev().take(limit).cloned().collect()
    }
}

/// Pops its frame on drop.
#[must_use = "the frame is popped as soon as the guard is dropped"]
pub struct FrameGuard<'a> {
    stack: &'a ShadowStack,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.stack.frames.borrow_mut().pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_innermost_first_and_popped_by_guard() {
        let stack = ShadowStack::new();
        let _outer = stack.enter(StackFrame::new("/a.php", 1));
        {
            let _inner = stack.enter(StackFrame::new("/b.php", 2));
            let frames = stack.frames(10);
            assert_eq!(frames[0].file.as_deref(), Some(std::path::Path::new("/b.php")));
            assert_eq!(frames.len(), 2);
            assert_eq!(stack.frames(1).len(), 1);
        }
        assert_eq!(stack.depth(), 1);
    }
}
