//! Failure boundary around render steps.
//!
//! A panic inside one view's render step becomes a [`RenderFault`] for that
//! view only; siblings keep rendering. Builds with `panic = "abort"` (the
//! usual wasm setup) cannot catch panics, so there the boundary only helps
//! with the retry bookkeeping.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// A render step that panicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFault {
    pub label: String,
    pub message: String,
}

impl fmt::Display for RenderFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 渲染失败: {}", self.label, self.message)
    }
}

impl std::error::Error for RenderFault {}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run `render`, turning a panic into a [`RenderFault`] labelled `label`.
pub fn contain<T>(label: &str, render: impl FnOnce() -> T) -> Result<T, RenderFault> {
    panic::catch_unwind(AssertUnwindSafe(render)).map_err(|payload| {
        let fault = RenderFault {
            label: label.to_string(),
            message: panic_message(payload.as_ref()),
        };
        tracing::warn!("{}", fault);
        fault
    })
}

/// One boundary per view. Remembers the last fault until a retry succeeds.
#[derive(Debug, Clone)]
pub struct Boundary {
    label: String,
    fault: Option<RenderFault>,
}

impl Boundary {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fault: None,
        }
    }

    pub fn fault(&self) -> Option<&RenderFault> {
        self.fault.as_ref()
    }

    pub fn render<T>(&mut self, render: impl FnOnce() -> T) -> Option<T> {
        match contain(&self.label, render) {
            Ok(out) => {
                self.fault = None;
                Some(out)
            }
            Err(fault) => {
                self.fault = Some(fault);
                None
            }
        }
    }

    /// Clear the fault and render again.
    pub fn retry<T>(&mut self, render: impl FnOnce() -> T) -> Option<T> {
        self.fault = None;
        self.render(render)
    }
}
