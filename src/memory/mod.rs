//! In-memory collaborators.
//!
//! Headless implementations of the thread, annotator and element surface a
//! viewer would normally supply. The session binary and the test suite drive
//! controllers and dialogs through them.

mod annotator;
mod history;
mod surface;
mod thread;

use std::cell::RefCell;
use std::rc::Rc;

pub use annotator::MemoryAnnotator;
pub use history::{Stroke, StrokeHistory};
pub use surface::{RecordingSurface, SurfaceOp};
pub use thread::MemoryDrawingThread;

use crate::controller::AnnotationMode;

/// Rounds after which a signal cascade is considered runaway.
const MAX_PUMP_ROUNDS: usize = 64;

/// Deliver queued thread signals to `mode` until none are left.
///
/// Handling a signal may queue new ones (a soft commit saves the thread, which
/// announces the save), so delivery repeats until the queues stay empty.
/// Returns the number of signals delivered.
pub fn pump_signals(annotator: &Rc<RefCell<MemoryAnnotator>>, mode: &mut dyn AnnotationMode) -> usize {
    let mut delivered = 0;
    for _ in 0..MAX_PUMP_ROUNDS {
        let pending = annotator.borrow_mut().drain_signals();
        if pending.is_empty() {
            return delivered;
        }
        for (thread, signal) in pending {
            mode.notify_thread(&thread, signal);
            delivered += 1;
        }
    }
    log::warn!("Signal pump stopped after {} rounds", MAX_PUMP_ROUNDS);
    delivered
}
