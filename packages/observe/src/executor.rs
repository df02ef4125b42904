//! The redispatch seam between store notifications and subscribers.

/// An execution context change signals are delivered on.
///
/// Store notifications arrive on whatever thread performed the mutation or
/// received the broadcast; the bridge hands every delivery to an executor
/// rather than calling the subscriber directly, so subscribers that live
/// on a particular context (a UI thread, an event loop) can have the
/// signal redispatched there. Execution is fire-and-forget: nothing
/// blocks on the job completing.
pub trait Executor: Send + Sync {
    /// Run a job on this executor's context.
    fn execute(&self, job: Box<dyn FnOnce() + Send>);
}

/// Runs jobs immediately on the delivering thread.
///
/// Suitable when the subscriber has no context affinity, and in tests,
/// where synchronous delivery keeps assertions simple.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, job: Box<dyn FnOnce() + Send>) {
        job();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn inline_executor_runs_synchronously() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        InlineExecutor.execute(Box::new(move || {
            flag.store(true, Ordering::SeqCst);
        }));

        assert!(ran.load(Ordering::SeqCst));
    }
}
