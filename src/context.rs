//! The bounded execution context forwarded through every encoding call.
//!
//! The encoder never looks at a [`Context`] itself. It hands the same context
//! to every nested dispatch and to every [`ToArgs`](crate::ToArgs) producer, so
//! producers whose tokens depend on a scoped resource (a temporary directory, a
//! rendered config file) can tie that resource's lifetime to the context.
//!
//! ```rust
//! use serde_argv::Context;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//!
//! let ctx = Context::background().child();
//! let cleaned = Arc::new(AtomicBool::new(false));
//! let flag = cleaned.clone();
//! ctx.on_cancel(move || flag.store(true, Ordering::SeqCst));
//!
//! ctx.cancel();
//! assert!(cleaned.load(Ordering::SeqCst));
//! assert!(ctx.is_cancelled());
//! ```

use crate::{Error, Result};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};

type Hook = Box<dyn FnOnce() + Send + 'static>;

/// A cancellable, optionally deadline-bounded handle.
///
/// Cloning is cheap and clones share state. Cancelling a context cancels every
/// context derived from it with [`Context::child`], [`Context::with_deadline`]
/// or [`Context::with_timeout`].
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

struct Inner {
    parent: Option<Context>,
    deadline: Option<Instant>,
    cancelled: AtomicBool,
    hooks: Mutex<Vec<Hook>>,
    children: Mutex<Vec<Weak<Inner>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Context {
    /// Returns a root context that is never cancelled unless [`Context::cancel`] is called on it.
    pub fn background() -> Self {
        Self::with_parts(None, None)
    }

    fn with_parts(parent: Option<Context>, deadline: Option<Instant>) -> Self {
        Context {
            inner: Arc::new(Inner {
                parent,
                deadline,
                cancelled: AtomicBool::new(false),
                hooks: Mutex::new(Vec::new()),
                children: Mutex::new(Vec::new()),
            }),
        }
    }

    fn derive(&self, deadline: Option<Instant>) -> Self {
        let deadline = match (self.inner.deadline, deadline) {
            (Some(ours), Some(theirs)) => Some(ours.min(theirs)),
            (ours, theirs) => ours.or(theirs),
        };
        let child = Self::with_parts(Some(self.clone()), deadline);
        {
            let mut children = lock(&self.inner.children);
            children.retain(|weak| weak.strong_count() > 0);
            children.push(Arc::downgrade(&child.inner));
        }
        if self.inner.cancelled.load(Ordering::SeqCst) {
            child.cancel();
        }
        child
    }

    /// Derives a context that is cancelled together with `self`.
    pub fn child(&self) -> Self {
        self.derive(None)
    }

    /// Derives a context that also expires at `deadline`.
    ///
    /// The earlier of the parent's deadline and `deadline` wins.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        self.derive(Some(deadline))
    }

    /// Derives a context that expires `timeout` from now.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.derive(Some(Instant::now() + timeout))
    }

    /// Returns the parent this context was derived from, if any.
    pub fn parent(&self) -> Option<&Context> {
        self.inner.parent.as_ref()
    }

    /// Returns the effective deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Cancels this context and every context derived from it.
    ///
    /// Cleanup hooks of descendants run first, then this context's hooks in
    /// reverse registration order. Calling `cancel` again does nothing.
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!("context cancelled");

        let children = std::mem::take(&mut *lock(&self.inner.children));
        for child in children.iter().filter_map(Weak::upgrade) {
            Context { inner: child }.cancel();
        }

        let hooks = std::mem::take(&mut *lock(&self.inner.hooks));
        for hook in hooks.into_iter().rev() {
            hook();
        }
    }

    /// Registers a cleanup hook that runs when this context is cancelled.
    ///
    /// If the context is already cancelled the hook runs immediately. Hooks do
    /// not run when only the deadline passes.
    pub fn on_cancel<F>(&self, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut hooks = lock(&self.inner.hooks);
        if self.inner.cancelled.load(Ordering::SeqCst) {
            drop(hooks);
            hook();
        } else {
            hooks.push(Box::new(hook));
        }
    }

    /// Returns `true` once the context is cancelled or its deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        self.check().is_err()
    }

    /// Returns an error describing why the context is done, if it is.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_argv::{Context, Error};
    ///
    /// let ctx = Context::background().child();
    /// assert!(ctx.check().is_ok());
    /// ctx.cancel();
    /// assert!(matches!(ctx.check(), Err(Error::Cancelled)));
    /// ```
    pub fn check(&self) -> Result<()> {
        if self.inner.cancelled.load(Ordering::SeqCst) {
            return Err(Error::Cancelled);
        }
        match self.inner.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Error::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Returns a guard that cancels this context when dropped.
    #[must_use = "the context is cancelled as soon as the guard is dropped"]
    pub fn cancel_on_drop(&self) -> CancelGuard {
        CancelGuard { ctx: self.clone() }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::background()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("cancelled", &self.inner.cancelled.load(Ordering::SeqCst))
            .field("deadline", &self.inner.deadline)
            .field("has_parent", &self.inner.parent.is_some())
            .finish()
    }
}

/// Cancels its context on drop. Created by [`Context::cancel_on_drop`].
#[derive(Debug)]
pub struct CancelGuard {
    ctx: Context,
}

impl CancelGuard {
    /// The guarded context.
    pub fn context(&self) -> &Context {
        &self.ctx
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.ctx.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_cancel_propagates_to_children() {
        let root = Context::background();
        let child = root.child();
        let grandchild = child.child();

        child.cancel();

        assert!(!root.is_cancelled());
        assert!(child.is_cancelled());
        assert!(grandchild.is_cancelled());
    }

    #[test]
    fn test_dropped_children_are_pruned() {
        let root = Context::background();
        for _ in 0..100 {
            let _short_lived = root.child();
        }
        let kept = root.child();

        assert_eq!(lock(&root.inner.children).len(), 1);
        root.cancel();
        assert!(kept.is_cancelled());
    }

    #[test]
    fn test_hooks_run_once_in_reverse_order() {
        let ctx = Context::background().child();
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let order = order.clone();
            ctx.on_cancel(move || order.lock().unwrap().push(i));
        }

        ctx.cancel();
        ctx.cancel();

        assert_eq!(*order.lock().unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn test_hook_on_cancelled_context_runs_immediately() {
        let ctx = Context::background().child();
        ctx.cancel();

        let ran = Arc::new(AtomicUsize::new(0));
        let counter = ran.clone();
        ctx.on_cancel(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_child_of_cancelled_context_starts_cancelled() {
        let ctx = Context::background().child();
        ctx.cancel();
        assert!(ctx.child().is_cancelled());
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = Context::background().with_deadline(Instant::now());
        assert!(matches!(ctx.check(), Err(Error::DeadlineExceeded)));

        let later = Context::background().with_timeout(Duration::from_secs(3600));
        assert!(later.check().is_ok());
        assert!(later.deadline().is_some());
    }

    #[test]
    fn test_earlier_deadline_wins() {
        let soon = Instant::now() + Duration::from_secs(1);
        let late = soon + Duration::from_secs(60);
        let ctx = Context::background().with_deadline(soon).with_deadline(late);
        assert_eq!(ctx.deadline(), Some(soon));
    }

    #[test]
    fn test_cancel_on_drop() {
        let ctx = Context::background().child();
        {
            let guard = ctx.cancel_on_drop();
            assert!(!guard.context().is_cancelled());
        }
        assert!(ctx.is_cancelled());
    }
}
