//! Cooperative cancellation scopes.
//!
//! [`CancellationToken`] is a cloneable signal that deferred work polls before
//! it touches shared state. A [`CancellationSource`] owns the signal; sources
//! can be nested with [`CancellationSource::child_of`] so that cancelling an
//! outer scope (a control's lifetime) also cancels every inner scope (the
//! work of its current state).
//!
//! # Example
//!
//! ```
//! use paneview_core::cancellation::CancellationSource;
//!
//! let lifetime = CancellationSource::new();
//! let state = CancellationSource::child_of(&lifetime.token());
//! let token = state.token();
//!
//! lifetime.cancel();
//! assert!(token.is_cancelled());
//! ```

#![forbid(unsafe_code)]

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cloneable view of a cancellation scope.
///
/// Tokens are cheap to clone; every clone observes the same scope and all of
/// its ancestors.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<CancellationInner>,
}

/// The control handle that triggers cancellation.
///
/// Dropping the source does **not** cancel its tokens; call
/// [`cancel`](Self::cancel) explicitly.
pub struct CancellationSource {
    inner: Arc<CancellationInner>,
}

struct CancellationInner {
    cancelled: AtomicBool,
    parent: Option<Arc<CancellationInner>>,
}

impl CancellationInner {
    fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Acquire) {
            return true;
        }
        let mut next = self.parent.as_deref();
        while let Some(scope) = next {
            if scope.cancelled.load(Ordering::Acquire) {
                return true;
            }
            next = scope.parent.as_deref();
        }
        false
    }
}

impl CancellationSource {
    /// Create a new root scope.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CancellationInner {
                cancelled: AtomicBool::new(false),
                parent: None,
            }),
        }
    }

    /// Create a scope that is also cancelled whenever `parent` is.
    pub fn child_of(parent: &CancellationToken) -> Self {
        Self {
            inner: Arc::new(CancellationInner {
                cancelled: AtomicBool::new(false),
                parent: Some(Arc::clone(&parent.inner)),
            }),
        }
    }

    /// Obtain a cloneable token that observes this scope.
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Signal cancellation to every token of this scope and of nested scopes.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
    }

    /// Whether this scope or an ancestor has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationSource")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancellationToken {
    /// Returns `true` if this scope or an ancestor has been cancelled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// A token that can never be cancelled.
    pub fn never() -> Self {
        CancellationSource::new().token()
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_uncancelled() {
        let source = CancellationSource::new();
        let token = source.token();
        assert!(!token.is_cancelled());
        assert!(!source.is_cancelled());
    }

    #[test]
    fn cancel_propagates_to_all_clones() {
        let source = CancellationSource::new();
        let t1 = source.token();
        let t2 = t1.clone();
        let t3 = source.token();
        source.cancel();
        assert!(t1.is_cancelled());
        assert!(t2.is_cancelled());
        assert!(t3.is_cancelled());
    }

    #[test]
    fn drop_source_does_not_cancel() {
        let source = CancellationSource::new();
        let token = source.token();
        drop(source);
        assert!(!token.is_cancelled());
    }

    #[test]
    fn parent_cancel_reaches_grandchild() {
        let root = CancellationSource::new();
        let child = CancellationSource::child_of(&root.token());
        let grandchild = CancellationSource::child_of(&child.token());
        root.cancel();
        assert!(child.is_cancelled());
        assert!(grandchild.token().is_cancelled());
    }

    #[test]
    fn child_cancel_does_not_reach_parent() {
        let root = CancellationSource::new();
        let child = CancellationSource::child_of(&root.token());
        let sibling = CancellationSource::child_of(&root.token());
        child.cancel();
        assert!(!root.is_cancelled());
        assert!(!sibling.is_cancelled());
    }

    #[test]
    fn never_token_stays_live() {
        assert!(!CancellationToken::never().is_cancelled());
    }

    #[test]
    fn debug_shows_state() {
        let source = CancellationSource::new();
        source.cancel();
        assert!(format!("{source:?}").contains("true"));
    }
}
