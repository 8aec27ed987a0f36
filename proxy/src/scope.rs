//! Temporary re-configuration of existing views.
//!
//! Every view carries a [`ScopeStack`] of contexts.
//! [`rescope`] (or a [`ConfigScope`]) pushes a scoped duplicate of the current context of each view,
//! with some options overridden, and returns a [`Restore`] handle popping them again.
//! Restoring removes exactly the contexts pushed by that handle,
//! so nested scopes can be restored in any order:
//! once every inner scope is restored, a view is back in the configuration of its outer scope.
//!
//! Views reached through a scoped context (e.g. the values of a key)
//! are the cached views of the context it was derived from,
//! with the same scope pushed on them;
//! restoring the scope releases them as well.
use crate::{ContextOverrides, ProxyContext, SubjectProxy};
use ldo_term::Term;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(0);

type Frames = RefCell<Vec<(u64, Rc<ProxyContext>)>>;

/// The stack of contexts pushed on a view.
#[derive(Clone, Default)]
pub struct ScopeStack(Rc<Frames>);

impl ScopeStack {
    /// The context on top of this stack, if any.
    pub fn current(&self) -> Option<Rc<ProxyContext>> {
        self.0.borrow().last().map(|(_, ctx)| Rc::clone(ctx))
    }

    /// The number of contexts on this stack.
    pub fn depth(&self) -> usize {
        self.0.borrow().len()
    }

    fn contains(&self, token: u64) -> bool {
        self.0.borrow().iter().any(|(t, _)| *t == token)
    }

    fn push(&self, token: u64, ctx: Rc<ProxyContext>) {
        self.0.borrow_mut().push((token, ctx));
    }

    fn remove(&self, token: u64) -> bool {
        let mut stack = self.0.borrow_mut();
        match stack.iter().rposition(|(t, _)| *t == token) {
            Some(i) => {
                stack.remove(i);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for ScopeStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeStack({})", self.depth())
    }
}

/// The stacks one scope was pushed on.
#[derive(Default)]
pub(crate) struct ScopeMembers {
    stacks: RefCell<Vec<Weak<Frames>>>,
    restored: Cell<bool>,
}

impl ScopeMembers {
    /// Push `ctx` on `stack` under `token`, unless the scope is over or already there.
    pub fn enter(&self, stack: &ScopeStack, token: u64, ctx: Rc<ProxyContext>) {
        if self.restored.get() || stack.contains(token) {
            return;
        }
        stack.push(token, ctx);
        self.stacks.borrow_mut().push(Rc::downgrade(&stack.0));
        log::trace!("pushed scope {token} (depth is now {})", stack.depth());
    }

    fn restore(&self, token: u64) {
        self.restored.set(true);
        for frames in self.stacks.take().iter().filter_map(Weak::upgrade) {
            let stack = ScopeStack(frames);
            if stack.remove(token) {
                log::trace!("popped scope {token} (depth is now {})", stack.depth());
            }
        }
    }
}

/// A view that can be temporarily re-configured.
pub trait ScopedView {
    /// The stack of contexts pushed on this view.
    fn scopes(&self) -> &ScopeStack;

    /// The context this view was created with.
    fn base_context(&self) -> &Rc<ProxyContext>;

    /// The context this view currently uses.
    fn context(&self) -> Rc<ProxyContext> {
        self.scopes()
            .current()
            .unwrap_or_else(|| Rc::clone(self.base_context()))
    }
}

/// Undoes a [`rescope`].
#[must_use = "views stay re-configured until restore is called"]
pub struct Restore {
    token: u64,
    members: Rc<ScopeMembers>,
}

impl Restore {
    /// Give the views back the configuration they had before this scope,
    /// including the views reached through it since.
    pub fn restore(self) {
        self.members.restore(self.token);
    }
}

impl fmt::Debug for Restore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Restore")
            .field("token", &self.token)
            .field("views", &self.members.stacks.borrow().len())
            .finish()
    }
}

/// Re-configure `views` with `overrides`, until the returned handle is [restored](Restore::restore).
///
/// Each view gets a scoped duplicate of the context it currently uses,
/// so nested scopes inherit the options that they do not override.
pub fn rescope(views: &[&dyn ScopedView], overrides: &ContextOverrides) -> Restore {
    let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
    let members = Rc::new(ScopeMembers::default());
    for view in views {
        let ctx = view.context().scoped(overrides, token, &members);
        members.enter(view.scopes(), token, ctx);
    }
    Restore { token, members }
}

/// A re-configuration, ready to be applied to views.
///
/// See [`write`] and [`set_language_preferences`].
#[derive(Clone, Debug)]
pub struct ConfigScope {
    overrides: ContextOverrides,
}

impl ConfigScope {
    /// A re-configuration applying `overrides`.
    pub fn new(overrides: ContextOverrides) -> Self {
        ConfigScope { overrides }
    }

    /// The overrides applied by this scope.
    pub fn overrides(&self) -> &ContextOverrides {
        &self.overrides
    }

    /// Re-configure existing `views`, until the returned handle is restored.
    pub fn using(&self, views: &[&dyn ScopedView]) -> Restore {
        rescope(views, &self.overrides)
    }

    /// Copies of `views`, using the new configuration for good.
    pub fn using_copy(&self, views: &[&SubjectProxy]) -> Vec<SubjectProxy> {
        views
            .iter()
            .map(|view| {
                view.context()
                    .duplicate(&self.overrides)
                    .subject(view.id())
            })
            .collect()
    }
}

/// Write new quads in `graphs`.
pub fn write<I: IntoIterator<Item = Term>>(graphs: I) -> ConfigScope {
    ConfigScope::new(ContextOverrides {
        write_graphs: Some(graphs.into_iter().collect()),
        ..ContextOverrides::default()
    })
}

/// Read and write language-tagged strings with the given preferences.
pub fn set_language_preferences<I, S>(ordering: I) -> ConfigScope
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ConfigScope::new(ContextOverrides {
        language_ordering: Some(ordering.into_iter().map(Into::into).collect()),
        ..ContextOverrides::default()
    })
}
