//! Transactions over views.
use crate::LdoError;
use ldo_dataset::{DatasetChanges, SharedDataset};
use ldo_proxy::{rescope, ContextOverrides, Restore, ScopedView};
use ldo_subscribable::TransactionDataset;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A transaction that some views read from and write to.
///
/// While the transaction is open, the views only see (and modify) its overlay.
/// [Committing](Self::commit) applies the pending changes to the dataset the views were using;
/// [abandoning](Self::abandon) (or dropping) the transaction discards them.
/// Either way, the views get their previous configuration back.
pub struct LdoTransaction {
    overlay: Rc<RefCell<TransactionDataset<SharedDataset>>>,
    restore: Option<Restore>,
}

/// Open a transaction over the dataset currently used by the first of `views`,
/// and make all `views` use it.
pub fn start_transaction(views: &[&dyn ScopedView]) -> Result<LdoTransaction, LdoError> {
    let first = views.first().ok_or(LdoError::NoViews)?;
    let parent = first.context().dataset().clone();
    let overlay = Rc::new(RefCell::new(TransactionDataset::new(parent)));
    let shared: SharedDataset = overlay.clone();
    let restore = rescope(
        views,
        &ContextOverrides {
            dataset: Some(shared),
            ..ContextOverrides::default()
        },
    );
    log::debug!("started a transaction over {} view(s)", views.len());
    Ok(LdoTransaction {
        overlay,
        restore: Some(restore),
    })
}

impl LdoTransaction {
    /// The pending changes.
    pub fn changes(&self) -> DatasetChanges {
        self.overlay.borrow().changes().clone()
    }

    /// Whether there are pending changes.
    pub fn has_changes(&self) -> bool {
        self.overlay.borrow().has_changes()
    }

    /// The overlay, for reading or writing it directly.
    pub fn dataset(&self) -> SharedDataset {
        self.overlay.clone()
    }

    /// Apply the pending changes, and return those that were actually applied.
    pub fn commit(mut self) -> Result<DatasetChanges, LdoError> {
        self.release();
        let mut overlay = self.overlay.borrow_mut();
        overlay.commit()?;
        let applied = overlay.committed_changes().cloned().unwrap_or_default();
        Ok(applied)
    }

    /// Discard the pending changes.
    pub fn abandon(mut self) {
        log::debug!("abandoned a transaction");
        self.release();
    }

    fn release(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore.restore();
        }
    }
}

impl Drop for LdoTransaction {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for LdoTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LdoTransaction")
            .field("changes", &self.overlay.borrow().changes().len())
            .field("open", &self.restore.is_some())
            .finish()
    }
}
