use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::{CancelOutcome, NotificationService};
use crate::errors::NotificationError;
use crate::reminders::{ReminderId, ReminderInstance};

#[derive(Debug, Default)]
struct Inner {
    pending: BTreeMap<ReminderId, ReminderInstance>,
    cancel_requests: Vec<ReminderId>,
}

/// Process-local notification scheduler that only records what it was asked to do.
///
/// Useful for hosts without a platform scheduler and as the observable service in tests.
#[derive(Debug, Default)]
pub struct InMemoryNotificationService {
    inner: Mutex<Inner>,
}

impl InMemoryNotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, NotificationError> {
        self.inner
            .lock()
            .map_err(|_| NotificationError::Unavailable("pending store lock poisoned".into()))
    }

    /// Pending reminders ordered by id.
    pub fn pending(&self) -> Vec<ReminderInstance> {
        self.lock()
            .map(|inner| inner.pending.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get(&self, id: ReminderId) -> Option<ReminderInstance> {
        self.lock().ok()?.pending.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.pending.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every id passed to [`NotificationService::cancel`], in call order.
    pub fn cancel_requests(&self) -> Vec<ReminderId> {
        self.lock()
            .map(|inner| inner.cancel_requests.clone())
            .unwrap_or_default()
    }
}

impl NotificationService for InMemoryNotificationService {
    fn schedule(&self, reminder: &ReminderInstance) -> Result<(), NotificationError> {
        let mut inner = self.lock()?;
        inner.pending.insert(reminder.id, reminder.clone());
        Ok(())
    }

    fn cancel(&self, id: ReminderId) -> Result<CancelOutcome, NotificationError> {
        let mut inner = self.lock()?;
        inner.cancel_requests.push(id);
        Ok(match inner.pending.remove(&id) {
            Some(_) => CancelOutcome::Cancelled,
            None => CancelOutcome::NotFound,
        })
    }

    fn cancel_all(&self) -> Result<(), NotificationError> {
        self.lock()?.pending.clear();
        Ok(())
    }
}
