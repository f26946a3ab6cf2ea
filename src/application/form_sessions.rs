use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::payment_forms::PaymentForm, value_objects::enums::form_states::FormState,
};

const MIN_EVICTION_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug)]
struct FormSession {
    form: PaymentForm,
    touched_at: Instant,
}

impl FormSession {
    fn new() -> Self {
        Self {
            form: PaymentForm::new(),
            touched_at: Instant::now(),
        }
    }
}

/// Open payment forms keyed by session id.
///
/// Each form is only touched inside `with_form`, which holds the lock for the
/// duration of a synchronous closure and never across an await.
#[derive(Debug, Default)]
pub struct FormSessions {
    forms: Mutex<HashMap<Uuid, FormSession>>,
}

impl FormSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.forms.lock().await.insert(id, FormSession::new());
        id
    }

    pub async fn with_form<T, F>(&self, id: Uuid, apply: F) -> Option<T>
    where
        F: FnOnce(&mut PaymentForm) -> T,
    {
        let mut forms = self.forms.lock().await;
        forms.get_mut(&id).map(|session| {
            session.touched_at = Instant::now();
            apply(&mut session.form)
        })
    }

    pub async fn close(&self, id: Uuid) -> bool {
        self.forms.lock().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.forms.lock().await.len()
    }

    /// Drops forms nobody has touched for `max_idle`. Forms with a write in
    /// flight are kept so the write can still settle them. Returns how many
    /// forms were removed.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut forms = self.forms.lock().await;
        let before = forms.len();
        forms.retain(|_, session| {
            session.form.state() == FormState::Submitting
                || session.touched_at.elapsed() < max_idle
        });
        before - forms.len()
    }

    /// Settles a submit whose caller went away before the store answered, so the
    /// form returns to editing instead of staying `Submitting`.
    ///
    /// Runs immediately when the lock is free, otherwise on a spawned task.
    pub fn abandon_submit(self: &Arc<Self>, id: Uuid) {
        if let Ok(mut forms) = self.forms.try_lock() {
            fail_in_flight(&mut forms, id);
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let sessions = Arc::clone(self);
                handle.spawn(async move {
                    fail_in_flight(&mut *sessions.forms.lock().await, id);
                });
            }
            Err(_) => warn!(form_id = %id, "form_sessions: no runtime to settle abandoned submit"),
        }
    }

    /// Starts a background sweep that evicts idle forms every `every`.
    pub fn spawn_eviction(self: &Arc<Self>, every: Duration, max_idle: Duration) {
        let sessions = Arc::clone(self);
        // interval panics on a zero period
        let every = every.max(MIN_EVICTION_INTERVAL);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let evicted = sessions.evict_idle(max_idle).await;
                if evicted > 0 {
                    info!(evicted, "form_sessions: idle forms evicted");
                }
            }
        });
    }
}

fn fail_in_flight(forms: &mut HashMap<Uuid, FormSession>, id: Uuid) {
    let Some(session) = forms.get_mut(&id) else {
        return;
    };
    if session.form.mark_failed().is_ok() {
        session.touched_at = Instant::now();
        warn!(form_id = %id, "form_sessions: submit abandoned before the store answered");
    }
}
