// Dobles de prueba compartidos por los tests de viewmodels y estado

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;

use crate::services::alert_service::{AlertLevel, AlertSink};
use crate::services::errors::ApiError;
use crate::services::navigator::Navigator;
use crate::state::SessionContext;
use crate::utils::storage::MemoryTokenStore;

#[derive(Default)]
pub struct RecordingNavigator {
    path: RefCell<String>,
    visits: RefCell<Vec<String>>,
    delayed: RefCell<Vec<(String, u32)>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            path: RefCell::new(path.to_string()),
            ..Self::default()
        }
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }

    pub fn delayed(&self) -> Vec<(String, u32)> {
        self.delayed.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn navigate(&self, path: &str) {
        self.visits.borrow_mut().push(path.to_string());
    }

    fn navigate_after(&self, path: &str, delay_ms: u32) {
        self.delayed.borrow_mut().push((path.to_string(), delay_ms));
    }
}

#[derive(Default)]
pub struct RecordingAlerts {
    messages: RefCell<Vec<(String, AlertLevel)>>,
}

impl RecordingAlerts {
    pub fn messages(&self) -> Vec<(String, AlertLevel)> {
        self.messages.borrow().clone()
    }

    pub fn last(&self) -> Option<(String, AlertLevel)> {
        self.messages.borrow().last().cloned()
    }
}

impl AlertSink for RecordingAlerts {
    fn show(&self, message: &str, level: AlertLevel) {
        self.messages.borrow_mut().push((message.to_string(), level));
    }
}

pub struct TestSession {
    pub context: Rc<SessionContext>,
    pub navigator: Rc<RecordingNavigator>,
    pub alerts: Rc<RecordingAlerts>,
}

/// Sesión autenticada sobre `path`
pub fn session_at(path: &str) -> TestSession {
    let navigator = Rc::new(RecordingNavigator::at(path));
    let alerts = Rc::new(RecordingAlerts::default());
    let context = Rc::new(SessionContext::new(
        Rc::new(MemoryTokenStore::with_token("test-token")),
        navigator.clone(),
        alerts.clone(),
    ));
    TestSession { context, navigator, alerts }
}

/// Respuestas programadas: inmediatas o diferidas (el test decide cuándo llegan)
pub struct Scripted<T> {
    queue: RefCell<VecDeque<Reply<T>>>,
}

enum Reply<T> {
    Now(Result<T, ApiError>),
    Later(oneshot::Receiver<Result<T, ApiError>>),
}

impl<T> Default for Scripted<T> {
    fn default() -> Self {
        Self { queue: RefCell::new(VecDeque::new()) }
    }
}

impl<T> Scripted<T> {
    pub fn push(&self, reply: Result<T, ApiError>) {
        self.queue.borrow_mut().push_back(Reply::Now(reply));
    }

    /// Respuesta que llegará cuando se use el `Sender` devuelto
    pub fn defer(&self) -> oneshot::Sender<Result<T, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.queue.borrow_mut().push_back(Reply::Later(rx));
        tx
    }

    pub async fn next(&self) -> Result<T, ApiError> {
        let reply = self.queue.borrow_mut().pop_front();
        match reply {
            Some(Reply::Now(result)) => result,
            Some(Reply::Later(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("cancelled".into()))),
            None => Err(ApiError::Network("no scripted reply".into())),
        }
    }
}
