// ============================================================================
// NOTIFICATION VIEWMODEL - Polling de notificaciones + marcar como leídas
// ============================================================================
// Cada fetch lleva un ticket del `RequestSequencer`: si una respuesta lenta
// llega después de otra más nueva se descarta en vez de pisarla.
// ============================================================================

use std::rc::Rc;

use crate::models::NotificationFeed;
use crate::services::alert_service::AlertLevel;
use crate::services::api::NotificationApi;
use crate::state::{ReactiveState, RequestSequencer, SessionContext};

pub const MARK_READ_SUCCESS_TEXT: &str = "Все уведомления отмечены как прочитанные";
pub const MARK_READ_ERROR_TEXT: &str = "Ошибка при обработке уведомлений";

pub struct NotificationViewModel {
    api: Rc<dyn NotificationApi>,
    session: Rc<SessionContext>,
    sequencer: RequestSequencer,
    feed: ReactiveState<NotificationFeed>,
}

impl NotificationViewModel {
    pub fn new(api: Rc<dyn NotificationApi>, session: Rc<SessionContext>) -> Self {
        Self {
            api,
            session,
            sequencer: RequestSequencer::new(),
            feed: ReactiveState::new(NotificationFeed::default()),
        }
    }

    /// Estado observable por la vista
    pub fn feed(&self) -> &ReactiveState<NotificationFeed> {
        &self.feed
    }

    /// Un ciclo de polling. Devuelve `true` si la respuesta se aplicó
    pub async fn refresh(&self) -> bool {
        let ticket = self.sequencer.issue();
        match self.api.fetch_notifications().await {
            Ok(feed) => {
                if !self.sequencer.try_apply(ticket) {
                    return false;
                }
                log::debug!("🔔 [NOTIF] {} sin leer, {} en lista", feed.unread_count, feed.notifications.len());
                self.feed.set(feed);
                true
            }
            Err(e) => {
                // Sin alerta: el polling falla en silencio y reintenta en el siguiente tick
                log::warn!("⚠️ [NOTIF] Error cargando notificaciones: {}", e);
                false
            }
        }
    }

    pub async fn mark_all_read(&self) {
        match self.api.mark_all_read().await {
            Ok(()) => {
                // Lo que estuviera en vuelo trae el contador viejo
                self.sequencer.invalidate();
                self.feed.update(|feed| feed.unread_count = 0);
                self.session.alert(MARK_READ_SUCCESS_TEXT, AlertLevel::Success);
                self.refresh().await;
            }
            Err(e) if e.is_unauthorized() => {}
            Err(e) => {
                log::error!("❌ [NOTIF] mark-read: {}", e);
                self.session.alert(MARK_READ_ERROR_TEXT, AlertLevel::Danger);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Notification;
    use crate::services::errors::ApiError;
    use crate::testing::{session_at, Scripted};
    use async_trait::async_trait;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;

    #[derive(Default)]
    struct FakeNotifications {
        feeds: Scripted<NotificationFeed>,
        mark: Scripted<()>,
    }

    #[async_trait(?Send)]
    impl NotificationApi for FakeNotifications {
        async fn fetch_notifications(&self) -> Result<NotificationFeed, ApiError> {
            self.feeds.next().await
        }

        async fn mark_all_read(&self) -> Result<(), ApiError> {
            self.mark.next().await
        }
    }

    fn feed(unread: u32, titles: &[&str]) -> NotificationFeed {
        let notifications = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                serde_json::from_value::<Notification>(serde_json::json!({
                    "id": i, "type": "message", "title": title, "message": "",
                    "created_at": "2024-01-01T00:00:00", "icon": "fa-envelope"
                }))
                .unwrap()
            })
            .collect();
        NotificationFeed { unread_count: unread, notifications }
    }

    #[test]
    fn refresh_publishes_feed() {
        let api = Rc::new(FakeNotifications::default());
        api.feeds.push(Ok(feed(2, &["a", "b"])));
        let vm = NotificationViewModel::new(api, session_at("/dashboard").context);
        assert!(block_on(vm.refresh()));
        assert_eq!(vm.feed().get().unread_count, 2);
    }

    #[test]
    fn stale_poll_does_not_overwrite_newer_one() {
        let api = Rc::new(FakeNotifications::default());
        let slow = api.feeds.defer();
        let fast = api.feeds.defer();
        let vm = Rc::new(NotificationViewModel::new(api, session_at("/dashboard").context));

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        for _ in 0..2 {
            let vm = vm.clone();
            spawner
                .spawn_local(async move {
                    vm.refresh().await;
                })
                .unwrap();
        }
        pool.run_until_stalled();

        fast.send(Ok(feed(1, &["new"]))).unwrap();
        pool.run_until_stalled();
        slow.send(Ok(feed(7, &["old", "old", "old"]))).unwrap();
        pool.run_until_stalled();

        let current = vm.feed().get();
        assert_eq!(current.unread_count, 1);
        assert_eq!(current.notifications[0].title, "new");
    }

    #[test]
    fn mark_all_read_clears_badge_alerts_and_refetches() {
        let api = Rc::new(FakeNotifications::default());
        api.feeds.push(Ok(feed(3, &["x"])));
        api.mark.push(Ok(()));
        api.feeds.push(Ok(feed(0, &["x"])));
        let session = session_at("/dashboard");
        let vm = NotificationViewModel::new(api, session.context.clone());
        block_on(vm.refresh());

        block_on(vm.mark_all_read());
        assert_eq!(vm.feed().get().unread_count, 0);
        assert_eq!(
            session.alerts.messages(),
            vec![(MARK_READ_SUCCESS_TEXT.to_string(), AlertLevel::Success)]
        );
    }

    #[test]
    fn mark_all_read_failure_keeps_count() {
        let api = Rc::new(FakeNotifications::default());
        api.feeds.push(Ok(feed(3, &["x"])));
        api.mark.push(Err(ApiError::Server { status: 500, detail: None }));
        let session = session_at("/dashboard");
        let vm = NotificationViewModel::new(api, session.context.clone());
        block_on(vm.refresh());

        block_on(vm.mark_all_read());
        assert_eq!(vm.feed().get().unread_count, 3);
        assert_eq!(session.alerts.last(), Some((MARK_READ_ERROR_TEXT.to_string(), AlertLevel::Danger)));
    }
}
