//! [`AnnouncementSink`] implementations.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::api::{Announcement, AnnouncementSink, Notice, NoticeLevel};
use crate::events::{Event, EventBus};

/// Publishes chat and notices on the [`EventBus`].
#[derive(Clone)]
pub struct BusSink {
    bus: EventBus,
}

impl BusSink {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl AnnouncementSink for BusSink {
    async fn announce(&self, announcement: Announcement) {
        info!(speaker = %announcement.speaker, text = %announcement.text, "chat");
        self.bus.publish(Event::Chat(announcement));
    }

    async fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!(text = %notice.text, "notice"),
            NoticeLevel::Warning | NoticeLevel::Error => {
                warn!(level = %notice.level, text = %notice.text, "notice")
            }
        }
        self.bus.publish(Event::Notice(notice));
    }
}

/// Keeps everything it receives, for assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    announcements: Mutex<Vec<Announcement>>,
    notices: Mutex<Vec<Notice>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn announcements(&self) -> Vec<Announcement> {
        lock(&self.announcements).clone()
    }

    /// Announcement texts in the order they were posted.
    pub fn texts(&self) -> Vec<String> {
        lock(&self.announcements)
            .iter()
            .map(|a| a.text.clone())
            .collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }

    pub fn clear(&self) {
        lock(&self.announcements).clear();
        lock(&self.notices).clear();
    }
}

#[async_trait]
impl AnnouncementSink for RecordingSink {
    async fn announce(&self, announcement: Announcement) {
        lock(&self.announcements).push(announcement);
    }

    async fn notify(&self, notice: Notice) {
        lock(&self.notices).push(notice);
    }
}
