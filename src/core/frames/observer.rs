use std::sync::mpsc::{self, Receiver, Sender};

use log::debug;

use crate::api::models::frames::BrowserEvent;

/// 浏览状态变化的接收方，替代直接操作界面
pub trait BrowserObserver: Send + Sync {
    fn on_event(&self, event: BrowserEvent);
}

/// 把事件转发到 channel，由宿主轮询取走
pub struct ChannelObserver {
    sender: Sender<BrowserEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, Receiver<BrowserEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl BrowserObserver for ChannelObserver {
    fn on_event(&self, event: BrowserEvent) {
        if self.sender.send(event).is_err() {
            debug!("event receiver dropped, discarding event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_observer_forwards_in_order() {
        let (observer, rx) = ChannelObserver::new();
        observer.on_event(BrowserEvent::UploadProgress(10));
        observer.on_event(BrowserEvent::GalleryEmpty);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![BrowserEvent::UploadProgress(10), BrowserEvent::GalleryEmpty]
        );
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (observer, rx) = ChannelObserver::new();
        drop(rx);
        observer.on_event(BrowserEvent::GalleryEmpty);
    }
}
