mod event_printer;
mod event_recorder;

use std::fmt;

use crate::model::*;

pub use event_printer::EventPrinter;
pub use event_recorder::EventRecorder;

// 確定した状態遷移の通知を受け取る (状態を変更することはできない)
pub trait Listener: Send {
    fn notify_event(&mut self, _stg: &Stage, _event: &Event) {}
}

impl fmt::Debug for dyn Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener")
    }
}

// 登録順にイベントを配信する
#[derive(Debug, Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(listeners: Vec<Box<dyn Listener>>) -> Self {
        Self { listeners }
    }

    pub fn push(&mut self, listener: Box<dyn Listener>) {
        self.listeners.push(listener);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Listener for EventBus {
    fn notify_event(&mut self, stg: &Stage, event: &Event) {
        for l in &mut self.listeners {
            l.notify_event(stg, event);
        }
    }
}
