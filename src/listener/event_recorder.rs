use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use super::Listener;
use crate::model::*;

pub type EventLog = Arc<Mutex<Vec<Value>>>;

// [EventRecorder]
// イベントをjsonとして記録 (牌譜の出力やテストでの検証用)
#[derive(Debug, Default)]
pub struct EventRecorder {
    record: EventLog,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    // 記録先の共有参照 Listenerとして登録した後も参照できる
    pub fn log(&self) -> EventLog {
        self.record.clone()
    }
}

impl Listener for EventRecorder {
    fn notify_event(&mut self, stg: &Stage, event: &Event) {
        let value = match serde_json::to_value(event) {
            Ok(v) => json!({"step": stg.step, "event": v}),
            Err(e) => {
                log::error!("failed to serialize event: {}", e);
                return;
            }
        };
        match self.record.lock() {
            Ok(mut r) => r.push(value),
            Err(e) => log::error!("event log is poisoned: {}", e),
        }
    }
}
