use serde::Serialize;

/// 抽籤過程中對外發出的事件，`attempt` 從 1 起算
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DrawEvent {
    AttemptFinished { attempt: usize, succeeded: bool },
    Succeeded { total_attempts: usize },
    Exhausted { max_attempts: usize, reason: String },
}

pub trait DrawObserver {
    fn on_event(&mut self, event: &DrawEvent);
}

impl<F: FnMut(&DrawEvent)> DrawObserver for F {
    fn on_event(&mut self, event: &DrawEvent) {
        self(event)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DrawObserver for NoopObserver {
    fn on_event(&mut self, _event: &DrawEvent) {}
}

/// 收集所有事件，測試與統計用
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<DrawEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[DrawEvent] {
        &self.events
    }

    pub fn attempts_made(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DrawEvent::AttemptFinished { .. }))
            .count()
    }

    pub fn attempts_used(&self) -> Option<usize> {
        self.events.iter().find_map(|e| match e {
            DrawEvent::Succeeded { total_attempts } => Some(*total_attempts),
            _ => None,
        })
    }
}

impl DrawObserver for EventLog {
    fn on_event(&mut self, event: &DrawEvent) {
        self.events.push(event.clone());
    }
}

/// 把事件寫進 tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DrawObserver for TracingObserver {
    fn on_event(&mut self, event: &DrawEvent) {
        match event {
            DrawEvent::AttemptFinished { attempt, succeeded } => {
                tracing::debug!(attempt = *attempt, succeeded = *succeeded, "draw attempt finished");
            }
            DrawEvent::Succeeded { total_attempts } => {
                tracing::info!("🎁 Assignments successfully generated on attempt {}", total_attempts);
            }
            DrawEvent::Exhausted {
                max_attempts,
                reason,
            } => {
                tracing::error!(
                    "❌ Assignment not possible after {} attempts (last failure: {})",
                    max_attempts,
                    reason
                );
            }
        }
    }
}

/// 同時轉送給兩個 observer
#[derive(Debug, Default, Clone)]
pub struct Tee<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: DrawObserver, B: DrawObserver> DrawObserver for Tee<A, B> {
    fn on_event(&mut self, event: &DrawEvent) {
        self.first.on_event(event);
        self.second.on_event(event);
    }
}
