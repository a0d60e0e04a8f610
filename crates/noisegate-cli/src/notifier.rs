//! Terminal alerts for timer events.

use anyhow::Result;
use log::debug;
use noisegate_core::TimerEvent;
use tokio::sync::broadcast::{error::TryRecvError, Receiver};

use crate::renderer::TerminalRenderer;

/// Subscriber that turns timer events into terminal messages.
pub struct Notifier {
    events: Receiver<TimerEvent>,
}

impl Notifier {
    pub fn new(events: Receiver<TimerEvent>) -> Self {
        Self { events }
    }

    /// Renders every event received so far.
    pub fn drain(&mut self, renderer: &TerminalRenderer) -> Result<()> {
        loop {
            match self.events.try_recv() {
                Ok(event) => renderer.render(&message(&event))?,
                Err(TryRecvError::Lagged(missed)) => debug!("Missed {missed} timer events"),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return Ok(()),
            }
        }
    }
}

/// Markdown for one event. Expiry rings the terminal bell.
fn message(event: &TimerEvent) -> String {
    match event {
        TimerEvent::Expired { text, .. } => {
            format!("\x07\n## Time is up\n\n{text}\n\nMark it done or give it more time.\n")
        }
        TimerEvent::MissionComplete { one_thing, .. } => {
            format!("\n## Mission complete\n\n{one_thing}\n")
        }
    }
}
