//! Async helper that plays out deferred opponent moves on tokio timers.

use std::{collections::VecDeque, time::Duration};

use shared::{
    error::ForumError,
    protocol::{Command, ForumEvent},
};

use crate::app::ForumApp;

/// Applies `command`, hands every resulting event to `on_event`, and for each
/// scheduled opponent move waits out its delay and resolves it. Returns once
/// no deferred work is left.
pub async fn apply_and_settle<F>(
    app: &mut ForumApp,
    command: Command,
    mut on_event: F,
) -> Result<(), ForumError>
where
    F: FnMut(&ForumEvent),
{
    let mut queue = VecDeque::from([(Duration::ZERO, command)]);

    while let Some((delay, command)) = queue.pop_front() {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        for event in app.apply(command)? {
            on_event(&event);
            if let ForumEvent::OpponentScheduled(ticket) = event {
                queue.push_back((
                    Duration::from_millis(ticket.delay_ms),
                    Command::ResolveOpponent { ticket },
                ));
            }
        }
    }

    Ok(())
}
