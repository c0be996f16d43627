use web_time::Instant;

/// Turns wall-clock time into whole-second ticks for the engine.
///
/// The clock starts the first time it is synced while the game is running and resets as soon as it is synced while
/// the game is not.
#[derive(Debug, Default)]
pub(crate) struct Clock {
    started_at: Option<Instant>,
    ticks: u32,
}

impl Clock {
    /// Returns how many ticks are due since the previous sync.
    pub(crate) fn sync(&mut self, running: bool, now: Instant) -> u32 {
        match (running, self.started_at) {
            (false, _) => {
                self.started_at = None;
                self.ticks = 0;
                0
            }
            (true, None) => {
                self.started_at = Some(now);
                self.ticks = 0;
                0
            }
            (true, Some(started_at)) => {
                let due = now.saturating_duration_since(started_at).as_secs();
                let due = u32::try_from(due).unwrap_or(u32::MAX);
                let pending = due.saturating_sub(self.ticks);
                self.ticks = self.ticks.max(due);
                pending
            }
        }
    }
}
