use std::time::{Duration, Instant};

pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(1);

/// Debounce for journal saves: a burst of edits becomes one save once the
/// text has been quiet for `interval`. The caller supplies the clock.
#[derive(Debug, Clone)]
pub struct JournalAutosave {
    interval: Duration,
    last_edit: Option<Instant>,
}

impl Default for JournalAutosave {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_INTERVAL)
    }
}

impl JournalAutosave {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_edit: None,
        }
    }

    pub fn note_edit(&mut self, now: Instant) {
        self.last_edit = Some(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.last_edit.is_some()
    }

    pub fn due(&self, now: Instant) -> bool {
        self.last_edit
            .is_some_and(|edited| now.saturating_duration_since(edited) >= self.interval)
    }

    pub fn mark_saved(&mut self) {
        self.last_edit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_coalesce_until_quiet() {
        let start = Instant::now();
        let mut autosave = JournalAutosave::new(Duration::from_millis(500));
        assert!(!autosave.due(start));
        autosave.note_edit(start);
        autosave.note_edit(start + Duration::from_millis(400));
        assert!(!autosave.due(start + Duration::from_millis(800)));
        assert!(autosave.due(start + Duration::from_millis(900)));
        autosave.mark_saved();
        assert!(!autosave.is_dirty());
        assert!(!autosave.due(start + Duration::from_secs(10)));
    }
}
