//! Score, level and status text
//!
//! Pure text model; the front end copies the strings into the DOM.

use crate::sim::{CHAMPION_TEXT, GameEvent, ProgressionState};

/// Opacity of the status line while a message is showing / at rest
pub const MESSAGE_OPACITY_ACTIVE: f32 = 0.98;
pub const MESSAGE_OPACITY_IDLE: f32 = 0.85;

#[derive(Debug, Clone, PartialEq)]
struct StatusMessage {
    text: String,
    expires_at: u64,
}

/// Heads-up display text state
#[derive(Debug, Clone, Default)]
pub struct Hud {
    message: Option<StatusMessage>,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text` until tick `now + duration_ticks`; replaces any current message
    pub fn show(&mut self, text: &str, duration_ticks: u64, now: u64) {
        self.message = Some(StatusMessage {
            text: text.to_string(),
            expires_at: now + duration_ticks,
        });
    }

    /// Pick up status messages from the event stream
    pub fn observe(&mut self, event: &GameEvent, now: u64) {
        if let GameEvent::Status {
            text,
            duration_ticks,
        } = event
        {
            self.show(text, *duration_ticks, now);
        }
    }

    pub fn level_text(progression: &ProgressionState) -> String {
        format!("Level: {}", progression.level)
    }

    pub fn recycled_text(progression: &ProgressionState) -> String {
        format!("Recycled: {}", progression.recycled)
    }

    fn active(&self, now: u64) -> Option<&StatusMessage> {
        self.message.as_ref().filter(|m| now < m.expires_at)
    }

    /// Status line: the live message, or the level prompt once it expires.
    /// A finished run keeps the champion line.
    pub fn status_text(&self, progression: &ProgressionState, now: u64) -> String {
        match self.active(now) {
            Some(message) => message.text.clone(),
            None if progression.completed => CHAMPION_TEXT.to_string(),
            None => format!(
                "Level {} - clean {} items",
                progression.level, progression.trash_count
            ),
        }
    }

    pub fn status_opacity(&self, now: u64) -> f32 {
        if self.active(now).is_some() {
            MESSAGE_OPACITY_ACTIVE
        } else {
            MESSAGE_OPACITY_IDLE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_message_expires_to_level_prompt() {
        let progression = ProgressionState::new(&GameConfig::default());
        let mut hud = Hud::new();
        hud.observe(
            &GameEvent::Status {
                text: "Go!".to_string(),
                duration_ticks: 10,
            },
            100,
        );
        assert_eq!(hud.status_text(&progression, 105), "Go!");
        assert_eq!(hud.status_opacity(105), MESSAGE_OPACITY_ACTIVE);
        assert_eq!(hud.status_text(&progression, 110), "Level 1 - clean 3 items");
        assert_eq!(hud.status_opacity(110), MESSAGE_OPACITY_IDLE);
    }

    #[test]
    fn test_newer_message_replaces_older() {
        let progression = ProgressionState::new(&GameConfig::default());
        let mut hud = Hud::new();
        hud.show("first", 100, 0);
        hud.show("second", 5, 1);
        assert_eq!(hud.status_text(&progression, 2), "second");
        assert_eq!(hud.status_text(&progression, 50), "Level 1 - clean 3 items");
    }

    #[test]
    fn test_counters() {
        let config = GameConfig::default();
        let mut progression = ProgressionState::new(&config);
        progression.register_catch(&config);
        assert_eq!(Hud::level_text(&progression), "Level: 1");
        assert_eq!(Hud::recycled_text(&progression), "Recycled: 1");
    }

    #[test]
    fn test_finished_run_keeps_champion_line() {
        let config = GameConfig {
            max_level: 1,
            ..GameConfig::default()
        };
        let mut progression = ProgressionState::new(&config);
        for _ in 0..config.base_trash_count {
            progression.register_catch(&config);
        }
        assert!(progression.completed);

        let mut hud = Hud::new();
        hud.show(CHAMPION_TEXT, 10, 0);
        assert_eq!(hud.status_text(&progression, 5), CHAMPION_TEXT);
        assert_eq!(hud.status_text(&progression, 500), CHAMPION_TEXT);
        assert_eq!(hud.status_opacity(500), MESSAGE_OPACITY_IDLE);
    }

    #[test]
    fn test_other_events_ignored() {
        let progression = ProgressionState::new(&GameConfig::default());
        let mut hud = Hud::new();
        hud.observe(&GameEvent::BinPop, 0);
        assert_eq!(hud.status_text(&progression, 0), "Level 1 - clean 3 items");
    }
}
