use serde::Deserialize;
use std::time::Duration;

/// Fixed, non-adaptive pause schedule between browser interactions. The
/// durations mirror the rate limits the source sites tolerate; none of them
/// react to errors.
#[derive(Debug, Clone, Deserialize)]
pub struct PacingPolicy {
    /// Before clicking through to a product detail page.
    #[serde(default = "default_listing_pause_ms")]
    pub listing_pause_ms: u64,
    /// Before opening the specifications tab on a detail page.
    #[serde(default = "default_tab_pause_ms")]
    pub tab_pause_ms: u64,
    /// Before navigating back to the listing.
    #[serde(default = "default_back_pause_ms")]
    pub back_pause_ms: u64,
    /// Before each marketplace search.
    #[serde(default = "default_search_pause_ms")]
    pub search_pause_ms: u64,
    /// After focusing the search box.
    #[serde(default = "default_focus_pause_ms")]
    pub focus_pause_ms: u64,
    /// After typing the query.
    #[serde(default = "default_type_pause_ms")]
    pub type_pause_ms: u64,
    /// After submitting the search.
    #[serde(default = "default_submit_pause_ms")]
    pub submit_pause_ms: u64,
    /// After each sort interaction.
    #[serde(default = "default_sort_pause_ms")]
    pub sort_pause_ms: u64,
    /// Cooldown after every 10th search.
    #[serde(default = "default_cooldown_every_10_ms")]
    pub cooldown_every_10_ms: u64,
    /// Additional cooldown after every 50th search.
    #[serde(default = "default_cooldown_every_50_ms")]
    pub cooldown_every_50_ms: u64,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            listing_pause_ms: default_listing_pause_ms(),
            tab_pause_ms: default_tab_pause_ms(),
            back_pause_ms: default_back_pause_ms(),
            search_pause_ms: default_search_pause_ms(),
            focus_pause_ms: default_focus_pause_ms(),
            type_pause_ms: default_type_pause_ms(),
            submit_pause_ms: default_submit_pause_ms(),
            sort_pause_ms: default_sort_pause_ms(),
            cooldown_every_10_ms: default_cooldown_every_10_ms(),
            cooldown_every_50_ms: default_cooldown_every_50_ms(),
        }
    }
}

impl PacingPolicy {
    /// Cooldowns owed once `completed` searches have finished. Multiples of 50
    /// are also multiples of 10, so both cooldowns fire there.
    pub fn cooldowns_after(&self, completed: usize) -> Vec<Duration> {
        let mut pauses = Vec::new();
        if completed > 0 && completed % 10 == 0 {
            pauses.push(ms(self.cooldown_every_10_ms));
        }
        if completed > 0 && completed % 50 == 0 {
            pauses.push(ms(self.cooldown_every_50_ms));
        }
        pauses
    }
}

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Where the pauses actually go. Production sleeps the thread; tests record
/// or drop them.
pub trait Pacer {
    fn pause(&mut self, duration: Duration);
}

pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

#[derive(Debug, Default)]
pub struct NoopPacer;

impl Pacer for NoopPacer {
    fn pause(&mut self, _duration: Duration) {}
}

#[derive(Debug, Default)]
pub struct RecordingPacer {
    pub pauses: Vec<Duration>,
}

impl Pacer for RecordingPacer {
    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}

fn default_listing_pause_ms() -> u64 {
    500
}

fn default_tab_pause_ms() -> u64 {
    500
}

fn default_back_pause_ms() -> u64 {
    500
}

fn default_search_pause_ms() -> u64 {
    1000
}

fn default_focus_pause_ms() -> u64 {
    300
}

fn default_type_pause_ms() -> u64 {
    1000
}

fn default_submit_pause_ms() -> u64 {
    500
}

fn default_sort_pause_ms() -> u64 {
    1000
}

fn default_cooldown_every_10_ms() -> u64 {
    60_000
}

fn default_cooldown_every_50_ms() -> u64 {
    80_000
}
