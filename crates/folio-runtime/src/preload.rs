#![forbid(unsafe_code)]

//! Image preloader.
//!
//! Tracks a fixed list of image URLs from "not started" to "settled"
//! (loaded or failed) and reports an integer completion percentage. The
//! loading screen stays up until every image has settled, the hard timeout
//! elapses, or the visitor skips it, followed by a short cosmetic delay.
//!
//! # Invariants
//!
//! 1. `loaded_count` never exceeds `total_count`.
//! 2. Each URL is counted at most once, whether it loaded or failed, even if
//!    the host reports it repeatedly.
//! 3. `is_done` flips to true exactly once. Later settlements are ignored.
//! 4. Reaching the timeout forces the percentage to 100 regardless of how
//!    many images actually settled.
//! 5. After [`Preloader::cancel`] nothing is emitted and no load is issued.
//!
//! # Timeline
//!
//! ```text
//! start ──20ms──▶ begin_load(url…)       settle… ──▶ Done(AllSettled) ──300ms──▶ LoadingFinished
//!   └──────────────────6000ms──────────────────────▶ Done(TimedOut)   ──220ms──▶ LoadingFinished
//! ```

use core::time::Duration;

use folio_backend::AssetLoader;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cancellation::CancellationToken;
use crate::config::PreloadConfig;
use crate::timer::TimerQueue;

/// Why the preload completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoneReason {
    /// Every URL settled.
    AllSettled,
    /// The hard timeout elapsed first.
    TimedOut,
    /// The URL list was empty.
    Empty,
    /// The visitor skipped the loading screen.
    Bypassed,
}

impl DoneReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllSettled => "all_settled",
            Self::TimedOut => "timed_out",
            Self::Empty => "empty",
            Self::Bypassed => "bypassed",
        }
    }
}

/// Output of the preloader, consumed by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadEvent {
    /// Percentage changed.
    Progress(u8),
    /// The preload completed.
    Done(DoneReason),
    /// The loading screen should be hidden.
    LoadingFinished,
}

/// Snapshot of preload progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreloadState {
    pub loaded_count: usize,
    pub total_count: usize,
    pub percentage: u8,
    pub is_done: bool,
}

/// Percentage of `loaded` over `total`, rounded half up. An empty list is
/// complete.
#[must_use]
pub fn percentage(loaded: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let loaded = loaded.min(total) as u64;
    let total = total as u64;
    ((200 * loaded + total) / (2 * total)) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PreloadTimer {
    StartLoads,
    Timeout,
    Finish,
}

/// Preload state machine. Host callbacks drive it; it never blocks.
#[derive(Debug)]
pub struct Preloader {
    urls: Vec<String>,
    settled: Vec<bool>,
    state: PreloadState,
    done_reason: Option<DoneReason>,
    loading: bool,
    started: bool,
    config: PreloadConfig,
    timers: TimerQueue<PreloadTimer>,
    token: CancellationToken,
}

impl Preloader {
    /// Create a preloader for `urls`. Duplicate URLs are tracked once.
    #[must_use]
    pub fn new(urls: Vec<String>, config: &PreloadConfig, token: CancellationToken) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(urls.len());
        for url in urls {
            if !unique.contains(&url) {
                unique.push(url);
            }
        }
        let total = unique.len();
        Self {
            settled: vec![false; total],
            urls: unique,
            state: PreloadState {
                loaded_count: 0,
                total_count: total,
                percentage: 0,
                is_done: false,
            },
            done_reason: None,
            loading: true,
            started: false,
            config: config.clone(),
            timers: TimerQueue::new(),
            token,
        }
    }

    /// Begin the preload at `now`. Only the first call has an effect.
    pub fn start(&mut self, now: Duration) -> Vec<PreloadEvent> {
        if self.started || self.token.is_cancelled() {
            return Vec::new();
        }
        self.started = true;
        if self.urls.is_empty() {
            debug!("preload: nothing to load");
            self.state.percentage = 100;
            let mut events = vec![PreloadEvent::Progress(100)];
            events.extend(self.finish(DoneReason::Empty, now));
            return events;
        }
        debug!(total = self.urls.len(), "preload: started");
        self.timers.schedule(
            PreloadTimer::StartLoads,
            now + Duration::from_millis(self.config.load_start_delay_ms),
        );
        self.timers.schedule(
            PreloadTimer::Timeout,
            now + Duration::from_millis(self.config.timeout_ms),
        );
        Vec::new()
    }

    /// Fire due timers. Image requests are issued through `loader`.
    pub fn poll<L: AssetLoader + ?Sized>(
        &mut self,
        now: Duration,
        loader: &mut L,
    ) -> Vec<PreloadEvent> {
        if self.token.is_cancelled() {
            return Vec::new();
        }
        let mut events = Vec::new();
        for timer in self.timers.drain_due(now) {
            match timer {
                PreloadTimer::StartLoads => {
                    if self.state.is_done {
                        continue;
                    }
                    for (url, settled) in self.urls.iter().zip(&self.settled) {
                        if !settled {
                            loader.begin_load(url);
                        }
                    }
                }
                PreloadTimer::Timeout => {
                    if !self.state.is_done {
                        warn!(
                            loaded = self.state.loaded_count,
                            total = self.state.total_count,
                            "preload: timed out"
                        );
                        self.state.percentage = 100;
                        events.push(PreloadEvent::Progress(100));
                        events.extend(self.finish(DoneReason::TimedOut, now));
                    }
                }
                PreloadTimer::Finish => {
                    if self.loading {
                        self.loading = false;
                        events.push(PreloadEvent::LoadingFinished);
                    }
                }
            }
        }
        events
    }

    /// Record that `url` settled. Unknown URLs, repeats, and settlements
    /// after completion are ignored.
    pub fn on_settled(&mut self, url: &str, ok: bool, now: Duration) -> Vec<PreloadEvent> {
        if self.token.is_cancelled() || self.state.is_done {
            return Vec::new();
        }
        let Some(idx) = self.urls.iter().position(|u| u == url) else {
            debug!(url, "preload: settlement for unknown url ignored");
            return Vec::new();
        };
        if self.settled[idx] {
            return Vec::new();
        }
        self.settled[idx] = true;
        if !ok {
            debug!(url, "preload: image failed, counted as settled");
        }
        self.state.loaded_count += 1;
        let pct = percentage(self.state.loaded_count, self.state.total_count);
        let mut events = Vec::new();
        if pct != self.state.percentage {
            self.state.percentage = pct;
            events.push(PreloadEvent::Progress(pct));
        }
        if self.state.loaded_count == self.state.total_count {
            events.extend(self.finish(DoneReason::AllSettled, now));
        }
        events
    }

    /// Skip the loading screen immediately.
    pub fn bypass(&mut self, now: Duration) -> Vec<PreloadEvent> {
        if self.token.is_cancelled() || !self.loading {
            return Vec::new();
        }
        let mut events = Vec::new();
        if !self.state.is_done {
            events.extend(self.finish(DoneReason::Bypassed, now));
        }
        self.timers.cancel(PreloadTimer::Finish);
        self.loading = false;
        events.push(PreloadEvent::LoadingFinished);
        events
    }

    /// Drop every pending timer. Idempotent.
    pub fn cancel(&mut self) {
        let dropped = self.timers.clear();
        if dropped > 0 {
            debug!(dropped, "preload: timers cancelled");
        }
    }

    fn finish(&mut self, reason: DoneReason, now: Duration) -> Vec<PreloadEvent> {
        self.state.is_done = true;
        self.done_reason = Some(reason);
        self.timers.cancel(PreloadTimer::Timeout);
        self.timers.cancel(PreloadTimer::StartLoads);
        let delay_ms = match reason {
            DoneReason::AllSettled => self.config.finish_delay_ms,
            DoneReason::TimedOut => self.config.timeout_finish_delay_ms,
            DoneReason::Empty => self.config.empty_finish_delay_ms,
            DoneReason::Bypassed => 0,
        };
        if reason != DoneReason::Bypassed {
            self.timers
                .schedule(PreloadTimer::Finish, now + Duration::from_millis(delay_ms));
        }
        info!(
            reason = reason.as_str(),
            loaded = self.state.loaded_count,
            total = self.state.total_count,
            "preload done"
        );
        vec![PreloadEvent::Done(reason)]
    }

    #[must_use]
    pub fn state(&self) -> PreloadState {
        self.state
    }

    /// Whether the loading screen is still shown.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn done_reason(&self) -> Option<DoneReason> {
        self.done_reason
    }

    #[must_use]
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        if self.token.is_cancelled() {
            return None;
        }
        self.timers.next_deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancellation::CancellationSource;

    #[derive(Default)]
    struct Loads(Vec<String>);

    impl AssetLoader for Loads {
        fn begin_load(&mut self, url: &str) {
            self.0.push(url.to_owned());
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("/img{i}.jpg")).collect()
    }

    fn preloader(n: usize) -> Preloader {
        Preloader::new(urls(n), &PreloadConfig::default(), CancellationToken::never())
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(0, 3), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(3, 3), 100);
        assert_eq!(percentage(0, 0), 100);
        assert_eq!(percentage(9, 3), 100);
    }

    #[test]
    fn loads_issue_after_start_delay() {
        let mut p = preloader(2);
        let mut loads = Loads::default();
        assert!(p.start(ms(0)).is_empty());
        assert!(p.poll(ms(19), &mut loads).is_empty());
        assert!(loads.0.is_empty());
        p.poll(ms(20), &mut loads);
        assert_eq!(loads.0, urls(2));
    }

    #[test]
    fn all_settled_path() {
        let mut p = preloader(2);
        let mut loads = Loads::default();
        p.start(ms(0));
        p.poll(ms(20), &mut loads);
        assert_eq!(p.on_settled("/img0.jpg", true, ms(50)), vec![PreloadEvent::Progress(50)]);
        assert_eq!(
            p.on_settled("/img1.jpg", false, ms(80)),
            vec![
                PreloadEvent::Progress(100),
                PreloadEvent::Done(DoneReason::AllSettled)
            ]
        );
        assert!(p.state().is_done);
        assert!(p.is_loading());
        assert!(p.poll(ms(379), &mut loads).is_empty());
        assert_eq!(p.poll(ms(380), &mut loads), vec![PreloadEvent::LoadingFinished]);
        assert!(!p.is_loading());
        assert_eq!(p.next_deadline(), None);
    }

    #[test]
    fn duplicate_and_unknown_settlements_ignored() {
        let mut p = preloader(3);
        p.start(ms(0));
        p.on_settled("/img0.jpg", true, ms(1));
        assert!(p.on_settled("/img0.jpg", true, ms(2)).is_empty());
        assert!(p.on_settled("/nope.jpg", true, ms(3)).is_empty());
        assert_eq!(p.state().loaded_count, 1);
        assert_eq!(p.state().percentage, 33);
    }

    #[test]
    fn duplicate_urls_tracked_once() {
        let list = vec!["/a.jpg".to_owned(), "/a.jpg".to_owned(), "/b.jpg".to_owned()];
        let p = Preloader::new(list, &PreloadConfig::default(), CancellationToken::never());
        assert_eq!(p.state().total_count, 2);
    }

    #[test]
    fn timeout_forces_completion() {
        let mut p = preloader(3);
        let mut loads = Loads::default();
        p.start(ms(0));
        p.on_settled("/img0.jpg", true, ms(100));
        let events = p.poll(ms(6000), &mut loads);
        assert_eq!(
            events,
            vec![
                PreloadEvent::Progress(100),
                PreloadEvent::Done(DoneReason::TimedOut)
            ]
        );
        assert_eq!(p.state().percentage, 100);
        assert_eq!(p.state().loaded_count, 1);
        assert!(p.on_settled("/img1.jpg", true, ms(6100)).is_empty());
        assert_eq!(p.poll(ms(6220), &mut loads), vec![PreloadEvent::LoadingFinished]);
    }

    #[test]
    fn settling_before_timeout_cancels_it() {
        let mut p = preloader(1);
        let mut loads = Loads::default();
        p.start(ms(0));
        p.on_settled("/img0.jpg", true, ms(10));
        assert_eq!(p.poll(ms(6000), &mut loads), vec![PreloadEvent::LoadingFinished]);
        assert_eq!(p.done_reason(), Some(DoneReason::AllSettled));
    }

    #[test]
    fn empty_list_completes_immediately() {
        let mut p = preloader(0);
        let mut loads = Loads::default();
        assert_eq!(
            p.start(ms(0)),
            vec![PreloadEvent::Progress(100), PreloadEvent::Done(DoneReason::Empty)]
        );
        assert_eq!(
            p.state(),
            PreloadState {
                loaded_count: 0,
                total_count: 0,
                percentage: 100,
                is_done: true,
            }
        );
        assert_eq!(p.next_deadline(), Some(ms(160)));
        assert_eq!(p.poll(ms(160), &mut loads), vec![PreloadEvent::LoadingFinished]);
        assert!(loads.0.is_empty());
    }

    #[test]
    fn bypass_hides_loading_now() {
        let mut p = preloader(4);
        let mut loads = Loads::default();
        p.start(ms(0));
        assert_eq!(
            p.bypass(ms(5)),
            vec![
                PreloadEvent::Done(DoneReason::Bypassed),
                PreloadEvent::LoadingFinished
            ]
        );
        assert!(!p.is_loading());
        assert!(p.poll(ms(10_000), &mut loads).is_empty());
        assert!(loads.0.is_empty());
        assert!(p.bypass(ms(20)).is_empty());
    }

    #[test]
    fn bypass_during_cosmetic_delay() {
        let mut p = preloader(1);
        p.start(ms(0));
        p.on_settled("/img0.jpg", true, ms(1));
        assert_eq!(p.bypass(ms(2)), vec![PreloadEvent::LoadingFinished]);
        assert_eq!(p.done_reason(), Some(DoneReason::AllSettled));
    }

    #[test]
    fn cancelled_token_silences_everything() {
        let source = CancellationSource::new();
        let mut p = Preloader::new(urls(2), &PreloadConfig::default(), source.token());
        let mut loads = Loads::default();
        p.start(ms(0));
        source.cancel();
        p.cancel();
        assert!(p.poll(ms(10_000), &mut loads).is_empty());
        assert!(p.on_settled("/img0.jpg", true, ms(1)).is_empty());
        assert!(loads.0.is_empty());
        assert_eq!(p.next_deadline(), None);
        assert_eq!(p.state().loaded_count, 0);
    }
}
