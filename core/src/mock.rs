//! Synthetic combat snapshots for UI work without a running game

use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

use relink_act_types::formatting::format_mmss;
use relink_act_types::{CombatData, CombatDuration};

/// Title carried by every mock snapshot
pub const MOCK_TITLE: &str = "Mock Combat";

/// Publishes a random [`CombatData`] once per period until stopped.
#[derive(Debug, Default)]
pub struct MockCombatData {
    task: Option<JoinHandle<()>>,
}

impl MockCombatData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the publishing task. Must be called inside a tokio runtime.
    ///
    /// The first snapshot arrives one `period` after starting. Starting an
    /// already running generator keeps the existing task.
    pub fn start<F>(&mut self, period: Duration, callback: F)
    where
        F: Fn(CombatData) + Send + 'static,
    {
        if self.is_running() {
            tracing::warn!("mock combat data already started");
            return;
        }

        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                // ThreadRng is !Send; it must not be held across the await
                callback(fake_combat_data(&mut rand::rng()));
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for MockCombatData {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One random snapshot: duration under 10 s, party figures under 100, no actors.
pub fn fake_combat_data(rng: &mut impl Rng) -> CombatData {
    let ms: i64 = rng.random_range(0..10_000);
    let seconds = ((ms + 500) / 1000) as u64;
    CombatData {
        title: MOCK_TITLE.to_string(),
        duration: CombatDuration {
            ms,
            seconds,
            minutes: seconds / 60,
            mmss: format_mmss(seconds),
        },
        party_damage: rng.random_range(0..100),
        party_dps: rng.random_range(0..100),
        party_trailing_dps: rng.random_range(0..100),
        actors: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn test_fake_data_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let data = fake_combat_data(&mut rng);
            assert_eq!(data.title, MOCK_TITLE);
            assert!((0..10_000).contains(&data.duration.ms));
            assert!(data.duration.seconds <= 10);
            assert_eq!(data.duration.minutes, 0);
            assert!(data.party_damage < 100);
            assert!(data.party_dps < 100);
            assert!(data.party_trailing_dps < 100);
            assert!(data.actors.is_empty());
        }
    }

    #[test]
    fn test_same_seed_same_snapshot() {
        let first = fake_combat_data(&mut StdRng::seed_from_u64(7));
        let second = fake_combat_data(&mut StdRng::seed_from_u64(7));
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_publishes_once_per_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut mock = MockCombatData::new();
        mock.start(Duration::from_secs(1), move |data| {
            let _ = tx.send((Instant::now(), data));
        });
        assert!(mock.is_running());

        let started = Instant::now();
        let (first, _) = rx.recv().await.unwrap();
        let (second, _) = rx.recv().await.unwrap();
        assert_eq!(first - started, Duration::from_secs(1));
        assert_eq!(second - first, Duration::from_secs(1));

        mock.stop();
        tokio::task::yield_now().await;
        assert!(!mock.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_keeps_first_task() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut mock = MockCombatData::new();
        let first_tx = tx.clone();
        mock.start(Duration::from_secs(1), move |_| {
            let _ = first_tx.send("first");
        });
        mock.start(Duration::from_secs(1), move |_| {
            let _ = tx.send("second");
        });

        assert_eq!(rx.recv().await, Some("first"));
        mock.stop();
        // Both senders are gone once the task is aborted and the second callback was dropped
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let mut mock = MockCombatData::new();
        mock.stop();
        mock.start(Duration::from_secs(60), |_| {});
        mock.stop();
        mock.stop();
        assert!(!mock.is_running());
    }
}
