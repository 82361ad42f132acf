//! Reveal loop for the loading screen.
//!
//! `FactTyper` picks a few facts at random and reveals them one character at
//! a time until a fixed duration elapses. Frames are published on a `watch`
//! channel so the frontend always sees the latest text without the loop
//! ever blocking the event loop.

mod facts;

pub use facts::{DEFAULT_FACTS, default_facts};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::TyperConfig;

/// Latest state of the reveal loop.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TyperFrame {
    /// Position of the fact being revealed within the picked set.
    pub fact_index: usize,
    /// Characters revealed so far.
    pub text: String,
    /// Set once the loop has run for its full duration.
    pub finished: bool,
}

/// How a reveal loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TyperOutcome {
    Completed { frames: usize, elapsed: Duration },
    Cancelled { frames: usize },
}

enum Tick {
    Continue,
    DeadlineReached,
    Cancelled,
}

/// Timed, character-by-character reveal of rotating facts.
#[derive(Debug, Clone)]
pub struct FactTyper {
    pool: Vec<String>,
    facts_per_cycle: usize,
    char_delay: Duration,
    pause: Duration,
    total_duration: Duration,
}

impl Default for FactTyper {
    fn default() -> Self {
        Self::from_config(&TyperConfig::default())
    }
}

impl FactTyper {
    pub fn from_config(config: &TyperConfig) -> Self {
        Self {
            pool: config.facts.clone(),
            facts_per_cycle: config.facts_per_cycle,
            char_delay: config.char_delay(),
            pause: config.pause(),
            total_duration: config.total_duration(),
        }
    }

    /// Picks distinct facts uniformly at random from the pool.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        self.pool
            .choose_multiple(rng, self.facts_per_cycle)
            .cloned()
            .collect()
    }

    /// Reveals `facts` in a loop until the total duration elapses.
    ///
    /// Every wait is clamped to the deadline, so the loop ends exactly when
    /// the duration is up, truncating the fact in progress. Cancelling the
    /// token stops the loop at once; no frame is published afterwards.
    pub async fn run(
        &self,
        facts: &[String],
        frames: &watch::Sender<TyperFrame>,
        cancel: &CancellationToken,
    ) -> TyperOutcome {
        let started = Instant::now();
        let deadline = started + self.total_duration;
        let mut published = 0usize;

        frames.send_replace(TyperFrame::default());

        if facts.iter().all(|fact| fact.is_empty()) {
            return match Self::tick(self.total_duration, deadline, cancel).await {
                Tick::Cancelled => TyperOutcome::Cancelled { frames: published },
                _ => self.finish(frames, started, published),
            };
        }

        loop {
            for (fact_index, fact) in facts.iter().enumerate() {
                let mut shown = String::with_capacity(fact.len());
                for ch in fact.chars() {
                    match Self::tick(self.char_delay, deadline, cancel).await {
                        Tick::Continue => {}
                        Tick::DeadlineReached => return self.finish(frames, started, published),
                        Tick::Cancelled => return TyperOutcome::Cancelled { frames: published },
                    }
                    shown.push(ch);
                    frames.send_replace(TyperFrame {
                        fact_index,
                        text: shown.clone(),
                        finished: false,
                    });
                    published += 1;
                }

                match Self::tick(self.pause, deadline, cancel).await {
                    Tick::Continue => {}
                    Tick::DeadlineReached => return self.finish(frames, started, published),
                    Tick::Cancelled => return TyperOutcome::Cancelled { frames: published },
                }
            }
        }
    }

    fn finish(
        &self,
        frames: &watch::Sender<TyperFrame>,
        started: Instant,
        published: usize,
    ) -> TyperOutcome {
        frames.send_modify(|frame| frame.finished = true);
        TyperOutcome::Completed {
            frames: published,
            elapsed: started.elapsed(),
        }
    }

    async fn tick(step: Duration, deadline: Instant, cancel: &CancellationToken) -> Tick {
        let wake = (Instant::now() + step).min(deadline);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Tick::Cancelled,
            _ = tokio::time::sleep_until(wake) => {
                if wake >= deadline {
                    Tick::DeadlineReached
                } else {
                    Tick::Continue
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn typer(char_delay_ms: u64, pause_ms: u64, total_ms: u64) -> FactTyper {
        FactTyper::from_config(&TyperConfig {
            char_delay_ms,
            pause_ms,
            total_duration_ms: total_ms,
            ..TyperConfig::default()
        })
    }

    #[test]
    fn test_pick_returns_distinct_facts_from_pool() {
        let typer = FactTyper::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = typer.pick(&mut rng);
            assert_eq!(picked.len(), 3);
            let unique: HashSet<&String> = picked.iter().collect();
            assert_eq!(unique.len(), 3);
            assert!(picked.iter().all(|fact| DEFAULT_FACTS.contains(&fact.as_str())));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_within_one_char_delay_of_duration() {
        let typer = FactTyper::default();
        let facts = typer.pick(&mut StdRng::seed_from_u64(1));
        let (tx, rx) = watch::channel(TyperFrame::default());
        let started = Instant::now();

        let outcome = typer.run(&facts, &tx, &CancellationToken::new()).await;

        let wall = started.elapsed();
        assert!(wall <= Duration::from_secs(6) + Duration::from_millis(25));
        match outcome {
            TyperOutcome::Completed { frames, elapsed } => {
                assert!(frames > 0);
                assert!(elapsed <= Duration::from_secs(6) + Duration::from_millis(25));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(rx.borrow().finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_reveals_characters_in_order() {
        let typer = typer(10, 50, 1_000);
        let facts = vec!["abc".to_string(), "de".to_string()];
        let (tx, mut rx) = watch::channel(TyperFrame::default());
        let cancel = CancellationToken::new();

        let handle = {
            let typer = typer.clone();
            let facts = facts.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { typer.run(&facts, &tx, &cancel).await })
        };

        let mut seen = Vec::new();
        while seen.len() < 5 {
            rx.changed().await.unwrap();
            let frame = rx.borrow_and_update().clone();
            if !frame.text.is_empty() {
                seen.push((frame.fact_index, frame.text));
            }
        }
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(
            seen,
            vec![
                (0, "a".to_string()),
                (0, "ab".to_string()),
                (0, "abc".to_string()),
                (1, "d".to_string()),
                (1, "de".to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_loops_and_truncates_in_progress_fact() {
        // One cycle takes 3 * 10 + 20 = 50ms, so 120ms covers two full cycles
        // and cuts the third one after its first character.
        let typer = typer(10, 20, 120);
        let facts = vec!["xyz".to_string()];
        let (tx, rx) = watch::channel(TyperFrame::default());

        let outcome = typer.run(&facts, &tx, &CancellationToken::new()).await;

        let TyperOutcome::Completed { frames, elapsed } = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert_eq!(frames, 7);
        assert!(elapsed >= Duration::from_millis(120));
        assert!(elapsed <= Duration::from_millis(130));
        let last = rx.borrow().clone();
        assert_eq!(last.text, "x");
        assert!(last.finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_loop_and_discards_updates() {
        let typer = FactTyper::default();
        let facts = typer.pick(&mut StdRng::seed_from_u64(3));
        let (tx, rx) = watch::channel(TyperFrame::default());
        let cancel = CancellationToken::new();

        let handle = {
            let typer = typer.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { typer.run(&facts, &tx, &cancel).await })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
        let outcome = handle.await.unwrap();
        let frozen = rx.borrow().clone();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(matches!(outcome, TyperOutcome::Cancelled { .. }));
        assert!(!frozen.finished);
        assert_eq!(*rx.borrow(), frozen);
    }
}
