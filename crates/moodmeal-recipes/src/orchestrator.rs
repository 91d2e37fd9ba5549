//! One recipe cycle per mood tap:
//! `Idle -> Resolving -> FetchingPrimary -> (FetchingFallback)? -> Ready`.
//!
//! Every tap takes a new generation number. Only the cycle holding the
//! latest generation may touch the visible state, so a slow earlier cycle
//! can never overwrite a later one. After `shutdown` nothing is applied.

use std::future::Future;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use moodmeal_core::{Config, RecipeError, RecipesConfig};
use moodmeal_weather::{WeatherCache, WeatherSnapshot, WeatherSource};
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::aggregate::ResultAggregator;
use crate::fetch::{FetchOptions, HttpRecipeFetcher, RecipeFetcher};
use crate::recipe::RecipeResultSet;
use crate::vibe::{MoodSymbol, Vibe, VibeResolver};

const NO_MATCHES_MESSAGE: &str = "Sorry, no recipes found. Please try again!";

/// Where the current cycle is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Resolving,
    FetchingPrimary,
    FetchingFallback,
    Ready,
}

/// Everything the display needs once a cycle is ready.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub generation: u64,
    pub mood: MoodSymbol,
    pub weather: WeatherSnapshot,
    /// Vibe from weather and mood; `None` when the weather was unknown
    pub vibe: Option<Vibe>,
    /// Vibe actually sent for the primary fetch
    pub query_vibe: Vibe,
    pub recipes: RecipeResultSet,
    pub used_fallback: bool,
}

impl CycleOutcome {
    /// True when the cycle finished with nothing to show
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// What the screen should show right now.
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeView {
    Idle,
    Loading { mood: MoodSymbol, phase: CyclePhase },
    Results(CycleOutcome),
    /// Finished with nothing to show; distinct from `Loading`
    NoMatches(CycleOutcome),
}

impl RecipeView {
    pub fn is_loading(&self) -> bool {
        matches!(self, RecipeView::Loading { .. })
    }

    /// Empty-state text, if this view needs one.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            RecipeView::NoMatches(_) => Some(NO_MATCHES_MESSAGE),
            _ => None,
        }
    }
}

/// Messages sent from spawned cycles back to the UI thread
#[derive(Debug)]
pub enum OrchestrationMessage {
    /// `outcome` is `None` when the cycle was superseded or torn down
    CycleDone {
        generation: u64,
        outcome: Option<CycleOutcome>,
    },
}

#[derive(Debug)]
struct SessionState {
    generation: u64,
    phase: CyclePhase,
    mood: Option<MoodSymbol>,
    outcome: Option<CycleOutcome>,
}

/// Runs recipe cycles for mood taps and owns the visible session state
pub struct OrchestrationController {
    resolver: VibeResolver,
    fetcher: Arc<dyn RecipeFetcher>,
    aggregator: ResultAggregator,
    options: FetchOptions,
    fallback_vibe: Vibe,
    state: Mutex<SessionState>,
    weather: RwLock<WeatherCache>,
    shutdown: CancellationToken,
}

impl OrchestrationController {
    /// Create a controller around any recipe fetcher
    pub fn new(
        config: &RecipesConfig,
        fetcher: Arc<dyn RecipeFetcher>,
        weather_refresh_minutes: u32,
    ) -> Self {
        Self {
            resolver: VibeResolver::default(),
            fetcher,
            aggregator: ResultAggregator::from_config(config),
            options: FetchOptions::from_config(config),
            fallback_vibe: Vibe::new(config.fallback_vibe.clone()),
            state: Mutex::new(SessionState {
                generation: 0,
                phase: CyclePhase::Idle,
                mood: None,
                outcome: None,
            }),
            weather: RwLock::new(WeatherCache::new(weather_refresh_minutes)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Controller backed by the HTTP recipe fetcher.
    pub fn from_config(config: &Config) -> Result<Self, RecipeError> {
        let fetcher = HttpRecipeFetcher::new(&config.recipes)?;
        Ok(Self::new(
            &config.recipes,
            Arc::new(fetcher),
            config.weather.refresh_minutes,
        ))
    }

    /// Replace the default weather/mood vibe table
    pub fn with_resolver(mut self, resolver: VibeResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Vibe used for the fallback fetch
    pub fn fallback_vibe(&self) -> &Vibe {
        &self.fallback_vibe
    }

    // --- weather ---

    /// Store the weather snapshot used by later cycles; ignored after shutdown
    pub fn set_weather(&self, snapshot: WeatherSnapshot) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.weather.write().update(snapshot);
    }

    /// Current weather snapshot (unavailable until one is set)
    pub fn weather(&self) -> WeatherSnapshot {
        self.weather.read().snapshot()
    }

    /// Ask the weather source for a fresh snapshot and keep it for the session.
    pub async fn refresh_weather(&self, source: &dyn WeatherSource) -> WeatherSnapshot {
        let snapshot = source.current().await;
        self.set_weather(snapshot.clone());
        snapshot
    }

    /// Refresh only when the cached snapshot is older than the refresh interval
    pub async fn refresh_weather_if_stale(&self, source: &dyn WeatherSource) -> WeatherSnapshot {
        if !self.weather.read().is_stale() {
            return self.weather();
        }
        self.refresh_weather(source).await
    }

    // --- cycles ---

    /// Run a full cycle for a mood tap.
    ///
    /// Returns `None` if a newer tap superseded this one or the session was
    /// shut down before it finished.
    pub async fn select_mood(&self, mood: MoodSymbol) -> Option<CycleOutcome> {
        let generation = self.begin_cycle(mood)?;
        self.run_cycle(generation, mood).await
    }

    /// Run the cycle on the runtime and report back over `tx`.
    ///
    /// The generation is taken before spawning, so taps keep their order
    /// even if the tasks start out of order.
    pub fn spawn_mood_selection(
        self: &Arc<Self>,
        runtime: &tokio::runtime::Handle,
        mood: MoodSymbol,
        tx: &Sender<OrchestrationMessage>,
    ) -> Option<JoinHandle<()>> {
        let generation = self.begin_cycle(mood)?;
        let this = Arc::clone(self);
        let tx = tx.clone();

        Some(runtime.spawn(async move {
            let outcome = this.run_cycle(generation, mood).await;
            let _ = tx.send(OrchestrationMessage::CycleDone {
                generation,
                outcome,
            });
        }))
    }

    /// Snapshot of the visible state.
    pub fn view(&self) -> RecipeView {
        let state = self.state.lock();
        match (state.phase, state.mood, &state.outcome) {
            (CyclePhase::Ready, _, Some(outcome)) if outcome.is_empty() => {
                RecipeView::NoMatches(outcome.clone())
            }
            (CyclePhase::Ready, _, Some(outcome)) => RecipeView::Results(outcome.clone()),
            (CyclePhase::Idle, _, _) | (_, None, _) | (CyclePhase::Ready, _, None) => {
                RecipeView::Idle
            }
            (phase, Some(mood), _) => RecipeView::Loading { mood, phase },
        }
    }

    /// Phase of the latest cycle
    pub fn phase(&self) -> CyclePhase {
        self.state.lock().phase
    }

    /// Latest generation handed out.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Tear down the session: in-flight fetches are dropped and no further
    /// state changes are applied.
    pub fn shutdown(&self) {
        tracing::info!("Shutting down recipe orchestration");
        self.shutdown.cancel();
    }

    /// Whether `shutdown` has been called
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// `Idle -> Resolving`: take a new generation and clear prior results.
    fn begin_cycle(&self, mood: MoodSymbol) -> Option<u64> {
        if self.shutdown.is_cancelled() {
            tracing::debug!("Ignoring mood {} after shutdown", mood);
            return None;
        }

        let mut state = self.state.lock();
        state.generation += 1;
        state.phase = CyclePhase::Resolving;
        state.mood = Some(mood);
        state.outcome = None;

        tracing::info!("Cycle {} started for mood {}", state.generation, mood);
        Some(state.generation)
    }

    async fn run_cycle(&self, generation: u64, mood: MoodSymbol) -> Option<CycleOutcome> {
        let weather = self.weather();
        let vibe = self.resolver.resolve(weather.condition(), mood);
        let query_vibe = match &vibe {
            Some(v) => v.clone(),
            None => {
                tracing::info!(
                    "No vibe for condition {:?} and mood {}, using {}",
                    weather.condition(),
                    mood,
                    self.fallback_vibe
                );
                self.fallback_vibe.clone()
            }
        };

        if !self.advance(generation, CyclePhase::FetchingPrimary) {
            return None;
        }

        let primary = self
            .cancellable(self.fetcher.fetch(&query_vibe, self.options))
            .await?;

        // A superseded cycle stops here rather than spending a fallback request.
        if !self.is_current(generation) {
            tracing::debug!("Cycle {} superseded after primary fetch", generation);
            return None;
        }

        let aggregation = self
            .aggregator
            .aggregate(primary, move || async move {
                if !self.advance(generation, CyclePhase::FetchingFallback) {
                    return Vec::new();
                }
                self.cancellable(self.fetcher.fetch(&self.fallback_vibe, self.options))
                    .await
                    .unwrap_or_default()
            })
            .await;

        let outcome = CycleOutcome {
            generation,
            mood,
            weather,
            vibe,
            query_vibe,
            recipes: aggregation.recipes,
            used_fallback: aggregation.used_fallback,
        };

        self.publish(outcome)
    }

    async fn cancellable<T>(&self, fut: impl Future<Output = T>) -> Option<T> {
        tokio::select! {
            _ = self.shutdown.cancelled() => None,
            value = fut => Some(value),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        !self.shutdown.is_cancelled() && self.state.lock().generation == generation
    }

    /// Move to `phase` if this cycle is still the latest.
    fn advance(&self, generation: u64, phase: CyclePhase) -> bool {
        if self.shutdown.is_cancelled() {
            return false;
        }
        let mut state = self.state.lock();
        if state.generation != generation {
            return false;
        }
        state.phase = phase;
        true
    }

    /// `-> Ready`: apply the outcome unless a newer cycle started meanwhile.
    fn publish(&self, outcome: CycleOutcome) -> Option<CycleOutcome> {
        if self.shutdown.is_cancelled() {
            return None;
        }

        let mut state = self.state.lock();
        if state.generation != outcome.generation {
            tracing::debug!(
                "Discarding stale cycle {} (latest is {})",
                outcome.generation,
                state.generation
            );
            return None;
        }

        tracing::info!(
            "Cycle {} ready: {} recipes for {} (fallback: {})",
            outcome.generation,
            outcome.recipes.len(),
            outcome.query_vibe,
            outcome.used_fallback
        );
        state.phase = CyclePhase::Ready;
        state.outcome = Some(outcome.clone());
        Some(outcome)
    }
}
