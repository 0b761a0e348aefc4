//! Shared test doubles: a mock player/factory pair recording an ordered
//! action ledger, and a static catalog.

// Not every test binary exercises every helper
#![allow(dead_code)]

use async_trait::async_trait;
use multiview_core::{
    CatalogClient, CatalogEntry, ConnectionState, Error, Player, PlayerFactory, Result,
    StateChangeHandler, UriInfo,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// One observable action on the player collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create(String),
    Play(String),
    Stop(String),
}

/// Ordered record of every action across all players
#[derive(Default)]
pub struct Ledger {
    actions: Mutex<Vec<Action>>,
}

impl Ledger {
    pub fn push(&self, action: Action) {
        self.actions.lock().push(action);
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().clone()
    }

    /// Assert that at no point were two bindings live at once: every Create
    /// must be preceded by a Stop of the previous Create.
    pub fn assert_at_most_one_live_binding(&self) {
        let mut live = 0i32;
        for action in self.actions().iter() {
            match action {
                Action::Create(_) => {
                    live += 1;
                    assert!(live <= 1, "two live bindings after {:?}", self.actions());
                }
                Action::Stop(_) => live -= 1,
                Action::Play(_) => {}
            }
        }
    }
}

pub struct MockPlayer {
    source: String,
    ledger: Arc<Ledger>,
    handler: Mutex<Option<StateChangeHandler>>,
    stops: AtomicUsize,
    fail_play: bool,
}

impl MockPlayer {
    /// Report a connection state transition through the registered handler
    pub fn emit(&self, state: ConnectionState) {
        if let Some(handler) = &*self.handler.lock() {
            handler(state);
        }
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Player for MockPlayer {
    async fn play(&self) -> Result<()> {
        self.ledger.push(Action::Play(self.source.clone()));
        if self.fail_play {
            return Err(Error::Player("negotiation rejected".to_string()));
        }
        Ok(())
    }

    async fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.ledger.push(Action::Stop(self.source.clone()));
    }

    fn on_state_change(&self, handler: StateChangeHandler) {
        *self.handler.lock() = Some(handler);
    }
}

#[derive(Default)]
pub struct MockFactory {
    ledger: Arc<Ledger>,
    players: Mutex<Vec<Arc<MockPlayer>>>,
    attempts: AtomicUsize,
    fail_create: Mutex<HashSet<String>>,
    fail_play: Mutex<HashSet<String>>,
}

impl MockFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn ledger(&self) -> Arc<Ledger> {
        Arc::clone(&self.ledger)
    }

    /// Make creation fail for a source (source vanished from the catalog)
    pub fn fail_create(&self, source: &str) {
        self.fail_create.lock().insert(source.to_string());
    }

    /// Make play() fail for a source (negotiation error)
    pub fn fail_play(&self, source: &str) {
        self.fail_play.lock().insert(source.to_string());
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// The n-th created player (creation order)
    pub fn player(&self, index: usize) -> Arc<MockPlayer> {
        Arc::clone(&self.players.lock()[index])
    }

    pub fn last_player(&self) -> Arc<MockPlayer> {
        Arc::clone(self.players.lock().last().expect("no player created"))
    }

    pub fn created_count(&self) -> usize {
        self.players.lock().len()
    }
}

#[async_trait]
impl PlayerFactory for MockFactory {
    async fn create_player(&self, source: &str) -> Result<Arc<dyn Player>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.lock().contains(source) {
            return Err(Error::Player(format!("unknown source '{source}'")));
        }

        let player = Arc::new(MockPlayer {
            source: source.to_string(),
            ledger: Arc::clone(&self.ledger),
            handler: Mutex::new(None),
            stops: AtomicUsize::new(0),
            fail_play: self.fail_play.lock().contains(source),
        });
        self.ledger.push(Action::Create(source.to_string()));
        self.players.lock().push(Arc::clone(&player));
        Ok(player)
    }
}

/// Fixed catalog with no sub-lists
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
    pub fetches: AtomicUsize,
}

impl StaticCatalog {
    pub fn new(uris: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            entries: uris
                .iter()
                .map(|uri| CatalogEntry {
                    uri: uri.to_string(),
                    description: uri.to_string(),
                })
                .collect(),
            fetches: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CatalogClient for StaticCatalog {
    fn root_entries(&self) -> Vec<CatalogEntry> {
        self.entries.clone()
    }

    fn uri_info(&self, uri: &str) -> Option<UriInfo> {
        self.entries
            .iter()
            .any(|entry| entry.uri == uri)
            .then(UriInfo::default)
    }

    async fn fetch_children(&self, _uri: &str) -> Result<()> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Let spawned negotiation tasks run
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// Enable log output for a test (RUST_LOG aware); safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
