//! clicks and popups on the map.
//!
//! every interaction runs one cycle: POST the coordinate, then fetch the result
//! layers, then swap them into the view. a newer interaction supersedes older
//! cycles, and a superseded cycle never touches the view, so the result layers
//! always belong to a single click.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    client::MapApi,
    endpoint::{result_layers, Endpoint},
    error::Result,
    fetcher::fetch_shapes,
    geo::{Coordinate, LatLon},
    layer::{BaseLayer, LayerId, ViewState},
};

/// whether clicks on the map are processed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placing {
    /// every click is processed
    Ungated,
    /// clicks are processed only while active; a button toggles it
    Gated { active: bool },
}

impl Placing {
    pub fn accepts_clicks(self) -> bool {
        match self {
            Placing::Ungated => true,
            Placing::Gated { active } => active,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// layers were replaced with this many shapes
    Applied { points: usize, lines: usize },
    /// a newer interaction started before this one finished
    Superseded,
    /// the click was not processed
    Ignored,
    /// the server could not be reached; layers were left alone
    Failed,
}

/// handed out per cycle; stale once a newer one is issued
#[derive(Clone, Debug)]
pub struct CycleToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl CycleToken {
    pub fn is_cancelled(&self) -> bool {
        self.current.load(Ordering::SeqCst) != self.generation
    }
}

pub struct Session<A> {
    api: A,
    view: Mutex<ViewState>,
    placing: AtomicBool,
    gated: bool,
    generation: Arc<AtomicU64>,
    results: Vec<Endpoint>,
}

impl<A: MapApi> Session<A> {
    pub fn new(api: A, view: ViewState, placing: Placing) -> Self {
        let (gated, active) = match placing {
            Placing::Ungated => (false, true),
            Placing::Gated { active } => (true, active),
        };
        Self {
            api,
            view: Mutex::new(view),
            placing: active.into(),
            gated,
            generation: Arc::new(AtomicU64::new(0)),
            results: result_layers(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &Mutex<ViewState> {
        &self.view
    }

    pub fn placing(&self) -> Placing {
        if self.gated {
            Placing::Gated {
                active: self.placing.load(Ordering::SeqCst),
            }
        } else {
            Placing::Ungated
        }
    }

    /// the placing button. no effect when ungated.
    pub fn toggle_placing(&self) -> Placing {
        if self.gated {
            self.placing.fetch_xor(true, Ordering::SeqCst);
        }
        self.placing()
    }

    /// invalidates all earlier tokens
    pub fn begin_cycle(&self) -> CycleToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        CycleToken {
            generation,
            current: self.generation.clone(),
        }
    }

    pub async fn click(&self, at: LatLon) -> CycleOutcome {
        if !self.placing().accepts_clicks() {
            debug!(?at, "placing inactive, click ignored");
            return CycleOutcome::Ignored;
        }
        self.run_cycle(at).await
    }

    /// opening a popup on a layer with connections shows them from the feature's anchor.
    /// like clicks, this only happens while placing is active.
    pub async fn popup_open(&self, layer: LayerId, anchor: LatLon) -> CycleOutcome {
        if !layer.has_connections() || !self.placing().accepts_clicks() {
            debug!(%layer, ?anchor, "popup opened without fetching connections");
            return CycleOutcome::Ignored;
        }
        self.run_cycle(anchor).await
    }

    pub async fn popup_close(&self) {
        self.begin_cycle();
        self.view.lock().await.clear_transient();
    }

    pub async fn set_visible(&self, layer: LayerId, visible: bool) {
        self.view.lock().await.set_visible(layer, visible);
    }

    pub async fn set_base(&self, base: BaseLayer) {
        self.view.lock().await.base = base;
    }

    async fn run_cycle(&self, at: LatLon) -> CycleOutcome {
        let token = self.begin_cycle();
        match self.cycle(at, &token).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(?at, error = %e, "interaction failed");
                CycleOutcome::Failed
            }
        }
    }

    async fn cycle(&self, at: LatLon, token: &CycleToken) -> Result<CycleOutcome> {
        self.api.process(&Coordinate::from(at)).await?;
        if token.is_cancelled() {
            return Ok(CycleOutcome::Superseded);
        }

        let mut fetched = Vec::with_capacity(self.results.len());
        for endpoint in &self.results {
            fetched.push((endpoint.layer, fetch_shapes(&self.api, endpoint).await?));
            if token.is_cancelled() {
                return Ok(CycleOutcome::Superseded);
            }
        }

        let mut view = self.view.lock().await;
        // checked again under the lock, a close or click may have come in meanwhile
        if token.is_cancelled() {
            return Ok(CycleOutcome::Superseded);
        }
        let (mut points, mut lines) = (0, 0);
        for (layer, shapes) in fetched {
            match layer {
                LayerId::Point => points = shapes.len(),
                LayerId::Lines => lines = shapes.len(),
                _ => {}
            }
            view.group_mut(layer).replace(shapes);
        }
        info!(?at, points, lines, "interaction applied");
        Ok(CycleOutcome::Applied { points, lines })
    }
}
