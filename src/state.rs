use crate::client::SalesBackend;
use crate::config::DashboardConfig;
use crate::format::CurrencyFormatter;
use crate::panels::{load_panel, DataSource, FetchState};
use std::{collections::HashMap, sync::Arc};
use tokio::{sync::Mutex, task::AbortHandle};
use tracing::{debug, info};

struct Panel {
    state: FetchState,
    generation: u64,
    task: Option<AbortHandle>,
}

/// Mounted panels plus the generation counter. Generations are never reused,
/// so a fetch from a torn-down panel can't settle into a remounted one.
#[derive(Default)]
struct Registry {
    panels: HashMap<DataSource, Panel>,
    next_generation: u64,
}

impl Registry {
    fn next_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    fn product_panels(&self) -> usize {
        self.panels
            .keys()
            .filter(|source| matches!(source, DataSource::ProductSales(_)))
            .count()
    }

    /// Drops the product panel to make room for a new one: settled panels
    /// before loading ones, oldest generation first.
    fn evict_product_panel(&mut self) {
        let victim = self
            .panels
            .iter()
            .filter(|(source, _)| matches!(source, DataSource::ProductSales(_)))
            .min_by_key(|(_, panel)| (panel.task.is_some(), panel.generation))
            .map(|(source, _)| source.clone());

        if let Some(source) = victim {
            if let Some(panel) = self.panels.remove(&source) {
                if let Some(task) = panel.task {
                    task.abort();
                }
            }
            info!(%source, "evicted product panel");
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn SalesBackend>,
    pub formatter: CurrencyFormatter,
    product_limit: usize,
    registry: Arc<Mutex<Registry>>,
}

impl AppState {
    pub fn new(backend: Arc<dyn SalesBackend>, formatter: CurrencyFormatter) -> Self {
        Self {
            backend,
            formatter,
            product_limit: DashboardConfig::default().product_panels,
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }

    /// Caps how many product panels stay mounted at once.
    pub fn with_product_limit(mut self, limit: usize) -> Self {
        self.product_limit = limit.max(1);
        self
    }

    /// Starts the one fetch for `source` the first time it is shown.
    pub async fn mount(&self, source: &DataSource) -> FetchState {
        let mut registry = self.registry.lock().await;
        if let Some(panel) = registry.panels.get(source) {
            return panel.state.clone();
        }

        if matches!(source, DataSource::ProductSales(_)) {
            while registry.product_panels() >= self.product_limit {
                registry.evict_product_panel();
            }
        }

        let generation = registry.next_generation();
        info!(%source, generation, "mounting panel");
        let task = self.spawn_fetch(source.clone(), generation);
        registry.panels.insert(
            source.clone(),
            Panel {
                state: FetchState::Loading,
                generation,
                task: Some(task),
            },
        );
        FetchState::Loading
    }

    /// Drops whatever the panel holds and fetches again.
    pub async fn refresh(&self, source: &DataSource) {
        let mut registry = self.registry.lock().await;
        if let Some(task) = registry.panels.get_mut(source).and_then(|panel| panel.task.take()) {
            task.abort();
        }
        if !registry.panels.contains_key(source) && matches!(source, DataSource::ProductSales(_)) {
            while registry.product_panels() >= self.product_limit {
                registry.evict_product_panel();
            }
        }

        let generation = registry.next_generation();
        info!(%source, generation, "refreshing panel");
        let task = self.spawn_fetch(source.clone(), generation);
        registry.panels.insert(
            source.clone(),
            Panel {
                state: FetchState::Loading,
                generation,
                task: Some(task),
            },
        );
    }

    /// Tears the panel down, cancelling a fetch that is still in flight.
    pub async fn unmount(&self, source: &DataSource) -> bool {
        let mut registry = self.registry.lock().await;
        match registry.panels.remove(source) {
            Some(panel) => {
                if let Some(task) = panel.task {
                    task.abort();
                    debug!(%source, "cancelled in-flight fetch");
                }
                info!(%source, "unmounted panel");
                true
            }
            None => false,
        }
    }

    pub async fn snapshot(&self, source: &DataSource) -> Option<FetchState> {
        self.registry
            .lock()
            .await
            .panels
            .get(source)
            .map(|panel| panel.state.clone())
    }

    /// Cancels every fetch still in flight.
    pub async fn shutdown(&self) {
        let mut registry = self.registry.lock().await;
        for (source, panel) in registry.panels.iter_mut() {
            if let Some(task) = panel.task.take() {
                task.abort();
                debug!(%source, "cancelled in-flight fetch");
            }
        }
    }

    fn spawn_fetch(&self, source: DataSource, generation: u64) -> AbortHandle {
        let backend = Arc::clone(&self.backend);
        let registry = Arc::clone(&self.registry);

        let handle = tokio::spawn(async move {
            let state = load_panel(backend.as_ref(), &source).await;

            let mut registry = registry.lock().await;
            match registry.panels.get_mut(&source) {
                Some(panel) if panel.generation == generation => {
                    debug!(%source, generation, "panel settled");
                    panel.state = state;
                    panel.task = None;
                }
                _ => debug!(%source, generation, "discarding stale fetch result"),
            }
        });
        handle.abort_handle()
    }
}
