use crate::error::RegistryError;
use crate::panel::{ChartPanel, PanelContext, PanelId};
use crate::panels::bar::{BarConfig, BarRenderer};
use crate::panels::cartogram::{CartogramConfig, CartogramRenderer};
use crate::panels::radar::{RadarConfig, RadarRenderer};
use crate::panels::sankey::{SankeyConfig, SankeyRenderer};
use crate::panels::scatter::{ScatterConfig, ScatterRenderer};
use crate::panels::Panel;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds a fresh, uninitialized panel instance.
pub type PanelFactory =
    Arc<dyn Fn(&PanelContext) -> eyre::Result<Box<dyn ChartPanel>> + Send + Sync>;

/// Panel ids the crate ships implementations for.
pub const BUILTIN_PANELS: [&str; 5] = ["radar", "bar", "scatter", "sankey", "cartogram"];

/// Maps panel ids to factories. Filled once at startup, read-only afterwards.
#[derive(Default, Clone)]
pub struct PanelRegistry {
    factories: HashMap<PanelId, PanelFactory>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the five built-in chart panels.
    pub fn with_builtin_panels() -> Self {
        Self {
            factories: builtin_factories()
                .into_iter()
                .map(|(id, factory)| (PanelId::from(id), factory))
                .collect(),
        }
    }

    pub fn register<F>(&mut self, id: impl Into<PanelId>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&PanelContext) -> eyre::Result<Box<dyn ChartPanel>> + Send + Sync + 'static,
    {
        self.register_factory(id.into(), Arc::new(factory))
    }

    pub fn register_factory(&mut self, id: PanelId, factory: PanelFactory) -> Result<(), RegistryError> {
        if self.factories.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        self.factories.insert(id, factory);
        Ok(())
    }

    /// Adds the built-in panels next to host-registered ones.
    pub fn register_builtin_panels(&mut self) -> Result<(), RegistryError> {
        for (id, factory) in builtin_factories() {
            self.register_factory(PanelId::from(id), factory)?;
        }
        Ok(())
    }

    pub fn resolve(&self, id: &PanelId) -> Result<&PanelFactory, RegistryError> {
        self.factories
            .get(id)
            .ok_or_else(|| RegistryError::UnknownPanel(id.clone()))
    }

    pub fn contains(&self, id: &PanelId) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<PanelId> {
        let mut ids: Vec<PanelId> = self.factories.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

fn builtin_factories() -> Vec<(&'static str, PanelFactory)> {
    let radar: PanelFactory = Arc::new(|ctx: &PanelContext| -> eyre::Result<Box<dyn ChartPanel>> {
        let renderer = RadarRenderer::new(RadarConfig::default(), ctx.theme.clone());
        Ok(Box::new(Panel::new(ctx, renderer)) as Box<dyn ChartPanel>)
    });
    let bar: PanelFactory = Arc::new(|ctx: &PanelContext| -> eyre::Result<Box<dyn ChartPanel>> {
        let config = BarConfig {
            color: ctx.theme.series_color(1),
            ..Default::default()
        };
        let renderer = BarRenderer::new(config, ctx.theme.clone());
        Ok(Box::new(Panel::new(ctx, renderer)) as Box<dyn ChartPanel>)
    });
    let scatter: PanelFactory = Arc::new(|ctx: &PanelContext| -> eyre::Result<Box<dyn ChartPanel>> {
        let renderer = ScatterRenderer::new(ScatterConfig::default(), ctx.theme.clone());
        Ok(Box::new(Panel::new(ctx, renderer)) as Box<dyn ChartPanel>)
    });
    let sankey: PanelFactory = Arc::new(|ctx: &PanelContext| -> eyre::Result<Box<dyn ChartPanel>> {
        let config = SankeyConfig {
            iterations: ctx.settings.sankey_iterations,
            ..Default::default()
        };
        let renderer = SankeyRenderer::new(config, ctx.theme.clone());
        Ok(Box::new(Panel::new(ctx, renderer)) as Box<dyn ChartPanel>)
    });
    let cartogram: PanelFactory = Arc::new(|ctx: &PanelContext| -> eyre::Result<Box<dyn ChartPanel>> {
        let config = CartogramConfig {
            iterations_per_tick: ctx.settings.sim_iterations_per_tick,
            ..Default::default()
        };
        let renderer = CartogramRenderer::new(config, ctx.theme.clone());
        Ok(Box::new(Panel::new(ctx, renderer)) as Box<dyn ChartPanel>)
    });

    vec![
        ("radar", radar),
        ("bar", bar),
        ("scatter", scatter),
        ("sankey", sankey),
        ("cartogram", cartogram),
    ]
}

impl std::fmt::Debug for PanelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelRegistry").field("ids", &self.ids()).finish()
    }
}
