//! Static navigation tree: modes, their chart views, and path resolution.

use crate::error::{PanelError, RouteError};
use crate::lifecycle::PanelState;
use crate::panel::{ChartPanel, PanelContext, PanelId};
use crate::path::NavPath;
use crate::registry::PanelRegistry;
use crate::route::RouteSpec;

/// Index of a node in the tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewNode {
    id: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    panel: Option<PanelId>,
}

impl ViewNode {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn panel_id(&self) -> Option<&PanelId> {
        self.panel.as_ref()
    }

    pub fn has_panel(&self) -> bool {
        self.panel.is_some()
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    /// Builds a fresh instance through the registry. The instance must come
    /// back Uninitialized; anything else counts as a creation failure.
    pub fn create_panel_instance(
        &self,
        registry: &PanelRegistry,
        ctx: &PanelContext,
    ) -> Result<Box<dyn ChartPanel>, PanelError> {
        let Some(panel) = &self.panel else {
            return Err(PanelError::Creation {
                panel: PanelId::new(self.id.clone()),
                reason: format!("view `{}` hosts no panel", self.id),
            });
        };
        let factory = registry.resolve(panel).map_err(|e| PanelError::Creation {
            panel: panel.clone(),
            reason: e.to_string(),
        })?;
        let instance = factory(ctx).map_err(|report| PanelError::Creation {
            panel: panel.clone(),
            reason: format!("{report:#}"),
        })?;
        if instance.state() != PanelState::Uninitialized {
            return Err(PanelError::Creation {
                panel: panel.clone(),
                reason: format!("factory returned a panel in state {:?}", instance.state()),
            });
        }
        Ok(instance)
    }
}

/// Arena of view nodes built once from the route table.
#[derive(Clone, Debug, Default)]
pub struct NavigationTree {
    nodes: Vec<ViewNode>,
    roots: Vec<NodeId>,
}

impl NavigationTree {
    pub fn build(routes: &[RouteSpec], registry: &PanelRegistry) -> Result<Self, RouteError> {
        let mut tree = Self::default();
        for spec in routes {
            let root = tree.insert(spec, None, registry)?;
            tree.roots.push(root);
        }
        Ok(tree)
    }

    fn insert(
        &mut self,
        spec: &RouteSpec,
        parent: Option<NodeId>,
        registry: &PanelRegistry,
    ) -> Result<NodeId, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidRoute {
            segment: spec.segment.clone(),
            reason: reason.to_string(),
        };

        if spec.segment.trim().is_empty() {
            return Err(invalid("segment is empty"));
        }
        if spec.segment.contains('/') {
            return Err(invalid("segments are relative to their parent and cannot contain `/`"));
        }
        if spec.segment != spec.segment.trim() {
            return Err(invalid("segment has leading or trailing whitespace"));
        }
        if self.child(parent, &spec.segment).is_some() {
            return Err(invalid("segment collides with a sibling"));
        }
        let panel = match &spec.panel {
            Some(p) => {
                let id = PanelId::new(p.clone());
                if !registry.contains(&id) {
                    return Err(invalid(&format!("panel `{}` is not registered", id)));
                }
                Some(id)
            }
            None if spec.children.is_empty() => {
                return Err(invalid("terminal view must host a panel"));
            }
            None => None,
        };

        let id = NodeId(self.nodes.len());
        self.nodes.push(ViewNode {
            id: spec.segment.clone(),
            parent,
            children: vec![],
            panel,
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        for child in &spec.children {
            self.insert(child, Some(id), registry)?;
        }
        Ok(id)
    }

    /// Walks `path` segment by segment. Pure: nothing is instantiated.
    pub fn resolve(&self, path: &NavPath) -> Result<Vec<NodeId>, RouteError> {
        let mut chain = Vec::with_capacity(path.len());
        let mut parent = None;
        for segment in path.segments() {
            let next = self.child(parent, segment).ok_or_else(|| RouteError::NotFound {
                path: path.clone(),
                segment: segment.clone(),
            })?;
            chain.push(next);
            parent = Some(next);
        }
        Ok(chain)
    }

    /// Child of `parent` (or root when None) named `segment`.
    pub fn child(&self, parent: Option<NodeId>, segment: &str) -> Option<NodeId> {
        let candidates = match parent {
            Some(p) => &self.nodes[p.0].children,
            None => &self.roots,
        };
        candidates
            .iter()
            .copied()
            .find(|c| self.nodes[c.0].id == segment)
    }

    pub fn node(&self, id: NodeId) -> &ViewNode {
        &self.nodes[id.0]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Full path from the root to `id`.
    pub fn path_of(&self, id: NodeId) -> NavPath {
        let mut segments = vec![];
        let mut cursor = Some(id);
        while let Some(n) = cursor {
            segments.push(self.nodes[n.0].id.clone());
            cursor = self.nodes[n.0].parent;
        }
        segments.reverse();
        NavPath::from_segments(segments)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
