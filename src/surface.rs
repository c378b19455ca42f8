//! Rendering surfaces supplied by the host application.
//!
//! A [`Surface`] is a capability: panels draw into it and acquire host
//! resources (listeners, timers, animation frames, simulation handles) through
//! it, but never look behind the [`SurfaceHost`] trait. Surfaces are not
//! `Clone`; whoever holds one owns the mount point.

use crate::path::NavPath;
use crate::scene::Scene;
use gpui::{Bounds, Pixels};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// Where in the navigation tree a surface is mounted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountPoint {
    pub path: NavPath,
    pub depth: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Listener,
    Timer,
    AnimationFrame,
    Simulation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    pub surface: SurfaceId,
    pub kind: ResourceKind,
    pub id: u64,
}

pub trait SurfaceHost: Send + Sync {
    /// Viewport of the mount point, queried on mount and on resize.
    fn mount_bounds(&self, mount: &MountPoint) -> Bounds<Pixels>;

    fn attach(&self, _surface: SurfaceId, _mount: &MountPoint) {}

    fn detach(&self, _surface: SurfaceId) {}

    fn draw(&self, surface: SurfaceId, scene: &Scene);

    fn acquire(&self, surface: SurfaceId, kind: ResourceKind) -> ResourceHandle;

    fn release(&self, handle: ResourceHandle);
}

pub struct Surface {
    id: SurfaceId,
    mount: MountPoint,
    bounds: Bounds<Pixels>,
    host: Arc<dyn SurfaceHost>,
}

impl Surface {
    pub fn open(id: SurfaceId, mount: MountPoint, host: Arc<dyn SurfaceHost>) -> Self {
        let bounds = host.mount_bounds(&mount);
        host.attach(id, &mount);
        Self {
            id,
            mount,
            bounds,
            host,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn mount(&self) -> &MountPoint {
        &self.mount
    }

    pub fn bounds(&self) -> Bounds<Pixels> {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds<Pixels>) {
        self.bounds = bounds;
    }

    pub fn draw(&self, scene: &Scene) {
        self.host.draw(self.id, scene);
    }

    pub fn acquire(&self, kind: ResourceKind) -> ResourceHandle {
        self.host.acquire(self.id, kind)
    }

    pub fn release(&self, handle: ResourceHandle) {
        self.host.release(handle);
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        self.host.detach(self.id);
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("mount", &self.mount.path)
            .finish()
    }
}

/// Host resources held by one activation, released together on destroy.
#[derive(Debug, Default)]
pub struct Resources {
    handles: Vec<ResourceHandle>,
}

impl Resources {
    pub fn acquire(&mut self, surface: &Surface, kind: ResourceKind) -> ResourceHandle {
        let handle = surface.acquire(kind);
        self.handles.push(handle);
        handle
    }

    /// Releases newest first. Returns how many handles were released.
    pub fn release_all(&mut self, surface: &Surface) -> usize {
        let n = self.handles.len();
        while let Some(handle) = self.handles.pop() {
            surface.release(handle);
        }
        n
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
