// src/interception/binder.rs
//! Interception binder for the engine's intercept points
//!
//! Owns one [`RedirectSwitch`] per [`Point`]. Core points are installed at
//! boot; the rest are toggled by event name from the script layer.

use crate::interception::points::Point;
use crate::interception::redirect::{InterceptPoint, PassThrough, RedirectSwitch};
use crate::utils::errors::{EngineError, Result};
use tracing::{debug, info, trace};

/// A point bound to its switch
pub struct BoundPoint<'a> {
    point: Point,
    switch: &'a RedirectSwitch,
}

impl InterceptPoint for BoundPoint<'_> {
    fn name(&self) -> &str {
        self.point.name()
    }

    fn switch(&self) -> &RedirectSwitch {
        self.switch
    }
}

/// Redirect table for every intercept point
pub struct Binder {
    switches: Vec<RedirectSwitch>,
}

impl Binder {
    pub fn new() -> Self {
        Self {
            switches: (0..Point::COUNT).map(|_| RedirectSwitch::new()).collect(),
        }
    }

    pub fn point(&self, point: Point) -> BoundPoint<'_> {
        BoundPoint {
            point,
            switch: &self.switches[point.index()],
        }
    }

    /// Whether calls at `point` currently go through the dispatcher
    pub fn is_redirected(&self, point: Point) -> bool {
        self.switches[point.index()].is_active()
    }

    pub fn install(&self, point: Point) -> bool {
        self.point(point).install()
    }

    pub fn remove(&self, point: Point) -> bool {
        self.point(point).remove()
    }

    /// Lift the redirect at `point` until the guard drops
    pub fn pass_through(&self, point: Point) -> PassThrough<'_> {
        trace!("pass-through on {}", point.name());
        PassThrough::acquire(&self.switches[point.index()])
    }

    /// Install every core point; any failure is fatal at boot
    pub fn install_core(&self) -> Result<()> {
        for point in Point::ALL.into_iter().filter(|p| p.is_core()) {
            let bound = self.point(point);
            if !bound.is_installed() && !bound.install() {
                return Err(EngineError::InterceptInstall(point.name()));
            }
        }
        info!("Installed core intercept points");
        Ok(())
    }

    /// Enable the point behind an event name.
    ///
    /// Returns false for names that map to no hookable point.
    pub fn enable(&self, name: &str) -> bool {
        match Point::from_event(name) {
            Some(point) => {
                if self.install(point) {
                    debug!("Enabled hook {} ({:?})", name, point);
                }
                true
            }
            None => {
                debug!("Ignoring enable for unknown hook {}", name);
                false
            }
        }
    }

    /// Disable the point behind an event name; core points stay installed
    pub fn disable(&self, name: &str) -> bool {
        match Point::from_event(name) {
            Some(point) if point.is_core() => true,
            Some(point) => {
                if self.remove(point) {
                    debug!("Disabled hook {} ({:?})", name, point);
                }
                true
            }
            None => false,
        }
    }

    /// Remove every non-core redirect
    pub fn clear(&self) {
        let removed = Point::ALL
            .into_iter()
            .filter(|p| !p.is_core())
            .filter(|p| self.remove(*p))
            .count();
        debug!("Cleared {} hooks", removed);
    }

    pub fn installed_points(&self) -> Vec<Point> {
        Point::ALL
            .into_iter()
            .filter(|p| self.switches[p.index()].is_installed())
            .collect()
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}
