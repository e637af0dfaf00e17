use tracing::trace;

use crate::{
    foundation::core::{Extent, Magnification},
    foundation::error::PixelPaneResult,
    resize::config::{
        PlatformLimits, ResizeMode, WindowConfig, min_canvas_for, min_magnification_for,
    },
};

/// Admissible sizes for the current configuration. A zero maximum means no ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SolverBounds {
    /// Smallest canvas.
    pub min_canvas: Extent,
    /// Largest canvas (0 = unbounded).
    pub max_canvas: Extent,
    /// Smallest magnification.
    pub min_magnification: Magnification,
    /// Largest magnification.
    pub max_magnification: Magnification,
    /// Smallest client area.
    pub min_client: Extent,
    /// Largest client area (0 = unbounded).
    pub max_client: Extent,
}

/// Result of negotiating one proposed client size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ResizeOutcome {
    /// Canvas size to commit.
    pub canvas: Extent,
    /// Magnification to commit.
    pub magnification: Magnification,
    /// Client size the window should snap to (`canvas` scaled by `magnification`).
    pub client: Extent,
    /// Part of the proposed client size that does not fit a whole canvas pixel.
    pub remainder: Extent,
    /// `false` when the mode forbids resizing or the application vetoed the size.
    pub accepted: bool,
}

/// Turns proposed client sizes into canvas sizes or magnifications.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeSolver {
    mode: ResizeMode,
    limits: PlatformLimits,
    canvas: Extent,
    magnification: Magnification,
    min_bounds: Extent,
    max_bounds: Extent,
    /// Ratio step when the aspect ratio is locked.
    aspect: Option<Magnification>,
}

impl ResizeSolver {
    /// Validate `config` against `limits` and set up the solver.
    pub fn new(config: &WindowConfig, limits: PlatformLimits) -> PixelPaneResult<Self> {
        config.validate(&limits)?;
        let magnification = config.magnification()?;
        Ok(Self {
            mode: config.resize_mode,
            limits,
            canvas: config.canvas(),
            magnification,
            min_bounds: config.min_bounds(),
            max_bounds: config.max_bounds(),
            aspect: config.keep_aspect_ratio.then(|| magnification.reduced()),
        })
    }

    /// Resize mode.
    pub fn mode(&self) -> ResizeMode {
        self.mode
    }

    /// Current canvas size.
    pub fn canvas(&self) -> Extent {
        self.canvas
    }

    /// Current magnification.
    pub fn magnification(&self) -> Magnification {
        self.magnification
    }

    /// Client size of the current canvas at the current magnification.
    pub fn client(&self) -> Extent {
        self.magnification.scale(self.canvas)
    }

    /// Record a committed outcome.
    pub fn commit(&mut self, outcome: &ResizeOutcome) {
        self.canvas = outcome.canvas;
        self.magnification = outcome.magnification;
    }

    /// Current min/max canvas, magnification and client sizes.
    pub fn bounds(&self) -> SolverBounds {
        let (min_canvas, max_canvas, min_mag, max_mag) = match self.mode {
            ResizeMode::None => (
                self.canvas,
                self.canvas,
                self.magnification,
                self.magnification,
            ),
            ResizeMode::Canvas => (
                self.min_canvas(),
                self.max_bounds,
                self.magnification,
                self.magnification,
            ),
            ResizeMode::Pixels => (
                self.canvas,
                self.canvas,
                self.min_magnification(),
                self.max_magnification(),
            ),
        };
        SolverBounds {
            min_canvas,
            max_canvas,
            min_magnification: min_mag,
            max_magnification: max_mag,
            min_client: min_mag.scale(min_canvas),
            max_client: max_mag.scale(max_canvas),
        }
    }

    /// Negotiate a proposed client size.
    ///
    /// In [`ResizeMode::Canvas`] the clamped candidate canvas is offered to `hook`, which may
    /// adjust it or return `false` to veto; the adjusted size is clamped again.
    #[tracing::instrument(level = "trace", skip(self, hook), fields(mode = ?self.mode))]
    pub fn solve(
        &self,
        proposed: Extent,
        hook: &mut dyn FnMut(&mut Extent) -> bool,
    ) -> ResizeOutcome {
        match self.mode {
            ResizeMode::None => self.reject(proposed),
            ResizeMode::Canvas => self.solve_canvas(proposed, hook),
            ResizeMode::Pixels => self.solve_pixels(proposed),
        }
    }

    fn solve_canvas(
        &self,
        proposed: Extent,
        hook: &mut dyn FnMut(&mut Extent) -> bool,
    ) -> ResizeOutcome {
        let mag = self.magnification;
        let fit = Extent::new(
            proposed.width / u32::from(mag.x),
            proposed.height / u32::from(mag.y),
        );
        let mut candidate = self.clamp_canvas(fit);
        trace!(?fit, ?candidate, "canvas candidate");

        if !hook(&mut candidate) {
            trace!(?candidate, "canvas size vetoed");
            return self.reject(proposed);
        }
        let canvas = self.clamp_canvas(candidate);
        self.outcome(proposed, canvas, mag)
    }

    fn solve_pixels(&self, proposed: Extent) -> ResizeOutcome {
        let canvas = self.canvas;
        let fit_x = proposed.width / canvas.width.max(1);
        let fit_y = proposed.height / canvas.height.max(1);

        let magnification = match self.aspect {
            Some(step) => {
                let (sx, sy) = (u32::from(step.x), u32::from(step.y));
                let mut k = fit_y / sy;
                if k.saturating_mul(sx) > fit_x {
                    k = fit_x / sx;
                }
                let (lo, hi) = self.aspect_multiples(step);
                step.times(k.min(hi).max(lo))
            }
            None => {
                let (min, max) = (self.axis_min_magnification(), self.axis_max_magnification());
                Magnification {
                    x: clamp_factor(fit_x, min.x, max.x),
                    y: clamp_factor(fit_y, min.y, max.y),
                }
            }
        };
        trace!(fit_x, fit_y, ?magnification, "magnification candidate");
        self.outcome(proposed, canvas, magnification)
    }

    fn outcome(&self, proposed: Extent, canvas: Extent, mag: Magnification) -> ResizeOutcome {
        let client = mag.scale(canvas);
        ResizeOutcome {
            canvas,
            magnification: mag,
            client,
            remainder: proposed.saturating_sub(client),
            accepted: true,
        }
    }

    fn reject(&self, proposed: Extent) -> ResizeOutcome {
        ResizeOutcome {
            accepted: false,
            ..self.outcome(proposed, self.canvas, self.magnification)
        }
    }

    fn min_canvas(&self) -> Extent {
        min_canvas_for(self.limits.min_client(), self.magnification).max(self.min_bounds)
    }

    fn clamp_canvas(&self, candidate: Extent) -> Extent {
        let min = self.min_canvas();
        let axis = |v: u32, lo: u32, hi: u32| -> u32 {
            let v = v.max(lo);
            if hi == 0 { v } else { v.min(hi) }
        };
        Extent::new(
            axis(candidate.width, min.width, self.max_bounds.width),
            axis(candidate.height, min.height, self.max_bounds.height),
        )
    }

    fn min_magnification(&self) -> Magnification {
        match self.aspect {
            Some(step) => step.times(self.aspect_multiples(step).0),
            None => self.axis_min_magnification(),
        }
    }

    fn max_magnification(&self) -> Magnification {
        match self.aspect {
            Some(step) => step.times(self.aspect_multiples(step).1),
            None => self.axis_max_magnification(),
        }
    }

    fn axis_min_magnification(&self) -> Magnification {
        let floor = min_magnification_for(self.limits.min_client(), self.canvas);
        Magnification {
            x: floor.x.max(bound_factor(self.min_bounds.width, 1)),
            y: floor.y.max(bound_factor(self.min_bounds.height, 1)),
        }
    }

    fn axis_max_magnification(&self) -> Magnification {
        Magnification {
            x: bound_factor(self.max_bounds.width, Magnification::MAX),
            y: bound_factor(self.max_bounds.height, Magnification::MAX),
        }
    }

    /// Smallest and largest multiple of `step` inside the per-axis bounds. The floor wins
    /// when the two cross.
    fn aspect_multiples(&self, step: Magnification) -> (u32, u32) {
        let (min, max) = (self.axis_min_magnification(), self.axis_max_magnification());
        let (sx, sy) = (u32::from(step.x), u32::from(step.y));
        let lo = u32::from(min.x)
            .div_ceil(sx)
            .max(u32::from(min.y).div_ceil(sy))
            .max(1);
        let hi = (u32::from(max.x) / sx).min(u32::from(max.y) / sy);
        (lo, hi.max(lo))
    }
}

fn bound_factor(bound: u32, unset: u16) -> u16 {
    if bound == 0 {
        return unset;
    }
    u16::try_from(bound).unwrap_or(Magnification::MAX)
}

fn clamp_factor(v: u32, min: u16, max: u16) -> u16 {
    let v = u16::try_from(v).unwrap_or(Magnification::MAX);
    v.max(min).min(max.max(min)).max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/resize/solver.rs"]
mod tests;
