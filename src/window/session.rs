use std::{path::PathBuf, time::Duration};

use tracing::{debug, warn};

use crate::{
    foundation::core::{ClientRect, Extent},
    foundation::error::{PixelPaneError, PixelPaneResult},
    layer::canvas::Canvas,
    render::backend::{FrameTarget, Presenter, Viewport},
    resize::{
        config::{PlatformLimits, ResizeMode, WindowConfig, WindowState},
        solver::{ResizeOutcome, ResizeSolver, SolverBounds},
        trim::{DragEdge, apply_trim},
        viewport::place_viewport,
    },
    window::{
        app::{CanvasPoint, PixelApp},
        context::WindowContext,
        runtime::Runtime,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Created,
    Running,
    Closed,
}

/// One window: an application, its layer stack and the presenter they are drawn with.
///
/// The host integration owns the native window and forwards its events to the methods here.
pub struct PixelWindow<A: PixelApp, P: Presenter> {
    app: A,
    presenter: P,
    ctx: WindowContext,
    solver: ResizeSolver,
    client: Extent,
    restore_client: Extent,
    viewport: Viewport,
    phase: Phase,
    app_close_query: bool,
    drag_accepted: bool,
}

impl<A: PixelApp, P: Presenter> std::fmt::Debug for PixelWindow<A, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelWindow")
            .field("ctx", &self.ctx)
            .field("client", &self.client)
            .field("viewport", &self.viewport)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl<A: PixelApp, P: Presenter> PixelWindow<A, P> {
    /// Validate `config` and allocate the layer stack. Nothing is allocated if validation fails.
    pub fn new(
        app: A,
        mut presenter: P,
        config: &WindowConfig,
        limits: PlatformLimits,
    ) -> PixelPaneResult<Self> {
        let solver = ResizeSolver::new(config, limits)?;
        let canvas = Canvas::new(&mut presenter, config.canvas(), config.extra_layers)?;
        let client = solver.client();
        let viewport = place_viewport(WindowState::Normal, client, client);
        Ok(Self {
            app,
            presenter,
            ctx: WindowContext {
                title: config.title.clone(),
                canvas,
                magnification: solver.magnification(),
                state: WindowState::Normal,
                clear_color: config.clear_color,
                runtime: Runtime::default(),
            },
            solver,
            client,
            restore_client: client,
            viewport,
            phase: Phase::Created,
            app_close_query: false,
            drag_accepted: false,
        })
    }

    /// Apply `initial_state` (using `monitor` as the maximized/fullscreen area) and run
    /// [`PixelApp::on_startup`]. Returns `false` if the application aborted startup.
    pub fn startup(&mut self, initial_state: WindowState, monitor: Extent) -> PixelPaneResult<bool> {
        if self.phase != Phase::Created {
            return Err(PixelPaneError::validation("startup called twice"));
        }
        if initial_state != WindowState::Normal {
            self.set_state(initial_state, monitor)?;
        }
        if !self.app.on_startup(&mut self.ctx) {
            debug!("startup aborted by application");
            self.phase = Phase::Closed;
            self.ctx.canvas.release(&mut self.presenter)?;
            return Ok(false);
        }
        self.phase = Phase::Running;
        Ok(true)
    }

    /// Advance the runtime counter and run [`PixelApp::on_update`]. Returns whether the
    /// window is still open.
    pub fn update(&mut self, elapsed: Duration) -> PixelPaneResult<bool> {
        if self.phase != Phase::Running {
            return Ok(false);
        }
        self.ctx.runtime.advance(elapsed);
        if !self.app.on_update(&mut self.ctx, elapsed) {
            self.app_close_query = true;
            self.request_close()?;
        }
        Ok(self.is_running())
    }

    /// Handle a close request. Returns whether the window actually closed.
    pub fn request_close(&mut self) -> PixelPaneResult<bool> {
        if self.phase == Phase::Closed {
            return Ok(true);
        }
        if !self.app_close_query && !self.app.on_try_close(&mut self.ctx) {
            return Ok(false);
        }
        self.shutdown()?;
        Ok(true)
    }

    /// Run [`PixelApp::on_shutdown`] and release every layer. Idempotent.
    pub fn shutdown(&mut self) -> PixelPaneResult<()> {
        if self.phase == Phase::Closed {
            return Ok(());
        }
        self.phase = Phase::Closed;
        self.app.on_shutdown(&mut self.ctx);
        self.ctx.canvas.release(&mut self.presenter)
    }

    /// Negotiate a live resize: returns `proposed` trimmed so its size is admissible,
    /// moving the dragged `edge`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn negotiate_resize(&mut self, proposed: ClientRect, edge: DragEdge) -> ClientRect {
        let outcome = self.solve(proposed.extent());
        apply_trim(proposed, edge, outcome.client)
    }

    /// Apply a committed client size.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn commit_resize(&mut self, client: Extent) -> PixelPaneResult<ResizeOutcome> {
        let outcome = self.solve(client);
        if outcome.accepted {
            self.apply(&outcome)?;
        }
        self.client = client;
        self.refresh_viewport();
        debug!(
            ?client,
            canvas = ?self.ctx.canvas.extent(),
            magnification = ?self.ctx.magnification,
            "resize committed"
        );
        Ok(outcome)
    }

    /// Switch window state. `area` is the monitor (fullscreen) or work area (maximized);
    /// it is ignored when returning to [`WindowState::Normal`].
    pub fn set_state(&mut self, state: WindowState, area: Extent) -> PixelPaneResult<()> {
        if state == self.ctx.state {
            return Ok(());
        }
        if self.ctx.state == WindowState::Normal {
            self.restore_client = self.client;
        }
        self.ctx.state = state;
        let client = match state {
            WindowState::Normal => self.restore_client,
            WindowState::Maximized | WindowState::Fullscreen => area,
        };
        self.commit_resize(client)?;
        Ok(())
    }

    /// Files are dragged over the client point (`x`, `y`), top-left origin.
    /// Returns whether the application accepts them.
    pub fn drag_files(&mut self, files: &[PathBuf], x: i32, y: i32) -> bool {
        let at = self.client_to_canvas(x, y);
        self.drag_accepted = self.app.on_drag_files(&self.ctx, files, at);
        self.drag_accepted
    }

    /// Files were dropped at the client point (`x`, `y`). Forwarded only if the drag was
    /// accepted; returns whether it was.
    pub fn drop_files(&mut self, files: &[PathBuf], x: i32, y: i32) -> bool {
        if !std::mem::take(&mut self.drag_accepted) {
            return false;
        }
        let at = self.client_to_canvas(x, y);
        self.app.on_drop_files(&mut self.ctx, files, at);
        true
    }

    /// Map a client-area point (top-left origin, device pixels) to canvas pixels.
    pub fn client_to_canvas(&self, x: i32, y: i32) -> CanvasPoint {
        let mag = self.ctx.magnification;
        let left = i64::from(self.viewport.x);
        let top = i64::from(self.client.height)
            - (i64::from(self.viewport.y) + i64::from(self.viewport.height));
        let cx = (i64::from(x) - left).div_euclid(i64::from(mag.x));
        let cy = (i64::from(y) - top).div_euclid(i64::from(mag.y));
        CanvasPoint {
            x: cx.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
            y: cy.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
        }
    }

    /// Draw every layer into the client area.
    pub fn render(&mut self) -> PixelPaneResult<()> {
        if self.phase == Phase::Closed {
            return Err(PixelPaneError::presentation("render after shutdown"));
        }
        self.presenter.begin_frame(FrameTarget {
            client: self.client,
            viewport: self.viewport,
            magnification: self.ctx.magnification,
            clear: self.ctx.clear_color,
        })?;
        let drawn = self.ctx.canvas.draw_all(&mut self.presenter);
        let ended = self.presenter.end_frame();
        drawn.and(ended)
    }

    /// `true` between a successful startup and shutdown.
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Current client size.
    pub fn client(&self) -> Extent {
        self.client
    }

    /// Current canvas placement.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current solver bounds.
    pub fn bounds(&self) -> SolverBounds {
        self.solver.bounds()
    }

    /// Resize mode.
    pub fn resize_mode(&self) -> ResizeMode {
        self.solver.mode()
    }

    /// Window state shared with callbacks.
    pub fn context(&self) -> &WindowContext {
        &self.ctx
    }

    /// Mutable window state shared with callbacks.
    pub fn context_mut(&mut self) -> &mut WindowContext {
        &mut self.ctx
    }

    /// The application.
    pub fn app(&self) -> &A {
        &self.app
    }

    /// The application, mutable.
    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn solve(&mut self, proposed: Extent) -> ResizeOutcome {
        let Self {
            app, ctx, solver, ..
        } = self;
        solver.solve(proposed, &mut |canvas: &mut Extent| app.try_resize(ctx, canvas))
    }

    fn apply(&mut self, outcome: &ResizeOutcome) -> PixelPaneResult<()> {
        let canvas_changed = outcome.canvas != self.ctx.canvas.extent();
        if canvas_changed {
            self.ctx.canvas.resize(&mut self.presenter, outcome.canvas)?;
        }
        self.ctx.magnification = outcome.magnification;
        self.solver.commit(outcome);
        if canvas_changed {
            self.app.on_resize(&mut self.ctx, outcome.canvas);
        }
        Ok(())
    }

    fn refresh_viewport(&mut self) {
        let content = self.ctx.magnification.scale(self.ctx.canvas.extent());
        self.viewport = place_viewport(self.ctx.state, self.client, content);
    }
}

impl<A: PixelApp, P: Presenter> Drop for PixelWindow<A, P> {
    fn drop(&mut self) {
        if self.phase != Phase::Closed
            && let Err(err) = self.ctx.canvas.release(&mut self.presenter)
        {
            warn!(%err, "failed to release canvas on drop");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/window/session.rs"]
mod tests;
