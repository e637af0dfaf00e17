use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use pixelpane::{
    ClientRect, DragEdge, Extent, OverlayMode, Pixel, PixelApp, PixelWindow, PlatformLimits,
    ResizeOutcome, ResizeSolver, SoftwarePresenter, TextRasterizer, TextStyle, WindowConfig,
    WindowContext, apply_trim,
};

#[derive(Parser, Debug)]
#[command(name = "pixelpane", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the admissible canvas, magnification and client sizes for a config.
    Limits(LimitsArgs),
    /// Negotiate one proposed client size and print the outcome as JSON.
    Solve(SolveArgs),
    /// Render the layered demo scene to a PNG.
    Demo(DemoArgs),
}

#[derive(Parser, Debug)]
struct PlatformArgs {
    /// Window config JSON (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ignore the platform minimum window size.
    #[arg(long, default_value_t = false)]
    unconstrained: bool,
}

#[derive(Parser, Debug)]
struct LimitsArgs {
    #[command(flatten)]
    platform: PlatformArgs,
}

#[derive(Parser, Debug)]
struct SolveArgs {
    #[command(flatten)]
    platform: PlatformArgs,

    /// Proposed client width in device pixels.
    #[arg(long)]
    width: u32,

    /// Proposed client height in device pixels.
    #[arg(long)]
    height: u32,

    /// Edge or corner being dragged (e.g. `bottom-right`, `top-left`).
    #[arg(long, default_value = "bottom-right")]
    edge: DragEdge,

    /// Left edge of the proposed client rectangle.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    left: i32,

    /// Top edge of the proposed client rectangle.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    top: i32,
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Window config JSON (defaults to a 256x240 canvas at 2x2 with two extra layers).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Font file for the text layer. The text layer is skipped without one.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Text drawn on the top layer.
    #[arg(long, default_value = "Lorem Ipsum")]
    text: String,

    /// Number of simulated 16 ms updates before rendering.
    #[arg(long, default_value_t = 1)]
    frames: u32,
}

#[derive(serde::Serialize)]
struct SolveReport {
    outcome: ResizeOutcome,
    trimmed: ClientRect,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Limits(args) => cmd_limits(args),
        Command::Solve(args) => cmd_solve(args),
        Command::Demo(args) => cmd_demo(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("PIXELPANE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>, fallback: WindowConfig) -> anyhow::Result<WindowConfig> {
    match path {
        Some(p) => WindowConfig::from_path(p)
            .with_context(|| format!("load window config '{}'", p.display())),
        None => Ok(fallback),
    }
}

fn limits(args: &PlatformArgs) -> PlatformLimits {
    if args.unconstrained {
        PlatformLimits::unconstrained()
    } else {
        PlatformLimits::default()
    }
}

fn cmd_limits(args: LimitsArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.platform.config.as_deref(), WindowConfig::default())?;
    let solver = ResizeSolver::new(&cfg, limits(&args.platform))?;
    println!("{}", serde_json::to_string_pretty(&solver.bounds())?);
    Ok(())
}

fn cmd_solve(args: SolveArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.platform.config.as_deref(), WindowConfig::default())?;
    let solver = ResizeSolver::new(&cfg, limits(&args.platform))?;

    let proposed = ClientRect::from_origin(args.left, args.top, Extent::new(args.width, args.height));
    let outcome = solver.solve(proposed.extent(), &mut |_| true);
    let report = SolveReport {
        outcome,
        trimmed: apply_trim(proposed, args.edge, outcome.client),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

const DEMO_MONITOR: Extent = Extent::new(1920, 1080);

fn demo_config() -> WindowConfig {
    WindowConfig {
        title: "pixelpane demo".to_owned(),
        width: 256,
        height: 240,
        pixel_width: 2,
        pixel_height: 2,
        max_width: 400,
        max_height: 400,
        extra_layers: 2,
        clear_color: Pixel::by_rgb(0x10_1010),
        ..WindowConfig::default()
    }
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref(), demo_config())?;
    let text = match &args.font {
        Some(path) => {
            let mut raster = TextRasterizer::from_path(path)?;
            let style = TextStyle {
                size_px: 12.0,
                color: Pixel::WHITE,
                antialias: false,
            };
            Some(raster.rasterize(&args.text, &style)?)
        }
        None => None,
    };

    let app = DemoApp {
        text,
        failure: None,
    };
    let mut win = PixelWindow::new(app, SoftwarePresenter::new(), &cfg, PlatformLimits::default())?;
    if !win.startup(cfg.state, DEMO_MONITOR)? {
        let reason = win.app_mut().failure.take();
        anyhow::bail!(
            "demo startup failed: {}",
            reason.unwrap_or_else(|| "aborted".to_owned())
        );
    }
    for _ in 0..args.frames {
        win.update(Duration::from_millis(16))?;
    }
    win.render()?;

    let frame = win
        .presenter()
        .last_frame()
        .context("presenter produced no frame")?;
    frame.save_png(&args.out)?;
    win.shutdown()?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

struct DemoApp {
    text: Option<pixelpane::Bitmap>,
    failure: Option<String>,
}

impl DemoApp {
    fn draw_checkerboard(ctx: &mut WindowContext) -> pixelpane::PixelPaneResult<()> {
        let shade = Pixel::by_rgb(0xAA_AAAA);
        let layer = ctx.layer_mut(0)?;
        let bmp = layer.bitmap_mut();
        bmp.clear(Pixel::BLANK);
        for y in 0..bmp.height() {
            for x in 0..bmp.width() {
                if (x + y) % 2 == 1 {
                    bmp.set(x as i32, y as i32, shade)?;
                }
            }
        }
        layer.set_opacity(0.5);
        layer.invalidate();
        Ok(())
    }

    fn draw_marker(ctx: &mut WindowContext) -> pixelpane::PixelPaneResult<()> {
        if ctx.layer_count() < 2 {
            return Ok(());
        }
        let (w, h) = (ctx.width() as i32, ctx.height() as i32);
        let layer = ctx.layer_mut(1)?;
        layer.bitmap_mut().clear(Pixel::BLANK);
        layer.bitmap_mut().set(w - 1, h - 1, Pixel::WHITE)?;
        layer.invalidate();
        Ok(())
    }

    fn startup(&mut self, ctx: &mut WindowContext) -> pixelpane::PixelPaneResult<()> {
        Self::draw_checkerboard(ctx)?;
        Self::draw_marker(ctx)?;
        if let Some(text) = &self.text {
            let index = ctx.layer_count() - 1;
            let layer = ctx.layer_mut(index)?;
            layer
                .bitmap_mut()
                .draw_sub_image(text, 0, 0, OverlayMode::OpaqueOnly);
            layer.invalidate();
        }
        Ok(())
    }
}

impl PixelApp for DemoApp {
    fn on_startup(&mut self, ctx: &mut WindowContext) -> bool {
        match self.startup(ctx) {
            Ok(()) => true,
            Err(err) => {
                self.failure = Some(err.to_string());
                false
            }
        }
    }

    fn on_update(&mut self, ctx: &mut WindowContext, elapsed: Duration) -> bool {
        if Self::draw_marker(ctx).is_err() {
            return false;
        }
        if let Ok(layer) = ctx.layer_mut(1) {
            let faded = layer.opacity() - elapsed.as_secs_f32();
            layer.set_opacity(if layer.opacity() == 0.0 { 1.0 } else { faded });
        }
        true
    }

    fn on_resize(&mut self, ctx: &mut WindowContext, _canvas: Extent) {
        if let Err(err) = Self::draw_checkerboard(ctx) {
            tracing::warn!(%err, "checkerboard redraw failed");
        }
    }
}
