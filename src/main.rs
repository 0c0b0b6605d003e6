use anyhow::{Context, Result};
use clap::Parser;
use hapticsim::{
    ControlLoop, LogRenderer, LoopConfig, MonotonicClock, NoOpObserver, SimulatedDevice,
    StopFlag, StopRequest,
};

mod logging;

/// Drive a haptic handle against a virtual cursor and report loop timing
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Device index to open
    #[arg(long, default_value_t = 0)]
    device: u32,

    /// Target loop rate in Hz
    #[arg(long, default_value_t = 1600)]
    rate: u32,

    /// Contact spring stiffness
    #[arg(long, default_value_t = 5.0)]
    stiffness: f64,

    /// Fraction of contact force returned to the cursor, in [0, 1]
    #[arg(long, default_value_t = 0.9)]
    restitution: f64,

    /// Viscous damping on the cursor
    #[arg(long, default_value_t = 0.1)]
    damping: f64,

    /// Contact distance between handle and cursor centres
    #[arg(long, default_value_t = 0.1)]
    offset: f64,

    /// Cursor return gain while the handle pushes
    #[arg(long, default_value_t = 1.0)]
    push: f64,

    /// Cursor return gain while the handle pulls
    #[arg(long, default_value_t = 1.0)]
    pull: f64,

    /// Place the handle above the cursor and mirror the device axis
    #[arg(long)]
    mirrored: bool,

    /// Firmware image to load
    #[arg(long, default_value = hapticsim::config::DEFAULT_FIRMWARE)]
    firmware: String,

    /// Skip firmware loading
    #[arg(long)]
    no_firmware: bool,

    /// Stop after this many iterations
    #[arg(long)]
    iterations: Option<u64>,
}

impl Args {
    fn config(&self) -> LoopConfig {
        let mut config = LoopConfig::new()
            .with_target_rate(self.rate)
            .with_stiffness(self.stiffness)
            .with_restitution_loss(self.restitution)
            .with_damping(self.damping)
            .with_contact_offset(self.offset)
            .with_push_pull(self.push, self.pull)
            .with_firmware((!self.no_firmware).then(|| self.firmware.clone()));
        if self.mirrored {
            config = config.mirrored();
        }
        if let Some(n) = self.iterations {
            config = config.with_max_iterations(n);
        }
        config
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = args.config();
    config.validate().context("invalid loop configuration")?;

    let stop = StopFlag::new();
    let handler_flag = stop.clone();
    ctrlc::set_handler(move || match handler_flag.request() {
        StopRequest::First => log::info!("quitting (interrupt again to force)"),
        StopRequest::Repeated => std::process::exit(130),
    })
    .context("failed to install interrupt handler")?;

    let mapping = config.mapping;
    let device = SimulatedDevice::open(args.device, mapping.axis, mapping.lower, mapping.upper)
        .with_context(|| format!("no haptic device at index {}", args.device))?;

    let mut control = ControlLoop::new(config, device, LogRenderer::default(), MonotonicClock::new())
        .context("failed to start control loop")?;

    let summary = control.run(&stop, &mut NoOpObserver);
    control.shutdown();

    log::info!(
        "{} iterations, {} device faults, {} late frames, last rate {} Hz",
        summary.iterations,
        summary.fault_polls,
        summary.late_frames,
        summary.observed_rate
    );
    Ok(())
}
