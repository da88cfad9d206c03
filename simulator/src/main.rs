use anyhow::Context;
use bridge::server::{bridge_bind_address, ServoBridge};
use clap::Parser;
use feed::replay::load_replay;
use generator::flight::{build_traffic, FlightConfig};
use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::CameraConfig;
use workflow::runner::Runner;

mod bridge;
mod feed;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Offline driver and servo bridge for the SkySense tracking core"
)]
struct Args {
    /// Replay telemetry through the tracker and emit a pointing summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load the camera mount from YAML
    #[arg(long)]
    camera: Option<PathBuf>,
    /// JSON-lines telemetry recording; a synthetic passing flight is used otherwise
    #[arg(long)]
    replay: Option<PathBuf>,
    #[arg(long, default_value_t = 58.3977)]
    latitude: f64,
    #[arg(long, default_value_t = 15.5765)]
    longitude: f64,
    #[arg(long, default_value_t = 300.0)]
    altitude: f64,
    #[arg(long, default_value_t = 0.0)]
    direction: f64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 1.0)]
    tick_secs: f64,
    #[arg(long, default_value_t = 180.0)]
    duration_secs: f64,
    #[arg(long, default_value = "tools/data/offline_pointing.log")]
    report: PathBuf,
    /// Keep the servo bridge alive for incoming telemetry
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let camera_config = if let Some(path) = args.camera.as_ref() {
        CameraConfig::load(path)?
    } else {
        CameraConfig::from_args(args.latitude, args.longitude, args.altitude, args.direction)
    };
    let runner = Runner::new(camera_config.clone(), args.tick_secs);

    if args.offline {
        let samples = match args.replay.as_ref() {
            Some(path) => load_replay(path)?,
            None => build_traffic(&[FlightConfig::passing(
                camera_config.latitude_deg,
                camera_config.longitude_deg,
                args.seed,
            )])?,
        };
        let result = runner
            .execute(&samples, args.duration_secs)
            .context("running offline replay")?;

        println!(
            "Offline run -> ticks {}, aircraft {}, solutions {}, visible {}",
            result.ticks,
            result.aircraft_seen,
            result.solutions.len(),
            result.visible_ticks
        );

        let mut report = String::new();
        for solution in &result.solutions {
            report.push_str(&format!(
                "t={:.2} id={} pan={:.4} tilt={:.4} visible={}\n",
                solution.at, solution.aircraft, solution.pan, solution.tilt, solution.visible
            ));
        }
        report.push_str(&format!("metrics={:?}\n", result.metrics));
        if let Some(parent) = args.report.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&args.report)
            .with_context(|| format!("opening report {}", args.report.display()))?;
        file.write_all(report.as_bytes())?;
    }
    if args.serve {
        let controller = Arc::new(RwLock::new(runner.build_controller()?));
        let bridge = ServoBridge::new(controller);
        bridge.spawn(bridge_bind_address());
        info!("servo bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
