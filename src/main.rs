use anyhow::{Context, Result};
use clap::Parser;
use naval_autopilot::config::Config;
use naval_autopilot::device::AdbDevice;
use naval_autopilot::roster::Roster;
use naval_autopilot::session::Session;
use naval_autopilot::sortie::{SortieController, SortieEnd};
use naval_autopilot::vision::{TemplateRecognizer, assets};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Consecutive device failures tolerated before giving up.
const MAX_DEVICE_RETRIES: u32 = 3;

const MORALE_REST: Duration = Duration::from_secs(60 * 60);
const OIL_REST: Duration = Duration::from_secs(5 * 60);
const DEVICE_RETRY_DELAY: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(version, about = "Automated map clearing over adb")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Log every predicate and phase transition
    #[arg(short, long)]
    debug: bool,

    /// Use the legacy screencap mode for older adb builds
    #[arg(short, long)]
    legacy: bool,

    /// Stop after this many clears
    #[arg(long)]
    max_clears: Option<u32>,

    /// Run a single sortie and exit
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.debug {
        logger.filter_module("naval_autopilot", log::LevelFilter::Debug);
    }
    logger.init();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if args.legacy {
        config.device.legacy_screencap = true;
    }
    if let Some(n) = args.max_clears {
        config.combat.max_clears = n;
    }
    let config = Arc::new(config);

    let device = AdbDevice::new(&config.device);
    device.connect().context("connecting to the device")?;

    let recognizer = TemplateRecognizer::open(&config.assets).context("opening the asset pack")?;
    recognizer
        .verify(&[assets::MENU_BATTLE, assets::RETREAT_BUTTON, assets::BOSS])
        .context("verifying the asset pack")?;

    let mut session = Session::new(config.clone(), Box::new(device), Arc::new(recognizer));
    let mut sortie = SortieController::new(config.clone(), Roster::from_config(&config));
    let mut device_failures = 0;

    loop {
        let report = match sortie.run(&mut session) {
            Ok(report) => {
                device_failures = 0;
                report
            }
            Err(e) if !e.needs_operator() && device_failures < MAX_DEVICE_RETRIES => {
                device_failures += 1;
                log::warn!("{} (retry {} of {})", e, device_failures, MAX_DEVICE_RETRIES);
                thread::sleep(DEVICE_RETRY_DELAY);
                continue;
            }
            Err(e) => {
                log::error!("{}", e);
                log::info!("{}", session.stats.summary());
                return Err(e.into());
            }
        };

        log::info!(
            "Sortie finished with {:?}: {} of {} cycles cleared",
            report.end,
            report.clears(),
            report.exits.len()
        );
        log::info!("{}", session.stats.summary());

        match report.end {
            SortieEnd::MoraleTooLow => {
                log::info!("Resting for an hour to recover morale");
                thread::sleep(MORALE_REST);
            }
            SortieEnd::OilLow => {
                log::info!("Waiting for oil");
                thread::sleep(OIL_REST);
            }
            SortieEnd::RetireCycle | SortieEnd::MaintenanceDue => sortie.maintain(&mut session)?,
            SortieEnd::Stopped | SortieEnd::ClearLimit | SortieEnd::FleetDefeated => break,
        }
        if args.once {
            break;
        }
    }
    Ok(())
}
