//! Android device over `adb`.

use super::Device;
use crate::config::DeviceConfig;
use crate::error::{EngineError, Result};
use crate::geometry::Point;
use image::GrayImage;
use std::path::PathBuf;
use std::process::{Command, Output};

pub struct AdbDevice {
    adb: PathBuf,
    serial: String,
    legacy: bool,
}

impl AdbDevice {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            adb: config.adb_path.clone(),
            serial: config.serial.clone(),
            legacy: config.legacy_screencap,
        }
    }

    /// Restart the adb server and make sure the device is attached,
    /// connecting over the network when it is not.
    pub fn connect(&self) -> Result<()> {
        self.run(&["kill-server"])?;
        self.run(&["start-server"])?;

        let state = self.run_for_device(&["get-state"])?;
        if String::from_utf8_lossy(&state.stdout).contains("device") {
            log::info!("Device {} already attached", self.describe());
            return Ok(());
        }
        if self.serial.is_empty() {
            return Err(EngineError::Device("no device attached".into()));
        }

        let out = self.run(&["connect", &self.serial])?;
        let text = String::from_utf8_lossy(&out.stdout);
        if text.starts_with("connected") || text.starts_with("already connected") {
            log::info!("Connected to {}", self.serial);
            Ok(())
        } else {
            Err(EngineError::Device(format!(
                "unable to connect to {}: {}",
                self.serial,
                text.trim()
            )))
        }
    }

    fn describe(&self) -> &str {
        if self.serial.is_empty() { "(default)" } else { &self.serial }
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        let output = Command::new(&self.adb).args(args).output()?;
        Ok(output)
    }

    fn run_for_device(&self, args: &[&str]) -> Result<Output> {
        let mut cmd = Command::new(&self.adb);
        if !self.serial.is_empty() {
            cmd.arg("-s").arg(&self.serial);
        }
        let output = cmd.args(args).output()?;
        Ok(output)
    }

    fn shell(&self, command: &str) -> Result<()> {
        log::trace!("adb shell {}", command);
        let mut args = vec!["shell"];
        args.extend(command.split(' '));
        let out = self.run_for_device(&args)?;
        if !out.status.success() {
            return Err(EngineError::Device(format!(
                "'{}' failed: {}",
                command,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        Ok(())
    }
}

impl Device for AdbDevice {
    fn capture_frame(&mut self) -> Result<GrayImage> {
        let out = self.run_for_device(&["exec-out", "screencap", "-p"])?;
        if !out.status.success() {
            return Err(EngineError::Device(format!("screencap failed with {}", out.status)));
        }
        if out.stdout.is_empty() {
            return Err(EngineError::NoFrame);
        }
        let png = if self.legacy {
            strip_carriage_returns(&out.stdout)
        } else {
            out.stdout
        };
        let decoded = image::load_from_memory(&png)
            .map_err(|e| EngineError::Device(format!("cannot decode screencap: {}", e)))?;
        Ok(decoded.to_luma8())
    }

    fn tap(&mut self, at: Point, hold_ms: u32) -> Result<()> {
        self.shell(&format!(
            "input swipe {} {} {} {} {}",
            at.x, at.y, at.x, at.y, hold_ms
        ))
    }

    fn swipe(&mut self, from: Point, to: Point, duration_ms: u32) -> Result<()> {
        self.shell(&format!(
            "input swipe {} {} {} {} {}",
            from.x, from.y, to.x, to.y, duration_ms
        ))
    }
}

/// Undo the `\n` -> `\r\n` rewrite older adb builds apply to exec-out.
fn strip_carriage_returns(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if data[i] == b'\r' && data.get(i + 1) == Some(&b'\n') {
            i += 1;
            continue;
        }
        out.push(data[i]);
        i += 1;
    }
    out
}
