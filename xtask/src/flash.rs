use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

pub fn run(release: bool, bin: &str) -> Result<()> {
    let mode = if release { "release" } else { "debug" };

    println!();
    println!(
        "{}",
        format!("🔨 Building {bin} ({mode} mode)...").cyan().bold()
    );
    println!();

    // Build the jig image for the STM32L4 target
    let build_start = Instant::now();
    let mut build_cmd = Command::new("cargo");
    build_cmd
        .arg("build")
        .arg("-p")
        .arg("firmware")
        .arg("--bin")
        .arg(bin)
        .arg("--target")
        .arg("thumbv7em-none-eabihf")
        .arg("--features")
        .arg("hardware");

    if release {
        build_cmd.arg("--release");
    }

    let build_output = build_cmd.output().context("Failed to run cargo build")?;

    if !build_output.status.success() {
        eprintln!("{}", "✗ Build failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&build_output.stderr));
        anyhow::bail!("Build failed");
    }

    let build_time = build_start.elapsed();
    println!(
        "{}",
        format!("✓ Build successful in {:.2}s", build_time.as_secs_f64()).green()
    );
    println!();

    // Flash with probe-rs
    println!("{}", "📡 Flashing to STM32L476RG...".cyan().bold());
    println!("   {}", "Connecting to probe...".dimmed());

    let flash_start = Instant::now();
    let binary_path = format!("target/thumbv7em-none-eabihf/{mode}/{bin}");
    let flash_output = Command::new("probe-rs")
        .arg("run")
        .arg("--chip")
        .arg("STM32L476RGTx")
        .arg(&binary_path)
        .output()
        .context("Failed to run probe-rs (is it installed?)")?;

    if !flash_output.status.success() {
        eprintln!("{}", "✗ Flash failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&flash_output.stderr));
        anyhow::bail!("Flash failed");
    }

    println!(
        "{}",
        format!(
            "✓ Flashed in {:.2}s — jig console live on the ST-Link VCP",
            flash_start.elapsed().as_secs_f64()
        )
        .green()
    );
    Ok(())
}
