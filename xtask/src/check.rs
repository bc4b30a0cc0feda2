use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking jig builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    // Check 1: Hardware target
    println!("{}", "  Checking hardware target (STM32L476RG)...".cyan());
    let hw_start = Instant::now();

    let hw_output = Command::new("cargo")
        .args([
            "check",
            "-p",
            "firmware",
            "--target",
            "thumbv7em-none-eabihf",
            "--features",
            "hardware",
        ])
        .output()
        .context("Failed to check hardware build")?;

    if !hw_output.status.success() {
        eprintln!("{}", "  ✗ Hardware check failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&hw_output.stderr));
        anyhow::bail!("Hardware check failed");
    }

    println!(
        "{}",
        format!(
            "  ✓ Hardware check passed in {:.2}s",
            hw_start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();

    // Check 2: Host targets (protocol/serial engines + this tool)
    println!("{}", "  Checking host workspace...".cyan());
    let host_start = Instant::now();

    let host_output = Command::new("cargo")
        .args(["check", "--workspace"])
        .output()
        .context("Failed to check host build")?;

    if !host_output.status.success() {
        eprintln!("{}", "  ✗ Host check failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&host_output.stderr));
        anyhow::bail!("Host check failed");
    }

    println!(
        "{}",
        format!(
            "  ✓ Host check passed in {:.2}s",
            host_start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();

    println!(
        "{}",
        format!(
            "✓ All checks passed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    Ok(())
}
