//! Bench-side serial console client.
//!
//! Talks the keyword dialect to a connected jig: `$XXX` queries answer
//! `!XXX ...`, `#XXX` sets answer `>XXX`, anything rejected answers `?`.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::{Read, Write};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

const REPLY_TIMEOUT: Duration = Duration::from_millis(1500);

/// Commands sent by `exercise`, with the reply sigil each must produce.
const SMOKE_SEQUENCE: &[(&str, char)] = &[
    ("$HCI", '!'),
    ("$BTN", '!'),
    ("$ADC", '!'),
    ("$TMP", '!'),
    ("$FAN", '!'),
    ("#BZR 1", '>'),
    ("#BZR 0", '>'),
    ("#LDC 0", '>'),
    ("#LDM 2", '>'),
    ("#LDM 0", '>'),
    ("#XRST 0", '>'),
];

pub fn list_ports() -> Result<()> {
    let ports = serialport::available_ports().context("Failed to enumerate serial ports")?;
    if ports.is_empty() {
        println!("{}", "No serial ports found.".yellow());
        return Ok(());
    }
    for port in ports {
        match port.port_type {
            serialport::SerialPortType::UsbPort(usb) => println!(
                "{}  {}",
                port.port_name.bold(),
                usb.product.unwrap_or_default().dimmed()
            ),
            _ => println!("{}", port.port_name),
        }
    }
    Ok(())
}

pub fn probe(port: &str, baud: u32) -> Result<()> {
    let mut console = open(port, baud)?;

    let reply = transact(&mut *console, "$HCI")?;
    let mut fields = reply.split_whitespace();
    let keyword = fields.next().unwrap_or_default();
    if keyword != "!HCI" {
        bail!("unexpected reply to $HCI: {reply:?}");
    }

    println!();
    println!("{}", "Jig identity".cyan().bold());
    for (label, value) in ["Part no", "Revision", "Serial no", "Build batch"]
        .iter()
        .zip(fields)
    {
        println!("  {:<12} {}", format!("{label}:").dimmed(), value.bold());
    }
    Ok(())
}

pub fn exercise(port: &str, baud: u32) -> Result<()> {
    let mut console = open(port, baud)?;

    println!();
    println!("{}", "Keyword smoke sequence".cyan().bold());
    println!();

    let start = Instant::now();
    let mut failures = 0_u32;
    for &(command, sigil) in SMOKE_SEQUENCE {
        let reply = transact(&mut *console, command)?;
        let ok = reply.starts_with(sigil);
        if ok {
            println!("  {} {:<10} {}", "✓".green(), command, reply.dimmed());
        } else {
            failures += 1;
            println!("  {} {:<10} {}", "✗".red().bold(), command, reply);
        }
    }

    println!();
    if failures > 0 {
        bail!("{failures} command(s) failed");
    }
    println!(
        "{}",
        format!(
            "✓ {} commands passed in {:.2}s",
            SMOKE_SEQUENCE.len(),
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    Ok(())
}

fn open(port: &str, baud: u32) -> Result<Box<dyn serialport::SerialPort>> {
    debug!(port, baud, "opening console");
    serialport::new(port, baud)
        .timeout(REPLY_TIMEOUT)
        .open()
        .with_context(|| format!("Failed to open {port}"))
}

/// Send one command line and collect the CR/LF-terminated reply.
fn transact(console: &mut dyn serialport::SerialPort, command: &str) -> Result<String> {
    trace!(command, "tx");
    console
        .write_all(format!("{command}\r").as_bytes())
        .context("Serial write failed")?;
    console.flush().context("Serial flush failed")?;

    let mut reply = Vec::new();
    let deadline = Instant::now() + REPLY_TIMEOUT;
    let mut byte = [0_u8; 1];
    while Instant::now() < deadline {
        match console.read(&mut byte) {
            Ok(1) => {
                if byte[0] == b'\n' {
                    break;
                }
                if byte[0] != b'\r' {
                    reply.push(byte[0]);
                }
            }
            Ok(_) => {}
            Err(err) if err.kind() == std::io::ErrorKind::TimedOut => break,
            Err(err) => return Err(err).context("Serial read failed"),
        }
    }
    let reply = String::from_utf8_lossy(&reply).into_owned();
    trace!(reply, "rx");
    if reply.is_empty() {
        bail!("no reply to {command:?} within {REPLY_TIMEOUT:?}");
    }
    Ok(reply)
}
