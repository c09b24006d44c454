use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use ringsum::config::Config;
use ringsum::models::window::{self, WindowStep};
use ringsum::util::report;
use ringsum::RingBuffer;
use std::io::{self, Read};

#[derive(Parser, Debug)]
#[command(name = "ringsum", about = "Rolling sum over a fixed-capacity ring buffer", version = "0.1")]
struct Cli {
    /// Samples to push, in order; read from stdin when omitted
    #[arg(allow_negative_numbers = true)]
    values: Vec<f64>,

    /// Window capacity (overrides the config file)
    #[arg(short, long)]
    capacity: Option<usize>,

    /// Decimals used when printing samples (overrides the config file)
    #[arg(short, long)]
    precision: Option<usize>,

    /// Print a JSON document of every step and exit
    #[arg(long, conflicts_with = "report")]
    json: bool,

    /// Print a human-readable window report and exit
    #[arg(long)]
    report: bool,

    /// Run the demonstration: fill, overflow, destroy, then misuse the buffer
    #[arg(long)]
    demo: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    config: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let mut cli = Cli::parse();
    let cfg = Config::load();

    let capacity  = cli.capacity.unwrap_or(cfg.general.capacity);
    let precision = cli.precision.unwrap_or(cfg.general.precision);

    if cli.config {
        return run_print_config(&cfg);
    }
    if cli.demo {
        return run_demo(capacity, precision, &cfg.demo.values);
    }

    let values = if cli.values.is_empty() {
        read_stdin_values()?
    } else {
        std::mem::take(&mut cli.values)
    };
    let mut buf = RingBuffer::new(capacity)?;

    if cli.json || cli.report {
        let steps = window::run_window(&mut buf, values)?;
        if cli.json {
            return run_json(capacity, &buf, &steps);
        }
        print!("{}", report::generate(capacity, &steps, precision));
        return Ok(());
    }

    for v in values {
        buf.push(v)?;
        println!("{:.*}", precision, buf);
    }
    Ok(())
}

fn read_stdin_values() -> Result<Vec<f64>> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    parse_values(&text)
}

fn parse_values(text: &str) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|tok| tok.parse::<f64>().with_context(|| format!("invalid sample {:?}", tok)))
        .collect()
}

fn run_json(capacity: usize, buf: &RingBuffer, steps: &[WindowStep]) -> Result<()> {
    use serde_json::json;

    let doc = json!({
        "ringsum_version": "0.1",
        "timestamp": chrono::Local::now().to_rfc3339(),
        "capacity":  capacity,
        "steps":     steps,
        "final":     buf.snapshot()?,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn run_demo(capacity: usize, precision: usize, values: &[f64]) -> Result<()> {
    let mut buf = RingBuffer::new(capacity)?;
    info!("demo: capacity {}, {} samples", capacity, values.len());

    for v in values {
        buf.push(*v)?;
        println!("{:.*}", precision, buf);
    }

    buf.destroy()?;
    println!("Destroyed buffer");

    let next = values.last().map(|v| v + 1.0).unwrap_or(0.0);
    match buf.push(next) {
        Ok(_)  => anyhow::bail!("push after destroy was accepted"),
        Err(e) => println!("Push of {} after destroy rejected: {}", next, e),
    }
    Ok(())
}

fn run_print_config(cfg: &Config) -> Result<()> {
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    println!("Config: {}", path);
    println!();
    println!("[general]");
    println!("  capacity  = {}", cfg.general.capacity);
    println!("  precision = {}", cfg.general.precision);
    println!();
    println!("[demo]");
    println!("  values = {:?}", cfg.demo.values);
    Ok(())
}
