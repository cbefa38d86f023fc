//! Standalone flight binary.
//!
//! Usage:
//!   cargo run -p flight_sim -- [--config flight.json] [--script path.json] [--ticks 600]
//!
//! With `--ticks` the simulation runs headless as fast as possible and prints
//! the final pose as JSON. Otherwise it runs in real time until `quit`.
//!
//! Console commands:
//!   roll ccw|cw|none
//!   pitch ccw|cw|none
//!   boost forward|reverse|none
//!   status
//!   quit

use std::env;
use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Context;
use flight_core::{config::FlightConfig, render::TracingRenderer};
use flight_input::FlightScript;
use flight_sim::{FixedStepLoop, Simulation};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    script: Option<String>,
    ticks: Option<u64>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut out = Args::default();
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                out.config = Some(args[i + 1].clone());
                i += 2;
            }
            "--script" if i + 1 < args.len() => {
                out.script = Some(args[i + 1].clone());
                i += 2;
            }
            "--ticks" if i + 1 < args.len() => {
                let n = args[i + 1]
                    .parse()
                    .with_context(|| format!("invalid --ticks value '{}'", args[i + 1]))?;
                out.ticks = Some(n);
                i += 2;
            }
            other => {
                warn!(arg = other, "Ignoring unknown argument");
                i += 1;
            }
        }
    }
    Ok(out)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = parse_args()?;
    let cfg = match &args.config {
        Some(path) => FlightConfig::from_file(path)?,
        None => FlightConfig::default(),
    };
    cfg.validate().context("invalid configuration")?;
    let mut script = match &args.script {
        Some(path) => FlightScript::from_file(path)?,
        None => FlightScript::default(),
    };

    let mut sim = Simulation::new(&cfg);
    let mut renderer = TracingRenderer::default();

    if let Some(ticks) = args.ticks {
        info!(ticks, "Running headless");
        for _ in 0..ticks {
            sim.step_scripted(&mut script);
            sim.frame(&mut renderer);
        }
        let report = serde_json::to_string_pretty(&sim.report()).context("encode report")?;
        println!("{report}");
        return Ok(());
    }

    let (console_tx, mut console_rx) = mpsc::channel::<String>(32);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        loop {
            print!("> ");
            let _ = stdout.flush();
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim().to_string();
            if !line.is_empty() && console_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    println!("Flight ready. Type 'help' for commands, 'quit' to exit.");

    let frame_interval = Duration::from_secs_f32(cfg.tick_delta_s);
    let start = tokio::time::Instant::now();
    let mut next_frame = start;
    let mut pacing = FixedStepLoop::new(&cfg);
    let report_every = (1.0 / cfg.tick_delta_s).round().max(1.0) as u64;

    loop {
        while let Ok(line) = console_rx.try_recv() {
            match sim.exec_console(&line) {
                Ok(Some(lines)) => {
                    for l in lines {
                        println!("{l}");
                    }
                }
                Ok(None) => return Ok(()),
                Err(e) => println!("{e:#}"),
            }
        }

        let due = pacing.due_ticks(start.elapsed().as_secs_f64());
        for _ in 0..due {
            sim.step_scripted(&mut script);
            if sim.tick() % report_every == 0 {
                let p = sim.ship().position();
                info!(
                    tick = sim.tick(),
                    x = p.x(),
                    y = p.y(),
                    z = p.z(),
                    speed = sim.ship().speed(),
                    "Pose"
                );
            }
        }
        if due > 0 {
            sim.frame(&mut renderer);
        }

        next_frame += frame_interval;
        tokio::time::sleep_until(next_frame).await;
    }
}
