//! Simulated System Tick Example
//!
//! Binds a system timer to a simulated interrupt-counted peripheral, installs
//! a callback and lets a ticker thread deliver timer interrupts for a while.
//!
//! ```text
//! cargo run -p sim-ticker -- --rate-hz 1000 --run-ms 500 --width 8 --stop-ms 250
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use mcu_hal::{init_clocks, Callback, SystemTimer, TimerConfig};
use mcu_hal_sim::{SimBoard, SimCounterConfig, SimTicker};

#[derive(Parser, Debug)]
#[command(name = "sim-ticker")]
#[command(about = "Run a system timer on the simulated board", long_about = None)]
#[command(version)]
struct Args {
    /// Timer interrupt rate
    #[arg(long, default_value_t = 1000, value_name = "HZ")]
    rate_hz: u32,

    /// Total run time
    #[arg(long, default_value_t = 500, value_name = "MS")]
    run_ms: u64,

    /// Significant counter bits (1-32)
    #[arg(long, default_value_t = 32, value_name = "BITS")]
    width: u32,

    /// Stop the timer after this long and keep the ticker running
    #[arg(long, value_name = "MS")]
    stop_ms: Option<u64>,
}

static CALLBACKS: AtomicU64 = AtomicU64::new(0);

fn on_tick() {
    CALLBACKS.fetch_add(1, Ordering::Relaxed);
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(stop_ms) = args.stop_ms {
        if stop_ms > args.run_ms {
            bail!("--stop-ms ({stop_ms}) must not exceed --run-ms ({})", args.run_ms);
        }
    }

    let mut board = SimBoard::new();
    let clock = board.take_clock().context("clock already taken")?;
    let clocks = init_clocks(clock);

    let (counter, driver) = board
        .take_counter::<u32>(0, SimCounterConfig::interrupt_counted(args.width))
        .context("counter allocation failed")?;
    let config = TimerConfig::builder()
        .name("systick")
        .tick_hz(args.rate_hz)
        .build();
    let timer = SystemTimer::bind(counter, &clocks, config)
        .context("timer bind failed")?;
    let timer = Arc::new(timer);

    timer.set_callback(Some(Callback::new(&on_tick)));
    let ticker = SimTicker::spawn(timer.clone(), driver, args.rate_hz)?;

    println!(
        "{}-bit timer at {} Hz, running for {} ms",
        timer.width().bits(),
        args.rate_hz,
        args.run_ms
    );

    timer.start();
    let start = timer.ticks();

    let remaining = match args.stop_ms {
        Some(stop_ms) => {
            thread::sleep(Duration::from_millis(stop_ms));
            timer.stop();
            let stopped_at = timer.ticks();
            println!("stopped at {} ticks after {} ms", stopped_at, stop_ms);
            args.run_ms - stop_ms
        }
        None => args.run_ms,
    };
    thread::sleep(Duration::from_millis(remaining));

    let elapsed = timer.elapsed(start);
    let callbacks = CALLBACKS.load(Ordering::Relaxed);
    ticker.stop();

    println!("state:     {:?}", timer.state());
    println!("ticks:     {}", timer.ticks());
    println!(
        "elapsed:   {} ticks ({} us)",
        elapsed,
        timer.ticks_to_micros(elapsed)
    );
    println!("callbacks: {}", callbacks);

    if timer.set_callback(None).is_none() {
        bail!("callback was lost");
    }
    Ok(())
}
