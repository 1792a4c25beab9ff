use clap::Parser;
use log::info;
use rolling_stats::Stats;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use pulsegate::config::RunConfig;
use pulsegate::input::read_samples;
use pulsegate::output::SampleRecord;
use pulsegate::QrsDetector;

#[derive(Parser, Debug)]
#[command(name = "pulsegate")]
#[command(about = "Real-time fixed-point QRS detection over 200 Hz ECG files", long_about = None)]
struct Args {
    /// Input ECG file, one 16-bit sample per line
    input: PathBuf,

    /// Output CSV path
    #[arg(short = 'o', long, default_value = "output.csv")]
    output: PathBuf,

    /// Echo each CSV row to stdout as it is written
    #[arg(short = 'e', long)]
    echo: bool,

    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = RunConfig::new(args.input);
    config.output = args.output;
    config.echo = args.echo;

    let stats = run_detection(&config)?;

    println!("{} beats detected", stats.beat_count);

    if stats.rr_stats.count > 1 {
        println!();
        println!("RR interval statistics:");
        println!("  Intervals: {}", stats.rr_stats.count);
        println!("  Mean: {:.1} samples", stats.rr_stats.mean);
        println!("  Std dev: {:.1} samples", stats.rr_stats.std_dev);
        println!("  Min: {:.0} samples", stats.rr_stats.min);
        println!("  Max: {:.0} samples", stats.rr_stats.max);
    }

    Ok(())
}

struct RunStats {
    beat_count: u64,
    rr_stats: Stats<f32>,
}

fn run_detection(config: &RunConfig) -> anyhow::Result<RunStats> {
    let samples = read_samples(&config.input)?;
    info!(
        "{} samples read from {}",
        samples.len(),
        config.input.display()
    );

    let mut writer = BufWriter::new(File::create(&config.output)?);
    writeln!(writer, "{}", SampleRecord::CSV_HEADER)?;

    let mut detector = QrsDetector::new();
    let mut beat_count = 0u64;
    let mut rr_stats: Stats<f32> = Stats::new();
    let mut last_beat: Option<u64> = None;
    let mut sample_count = 0u64;

    for &sample in &samples {
        sample_count += 1;
        let delay = detector.process_sample(sample);

        let r_location = if delay != 0 {
            beat_count += 1;
            let location = sample_count - delay as u64;
            if let Some(previous) = last_beat {
                rr_stats.update((location - previous) as f32);
            }
            last_beat = Some(location);
            location
        } else {
            0
        };

        let record = SampleRecord {
            input: sample,
            lpf: detector.lpf_output(),
            hpf: detector.hpf_output(),
            drf: detector.drf_output(),
            sqf: detector.sqf_output(),
            mva: detector.mva_output(),
            r_location,
            th_i1: detector.th_i1(),
            spki: detector.spki(),
            npki: detector.npki(),
            th_f1: detector.th_f1(),
        };

        let row = record.csv_row();
        if config.echo {
            println!("{row}");
        }
        writeln!(writer, "{row}")?;
    }

    writer.flush()?;
    info!("wrote {} rows to {}", sample_count, config.output.display());

    Ok(RunStats {
        beat_count,
        rr_stats,
    })
}
