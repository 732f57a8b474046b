use bringup::harness::Harness;
use bringup::init_log;
use bringup::model::SocModel;
use bringup::platform::PlatformConfig;
use bringup::safety::PreloadedPayload;
use bringup::Strategy;
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// SoC bring-up self-check: runs the domain sequencer, safety-island
/// offload and memory probes against the built-in behavioural model
#[derive(Parser, Debug)]
#[command(name = "bringup")]
#[command(version = "0.1.0")]
#[command(about = "Multi-domain SoC bring-up and verification harness", long_about = None)]
struct Args {
  /// Platform address map (TOML); built-in demo map if omitted
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Sample points per probed region
  #[arg(short, long, default_value_t = 1024)]
  samples: i64,

  /// Probe ordering: interleaved or batched
  #[arg(long, value_name = "STRATEGY", default_value = "interleaved")]
  strategy: String,

  /// Quiet mode (errors only)
  #[arg(short, long)]
  quiet: bool,

  /// Write the probe report as JSON
  #[arg(long, value_name = "FILE")]
  report: Option<PathBuf>,
}

fn main() -> std::io::Result<()> {
  let args = Args::parse();
  init_log(args.quiet);

  let strategy = match args.strategy.to_lowercase().as_str() {
    "interleaved" => Strategy::Interleaved,
    "batched" => Strategy::Batched,
    other => {
      return Err(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        format!("unknown strategy: {}", other),
      ));
    }
  };

  let platform = match &args.config {
    Some(path) => PlatformConfig::load(path)?,
    None => PlatformConfig::demo(),
  };

  let model = SocModel::new(platform.soc_ctrl.base, platform.safety_island.base);
  let mut harness = Harness::new(model, platform);

  let report = harness.probe_all(strategy, args.samples);
  let probes_ok = report.all_passed();

  let offload = harness.bringup_safety(&mut PreloadedPayload);
  let offload_ok = match &offload {
    Ok(ran) => {
      if *ran {
        log::info!("safety island offload completed");
      }
      true
    }
    Err(e) => {
      log::error!("safety island offload failed: {} (code {})", e, e.code());
      false
    }
  };

  if let Some(path) = &args.report {
    let mut file = File::create(path)?;
    writeln!(file, "{}", serde_json::to_string_pretty(&report)?)?;
  }

  if probes_ok && offload_ok {
    Ok(())
  } else {
    Err(std::io::Error::new(
      std::io::ErrorKind::Other,
      "bring-up self-check reported failures",
    ))
  }
}
