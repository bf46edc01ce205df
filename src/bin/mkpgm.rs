//! mkpgm - average a directory of raw QL frames into a quicklook PGM
//!
//! Usage: mkpgm <input_dir> <darkframe> <output>
//!
//! Every file directly under `input_dir` whose name has an extension and
//! contains `QL` is read as a 2048x1920 frame of 16-bit samples and folded into
//! a running mean. The mean is written to `output` once all files are read.

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use cmos_quicklook::{pipeline, OutputFormat, QuicklookConfig, QuicklookRun};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory scanned (non-recursively) for QL frames.
    input_dir: PathBuf,
    /// Dark frame path. Accepted for compatibility; not applied.
    darkframe: PathBuf,
    /// Output raster path.
    output: PathBuf,
    /// Output format (pgm|raw). Overrides QUICKLOOK_FORMAT.
    #[arg(long, value_name = "FORMAT")]
    format: Option<OutputFormat>,
    /// UI mode for stderr progress (auto|plain|pretty). Overrides QUICKLOOK_UI.
    #[arg(long, value_name = "MODE")]
    ui: Option<String>,
    /// Write a JSON run summary here. Overrides QUICKLOOK_REPORT.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            // Usage errors are printed on stdout.
            println!("{}", err.render());
            std::process::exit(err.exit_code());
        }
        Err(err) => err.exit(),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut cfg = QuicklookConfig::load()?;
    if let Some(format) = args.format {
        cfg.format = format;
    }
    if let Some(mode) = args.ui {
        cfg.ui = mode;
    }
    if args.report.is_some() {
        cfg.report_path = args.report;
    }
    cfg.validate()?;

    let ui = ui::Ui::new(
        ui::UiMode::from_name(&cfg.ui),
        std::io::stderr().is_terminal(),
        std::io::stdout().is_terminal(),
    );

    let run = QuicklookRun::new(args.input_dir, args.darkframe, args.output)
        .with_format(cfg.format)
        .with_report(cfg.report_path);

    let (acc, summary) = {
        let _stage = ui.stage("Scan and accumulate");
        pipeline::accumulate(&run)?
    };
    {
        let _stage = ui.stage("Write raster");
        pipeline::finish(&run, &acc, summary)?;
    }
    Ok(())
}
