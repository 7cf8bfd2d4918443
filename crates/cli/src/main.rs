use std::path::PathBuf;
use std::process;

use clap::Parser;

use distblur_core::blurring::infrastructure::separable_convolution::SeparableConvolution;
use distblur_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use distblur_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use distblur_core::pipeline::blur_job_use_case::BlurJobUseCase;
use distblur_core::pipeline::job_logger::LogJobLogger;
use distblur_core::shared::job_params::JobParams;

/// Gaussian blur of an image, with its rows split across worker ranks.
#[derive(Parser)]
#[command(name = "distblur", version, allow_negative_numbers = true)]
struct Cli {
    /// Blur radius in pixels (1-1000).
    radius: i64,

    /// Input image (PPM or any format the image crate decodes).
    input: PathBuf,

    /// Output image; the format follows the extension.
    output: PathBuf,

    /// Number of worker ranks (default: available parallelism).
    #[arg(long, short = 'n')]
    workers: Option<usize>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        if e.use_stderr() {
            let _ = e.print();
            process::exit(1);
        }
        e.exit()
    });

    let params = JobParams::new(cli.radius, cli.input, cli.output)?;
    let workers = cli.workers.unwrap_or_else(default_workers);
    if workers == 0 {
        return Err("Worker count must be at least 1".into());
    }

    let mut use_case = BlurJobUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        Box::new(SeparableConvolution::new()),
        Box::new(LogJobLogger::new()),
        workers,
    );
    let report = use_case.execute(&params)?;

    println!(
        "Filtering took: {} secs",
        report.distributed_time.as_secs_f64()
    );
    log::info!("Output written to {}", params.output().display());
    Ok(())
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
