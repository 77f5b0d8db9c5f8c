use anyhow::{Context, Result};
use clap::Parser;
use imgconv_cli::{
    flag_or, resolve_inputs, Cli, Commands, Config, ConfigCommands, OutputFormatter,
    ProgressReporter,
};
use imgconv_common::TargetFormat;
use imgconv_core::{BatchConverter, BatchProcessor, ConversionRequest};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Flags of the `convert` subcommand, before config defaults are applied
struct ConvertArgs {
    inputs: Vec<String>,
    format: Option<String>,
    width: u32,
    height: u32,
    lock_aspect: bool,
    no_lock_aspect: bool,
    output: Option<PathBuf>,
    quality: Option<u8>,
    overwrite: bool,
    no_overwrite: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        "imgconv=debug"
    } else {
        "imgconv=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .without_time()
        .init();

    // Load config
    let mut config = Config::load()?;

    // Override config with CLI flags
    if cli.no_color {
        config.colored_output = false;
    }
    if cli.no_progress {
        config.show_progress = false;
    }

    let formatter = OutputFormatter::new(config.colored_output);
    let progress = ProgressReporter::new(config.show_progress);

    match cli.command {
        Commands::Convert {
            inputs,
            format,
            width,
            height,
            lock_aspect,
            no_lock_aspect,
            output,
            quality,
            overwrite,
            no_overwrite,
        } => {
            let args = ConvertArgs {
                inputs,
                format,
                width,
                height,
                lock_aspect,
                no_lock_aspect,
                output,
                quality,
                overwrite,
                no_overwrite,
            };
            handle_convert(args, &config, &formatter, &progress).await?;
        }

        Commands::Formats => {
            let registry = imgconv_formats::register_default_codecs();
            formatter.print_formats(|format| {
                format.to_image_format().is_some() || registry.find(format).is_some()
            });
        }

        Commands::Config { action } => {
            handle_config(action, &formatter)?;
        }
    }

    Ok(())
}

async fn handle_convert(
    args: ConvertArgs,
    config: &Config,
    formatter: &OutputFormatter,
    progress: &ProgressReporter,
) -> Result<()> {
    // Validate the format before touching any file
    let format_str = args.format.unwrap_or_else(|| config.default_format.clone());
    let format: TargetFormat = format_str
        .parse()
        .with_context(|| format!("Unsupported format: {}", format_str))?;

    let files = resolve_inputs(&args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No files selected");
    }

    let quality = args.quality.unwrap_or(config.jpeg_quality);
    anyhow::ensure!((1..=100).contains(&quality), "Quality must be 1-100");

    let lock_aspect = flag_or(args.lock_aspect, args.no_lock_aspect, config.lock_aspect);
    let overwrite = flag_or(args.overwrite, args.no_overwrite, config.overwrite);
    let mut request = ConversionRequest::new(files, format)
        .with_resize(args.width, args.height, lock_aspect)
        .with_quality(quality)
        .with_overwrite(overwrite);
    if let Some(dir) = args.output.or_else(|| config.output_dir.clone()) {
        request = request.with_output_dir(dir);
    }

    formatter.info(&format!(
        "Converting {} files to {}",
        request.inputs.len(),
        formatter.format_format(format)
    ));

    // Ctrl-C stops the batch between files
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, finishing current file");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    let pb = progress.create_bar(request.inputs.len() as u64, "Converting...");
    let (tx, mut rx) = mpsc::unbounded_channel::<imgconv_core::BatchProgress>();
    let ticker = {
        let pb = pb.clone();
        tokio::spawn(async move {
            while let Some(update) = rx.recv().await {
                if let Some(pb) = &pb {
                    pb.set_position(update.completed as u64);
                    if let Some(file) = update.current_file.as_ref().and_then(|f| f.file_name()) {
                        pb.set_message(file.to_string_lossy().into_owned());
                    }
                }
            }
        })
    };

    let processor = BatchProcessor::new(BatchConverter::new().with_cancel_flag(cancel));
    let report = processor.process_batch(request, tx).await?;
    let _ = ticker.await;

    if report.all_succeeded() {
        ProgressReporter::finish_bar(&pb, "Batch complete");
    } else {
        ProgressReporter::finish_bar_error(&pb, "Batch finished with errors");
    }
    formatter.print_report(&report);

    if report.failed() > 0 {
        anyhow::bail!("{} of {} files failed", report.failed(), report.len());
    }
    if report.cancelled() > 0 {
        anyhow::bail!("Cancelled, {} files not converted", report.cancelled());
    }

    Ok(())
}

fn handle_config(action: ConfigCommands, formatter: &OutputFormatter) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let config = Config::load()?;
            let toml = toml::to_string_pretty(&config)?;
            println!("{}", toml);
        }

        ConfigCommands::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            formatter.success(&format!("Set {} = {}", key, value));
        }

        ConfigCommands::Reset => {
            Config::reset()?;
            formatter.success("Configuration reset to defaults");
        }

        ConfigCommands::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
