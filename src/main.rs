use std::io::{self, Read, Write};
use std::path::Path;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cdnrewrite::application::{ImageSource, RewritePipeline, SrcsetSource};
use cdnrewrite::domain::{ContextKind, RewriteContext};
use cdnrewrite::infrastructure::{AppConfig, CliArgs, LoadedConfig, StorageManager};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<LoadedConfig> {
    let storage = match &args.config {
        Some(path) => StorageManager::with_dir(
            path.parent().map(Path::to_path_buf).unwrap_or_default(),
        ),
        None => StorageManager::new()?,
    };

    let mut loaded = storage
        .load_config(args.config.as_deref())
        .wrap_err("failed to load configuration")?;
    loaded.config.merge_with_args(args);

    Ok(loaded)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn run(pipeline: &RewritePipeline, args: &CliArgs, input: &str) -> Result<String> {
    let request = args.request();

    match args.context {
        RewriteContext::ImageSrcset => {
            let sources: Vec<SrcsetSource> =
                serde_json::from_str(input).wrap_err("srcset input must be a JSON array")?;
            let sources = pipeline.rewrite_srcset(sources, &request);
            Ok(serde_json::to_string_pretty(&sources)? + "\n")
        }
        RewriteContext::AttachmentImageSrc => {
            let image: Option<ImageSource> = serde_json::from_str(input)
                .wrap_err("attachment image input must be a JSON object or null")?;
            let image = pipeline.rewrite_attachment_image(image, &request);
            Ok(serde_json::to_string_pretty(&image)? + "\n")
        }
        context if context.kind() == ContextKind::Document => {
            Ok(pipeline.rewrite(context, input, &request))
        }
        context => {
            let mut output = String::with_capacity(input.len());
            for line in input.lines() {
                output.push_str(&pipeline.rewrite(context, line, &request));
                output.push('\n');
            }
            Ok(output)
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let LoadedConfig { config, fallback } = load_config(&args)?;

    init_logging(&config)?;

    if let Some(error) = fallback {
        warn!(error = %error, "Failed to parse config file, using defaults");
    }

    debug!(
        version = cdnrewrite::VERSION,
        config = ?args.config,
        context = %args.context,
        "Starting cdnrewrite"
    );

    let pipeline = RewritePipeline::new(&config.site, &config.cdn)
        .wrap_err("invalid CDN configuration")?;

    let input = read_input(args.input.as_deref())?;
    let output = run(&pipeline, &args, &input)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
