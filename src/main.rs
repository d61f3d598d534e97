use statusprobe::cli::Cli;
use statusprobe::config::Config;
use statusprobe::core::health::{CheckOptions, StatusRenderer};
use statusprobe::core::{get_debug_logger, HealthCheckOrchestrator, StatusBoard};
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();

    // Handle configuration commands
    if cli.init {
        let (path, created) = Config::init()?;
        if created {
            println!("Created config at {}", path.display());
        } else {
            println!("Config already exists at {}, left unchanged", path.display());
        }
        return Ok(());
    }

    let config = Config::load()?;

    if cli.print {
        config.print()?;
        return Ok(());
    }

    if cli.check {
        config.check()?;
        println!("✓ Configuration valid");
        return Ok(());
    }

    let mut targets = config.resolve_targets()?;

    if cli.list {
        for target in &targets {
            println!("{:<16} {}", target.id, target.name);
        }
        return Ok(());
    }

    if !cli.targets.is_empty() {
        if let Some(missing) = cli
            .targets
            .iter()
            .find(|id| !targets.iter().any(|t| &t.id == *id))
        {
            return Err(format!("Unknown target '{}'", missing).into());
        }
        targets.retain(|t| cli.targets.contains(&t.id));
    }

    let options = if cli.quick {
        CheckOptions {
            excerpt_chars: config.trace_excerpt_chars,
            ..CheckOptions::quick()
        }
    } else {
        config.options()
    };

    let logger = Arc::new(get_debug_logger());
    let orchestrator = HealthCheckOrchestrator::with_network(&options)?.with_logger(logger.clone());
    let board = StatusBoard::new(targets).with_logger(logger);
    board.mount(&orchestrator).await;

    let results: Vec<_> = board
        .views()
        .iter()
        .filter_map(|view| view.snapshot().result.map(|result| (view, result)))
        .collect();

    if cli.json {
        let payload: Vec<_> = results.iter().map(|(_, result)| result).collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let renderer = StatusRenderer::new();
    for (view, result) in &results {
        println!("{}", renderer.render_line(view.target(), result, cli.trace));
    }

    Ok(())
}
