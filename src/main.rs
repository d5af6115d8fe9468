use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use agrimon_view::config::{AppConfig, DEFAULT_CONFIG_PATH};
use agrimon_view::dev_mode::{ReplayApi, load_forecast_file};
use agrimon_view::logging::{self, DataSource};
use agrimon_view::render::html::render_page;
use agrimon_view::render::text::render_cards_text;
use agrimon_view::render::{ForecastCard, forecast_cards};
use agrimon_view::verify::{print_summary, run_full_verification};
use agrimon_view::view::{NoticeLevel, ViewController};
use agrimon_view::{Coordinates, FieldApi, HttpFieldApi};

#[derive(Parser, Debug)]
#[command(author, version, about = "Field disease-risk forecast viewer", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Serve saved responses from this directory instead of the live API
    #[arg(long)]
    replay: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List saved fields
    Fields {
        /// Print the field selector as HTML options
        #[arg(long)]
        html: bool,
    },
    /// Save a field at a map position
    Save {
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    /// Show where a field is on the map
    Show { name: String },
    /// Fetch and render a field's disease-risk forecast
    Forecast {
        name: String,
        /// Write a standalone HTML page here
        #[arg(long)]
        html: Option<PathBuf>,
        /// Print the grouped cards as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Render a saved forecast response without contacting the API
    Render {
        file: PathBuf,
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Check every field's forecast endpoint
    Verify {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;
    logging::init_logger(
        config.logging.min_level()?,
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );
    logging::debug(
        DataSource::System,
        None,
        &format!("agrimon {} using {}", agrimon_view::VERSION, config.api.base_url),
    );

    match &cli.replay {
        Some(dir) => run(ReplayApi::new(dir), &config, cli.command),
        None => run(HttpFieldApi::new(&config.api)?, &config, cli.command),
    }
}

fn run<A: FieldApi>(api: A, config: &AppConfig, command: Command) -> Result<()> {
    let mut view = ViewController::new(api, &config.map);

    let outcome = match command {
        Command::Fields { html } => view.load_fields().map(|_| {
            if html {
                print!("{}", view.state().field_options);
            } else {
                for field in &view.state().fields {
                    println!("{}\t{:.5}\t{:.5}", field.name, field.location.lat, field.location.lon);
                }
            }
        }),
        Command::Save { name, lat, lon } => {
            view.handle_map_click(Coordinates { lat, lon });
            view.set_field_name(&name);
            view.save_field()
        }
        Command::Show { name } => {
            view.select_field(&name);
            view.show_field_on_map().map(|applied| match applied.current().flatten() {
                Some(at) => println!(
                    "{}: marker at {:.5}, {:.5} (zoom {})",
                    name, at.lat, at.lon, view.state().map.zoom
                ),
                None => println!("{}: not in the field list", name),
            })
        }
        Command::Forecast { name, html, json } => {
            view.select_field(&name);
            match view.get_forecast() {
                Ok(applied) => {
                    let cards = applied.current().unwrap_or_default();
                    emit_forecast(&name, &cards, html.as_deref(), json)?;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        Command::Render { file, html } => {
            let entries = load_forecast_file(&file)
                .with_context(|| format!("cannot render {}", file.display()))?;
            let title = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            emit_forecast(&title, &forecast_cards(&entries), html.as_deref(), false)?;
            return Ok(());
        }
        Command::Verify { json } => {
            let report = run_full_verification(view.api())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&report);
            }
            if report.summary.failed > 0 {
                bail!("{} of {} fields failed verification", report.summary.failed, report.summary.total);
            }
            return Ok(());
        }
    };

    for notice in view.take_notices() {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.message),
            NoticeLevel::Error => eprintln!("{}", notice.message),
        }
    }

    outcome.map_err(Into::into)
}

fn emit_forecast(name: &str, cards: &[ForecastCard], html: Option<&Path>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(cards)?);
    } else if cards.is_empty() {
        println!("No forecast entries for {}", name);
    } else {
        print!("{}", render_cards_text(cards));
    }

    if let Some(path) = html {
        fs::write(path, render_page(name, cards))
            .with_context(|| format!("cannot write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
