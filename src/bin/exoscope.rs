//! Exoscope command line
//!
//! Talks to the exoplanet backend and drives the orbit scene model from a
//! terminal. Every dashboard action has a subcommand; `frame` and `watch`
//! render the system visualizer as text.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};

use exoscope::api::types::DataRow;
use exoscope::api::{method_config, ApiClient, Backend, ConfusionMatrix, METHODS};
use exoscope::dashboard::{DatasetsPage, ModelsPage, RetrainPage};
use exoscope::scene::{Resolution, SessionState};
use exoscope::{Config, Frame, OrbitClock, PlaybackRate, VisualizationSession};

/// Rows shown from a dataset preview
const PREVIEW_ROWS: usize = 10;
/// Widest a preview column may grow
const MAX_COLUMN_WIDTH: usize = 14;
const FALLBACK_TERMINAL_WIDTH: usize = 100;

#[derive(Parser, Debug)]
#[command(name = "exoscope")]
#[command(about = "Exoplanet dashboard client and orbit visualizer", version)]
struct Args {
    /// Backend origin, overrides EXOSCOPE_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds, overrides EXOSCOPE_TIMEOUT_SECS
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether the backend answers
    Ping,
    /// List uploaded datasets
    Csvs,
    /// List trained models by method
    Models,
    /// Upload a CSV dataset
    Upload { path: PathBuf },
    /// Preprocess datasets into train/test splits
    Process {
        #[arg(required = true)]
        files: Vec<String>,
        /// Preprocessing option passed to the backend
        #[arg(long, default_value = exoscope::api::DEFAULT_PROCESS_OPTION)]
        option: String,
    },
    /// Preprocess datasets, then train a model on them
    Retrain {
        /// Training method, e.g. randomforest or adaboost
        #[arg(long, default_value = "randomforest")]
        method: String,
        #[arg(required = true)]
        files: Vec<String>,
        #[arg(long)]
        n_estimators: Option<u32>,
        #[arg(long)]
        max_depth: Option<u32>,
        #[arg(long)]
        learning_rate: Option<f64>,
    },
    /// Evaluate a trained model on datasets
    Infer {
        #[arg(long)]
        method: String,
        #[arg(long)]
        model: String,
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// List host stars known to the backend
    Hosts,
    /// Show the planets of one host star
    System { hostname: String },
    /// Summarize the light curve of a threshold-crossing event
    Lightcurve { star: String, tce: String },
    /// Compose a single visualizer frame
    Frame {
        hostname: String,
        /// Scene time in seconds
        #[arg(long, default_value_t = 0.0)]
        time: f64,
        /// Playback rate in days per second
        #[arg(long, default_value_t = 1.0)]
        rate: f64,
        /// Print the frame as JSON
        #[arg(long)]
        json: bool,
    },
    /// Animate a system in the terminal while its planets load
    Watch {
        hostname: String,
        #[arg(long, default_value_t = 1.0)]
        rate: f64,
        #[arg(long, default_value_t = 50)]
        frames: usize,
        #[arg(long, default_value_t = 10.0)]
        fps: f64,
    },
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(url) = &args.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

fn terminal_width() -> usize {
    term_size::dimensions()
        .map(|(w, _)| w)
        .unwrap_or(FALLBACK_TERMINAL_WIDTH)
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
        clipped.push('~');
        clipped
    }
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Print the first rows of a dataset preview, dropping columns that do not fit
fn print_preview(title: &str, rows: &[DataRow]) {
    let Some(first) = rows.first() else {
        return;
    };

    let width = terminal_width();
    let mut columns = Vec::new();
    let mut used = 0;
    for key in first.keys() {
        let col_width = rows
            .iter()
            .take(PREVIEW_ROWS)
            .map(|r| r.get(key).map(cell_text).unwrap_or_default().chars().count())
            .chain(std::iter::once(key.chars().count()))
            .max()
            .unwrap_or(0)
            .min(MAX_COLUMN_WIDTH);
        if used + col_width + 1 > width {
            break;
        }
        used += col_width + 1;
        columns.push((key, col_width));
    }

    println!("{} ({} of {} columns):", title, columns.len(), first.len());
    let header: Vec<String> = columns
        .iter()
        .map(|(key, w)| format!("{:<w$}", clip(key, *w), w = *w))
        .collect();
    println!("{}", header.join(" "));

    for row in rows.iter().take(PREVIEW_ROWS) {
        let line: Vec<String> = columns
            .iter()
            .map(|(key, w)| {
                let text = row.get(*key).map(cell_text).unwrap_or_default();
                format!("{:<w$}", clip(&text, *w), w = *w)
            })
            .collect();
        println!("{}", line.join(" "));
    }
    if rows.len() > PREVIEW_ROWS {
        println!("... {} more rows", rows.len() - PREVIEW_ROWS);
    }
}

fn print_matrix(matrix: &ConfusionMatrix) {
    println!("Confusion matrix (rows = actual, columns = predicted):");
    let header: Vec<String> = matrix.labels.iter().map(|l| format!("{:>8}", l)).collect();
    println!("{:>8} {}", "", header.join(" "));
    for (label, row) in matrix.labels.iter().zip(&matrix.cells) {
        let cells: Vec<String> = row.iter().map(|c| format!("{:>8}", c)).collect();
        println!("{:>8} {}", label, cells.join(" "));
    }
    if let Some(accuracy) = matrix.accuracy() {
        println!("Diagonal accuracy: {:.4}", accuracy);
    }
}

fn score(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
}

fn print_frame(frame: &Frame<'_>) {
    println!(
        "t={:.2}s  rate={}  star={} (spin {:.2} rad)",
        frame.elapsed, frame.rate, frame.star.label, frame.star.spin
    );
    for planet in &frame.planets {
        println!(
            "  {:<16} angle {:>8.3} rad  at ({:>6.2}, {:>6.2}, {:>6.2})  {}",
            planet.label,
            planet.angle,
            planet.position.x,
            planet.position.y,
            planet.position.z,
            planet.color
        );
    }
    debug!(
        "{} orbit rings, {} trails",
        frame.orbits.len(),
        frame.trails.len()
    );
}

fn state_text(session: &VisualizationSession) -> String {
    match session.state() {
        SessionState::Loading => "loading".to_string(),
        SessionState::Ready { .. } => session.summary(),
        SessionState::Fallback { .. } => format!("offline, {}", session.summary()),
    }
}

fn banner(error: Option<&str>) -> Result<()> {
    match error {
        Some(message) => Err(anyhow!(message.to_string())),
        None => Ok(()),
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let client = ApiClient::new(&config).context("failed to build HTTP client")?;
    info!("Using backend at {}", config.api_base());

    match args.command {
        Command::Ping => {
            let status = client.test_connection();
            println!("{} {} ({})", status.status, status.url, status.timestamp.to_rfc3339());
        }

        Command::Csvs => {
            let mut page = DatasetsPage::new();
            page.refresh(&client);
            banner(page.error())?;
            for name in page.csvs() {
                println!("{}", name);
            }
        }

        Command::Models => {
            let mut page = ModelsPage::new();
            page.refresh(&client);
            banner(page.error())?;
            for (method, models) in page.models() {
                let label = method_config(method).map_or(method.as_str(), |m| m.label);
                println!("{} ({} models)", label, models.len());
                for model in models {
                    println!("  {}", model);
                }
            }
        }

        Command::Upload { path } => {
            let mut page = DatasetsPage::new();
            page.upload(&client, &path);
            banner(page.error())?;
            if let Some(upload) = page.last_upload() {
                println!("{}: {}", upload.message, upload.filepath);
                print_preview("Preview", &upload.data_head);
            }
        }

        Command::Process { files, option } => {
            let response = client.process_csv(&files, &option)?;
            println!("{}", response.message);
            let data = &response.data;
            for (name, stats) in [("train", &data.train_stats), ("test", &data.test_stats)] {
                if let Some(stats) = stats {
                    println!(
                        "{}: {} samples, {} features",
                        name,
                        stats.num_samples.unwrap_or(0),
                        stats.num_features.unwrap_or(0)
                    );
                }
            }
            print_preview("Train head", &data.train_head);
        }

        Command::Retrain {
            method,
            files,
            n_estimators,
            max_depth,
            learning_rate,
        } => {
            let mut page = RetrainPage::new();
            if !page.select_method(&method) {
                let names: Vec<&str> = METHODS.iter().map(|m| m.name).collect();
                return Err(anyhow!(
                    "unknown method '{}'. Use one of: {}",
                    method,
                    names.join(", ")
                ));
            }
            if n_estimators.is_some() {
                page.set_n_estimators(n_estimators);
            }
            if max_depth.is_some() {
                page.set_max_depth(max_depth);
            }
            if learning_rate.is_some() {
                page.set_learning_rate(learning_rate);
            }
            for file in &files {
                page.toggle_csv(file);
            }

            page.process(&client);
            banner(page.error())?;
            page.retrain(&client);
            banner(page.error())?;

            if let Some(response) = page.result() {
                println!("{}", response.message);
                for (name, result) in &response.results {
                    println!("{}: accuracy {:.4}", name, result.accuracy);
                    if let Some(matrix) = result.confusion_matrix() {
                        print_matrix(&matrix);
                    }
                }
            }
        }

        Command::Infer { method, model, files } => {
            let mut page = ModelsPage::new();
            page.open_inference(&method, &model);
            for file in &files {
                page.toggle_csv(file);
            }
            page.run_inference(&client);
            banner(page.error())?;

            for (label, value) in page.metrics() {
                println!("{:<22} {:.4}", label, value);
            }
            let report = page.dialog().and_then(|d| d.report.as_ref());
            if let Some(matrix) = report.and_then(|r| r.confusion_matrix()) {
                print_matrix(&matrix);
            }
            if let Some(classes) = report.and_then(|r| r.classification_report()) {
                for (class, metrics) in &classes.classes {
                    println!(
                        "class {:<12} precision {} recall {} f1 {}",
                        class,
                        score(metrics.precision),
                        score(metrics.recall),
                        score(metrics.f1_score)
                    );
                }
            }
        }

        Command::Hosts => {
            let hosts = client.hostnames()?;
            println!("{} host stars", hosts.len());
            for host in hosts {
                println!("{}", host);
            }
        }

        Command::System { hostname } => {
            let system = client.find_by_hostname(&hostname)?;
            let kepid = system.kepid.map_or_else(|| "-".to_string(), |id| id.to_string());
            println!("{} (kepid {}): {} rows", system.hostname, kepid, system.total_rows);
            print_preview("Planets", &system.data);
        }

        Command::Lightcurve { star, tce } => {
            let curve = client.lightcurve(&star, &tce)?;
            if !curve.is_consistent() {
                println!(
                    "warning: {} time stamps but {} flux values",
                    curve.time.len(),
                    curve.flux.len()
                );
            }
            println!("{} points", curve.points().count());
            if let Some((lo, hi)) = curve.flux_range() {
                println!("flux range: {:.6} .. {:.6}", lo, hi);
            }
        }

        Command::Frame {
            hostname,
            time,
            rate,
            json,
        } => {
            let mut session = VisualizationSession::new(hostname);
            session.set_rate(PlaybackRate::new(rate));
            session.load(&client);

            let frame = session.frame(time);
            if json {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            } else {
                println!("{}: {}", session.system_name(), state_text(&session));
                print_frame(&frame);
            }
        }

        Command::Watch {
            hostname,
            rate,
            frames,
            fps,
        } => {
            let interval = frame_interval(fps)?;
            watch(client, hostname, PlaybackRate::new(rate), frames, interval)?;
        }
    }

    Ok(())
}

/// Pause between rendered frames at `fps` frames per second
fn frame_interval(fps: f64) -> Result<Duration> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(anyhow!("--fps must be positive, got {}", fps));
    }
    Duration::try_from_secs_f64(1.0 / fps).map_err(|_| anyhow!("--fps {} is too slow", fps))
}

/// Render frames while the body list loads on a worker thread
fn watch(
    client: ApiClient,
    hostname: String,
    rate: PlaybackRate,
    frames: usize,
    interval: Duration,
) -> Result<()> {
    let mut session = VisualizationSession::new(hostname.clone());
    session.set_rate(rate);

    let ticket = session.begin_fetch();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let response = client.find_by_hostname(&hostname);
        // The receiver may already be gone if watching ended first
        let _ = tx.send((ticket, response));
    });

    let clock = OrbitClock::start();

    for _ in 0..frames {
        if let Ok((ticket, response)) = rx.try_recv() {
            if session.resolve(ticket, response) == Resolution::Stale {
                debug!("Ignored stale body list #{}", ticket.sequence());
            }
        }

        println!("{}: {}", session.system_name(), state_text(&session));
        print_frame(&session.frame(clock.elapsed_secs()));
        thread::sleep(interval);
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    run(Args::parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval(10.0).unwrap(), Duration::from_millis(100));
        assert!(frame_interval(0.0).is_err());
        assert!(frame_interval(f64::NAN).is_err());
        assert!(frame_interval(1e-300).is_err());
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("koi_period", 14), "koi_period");
        assert_eq!(clip("koi_disposition", 8), "koi_dis~");
    }
}
