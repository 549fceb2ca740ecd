use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, MultiSelect};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use sweeprs::{
    AnalysisOutcome, AnalyzerService, BLUR_THRESHOLD, PhotoUpload, ReviewSession,
    SIMILARITY_THRESHOLD,
};

#[derive(Parser, Debug)]
#[command(name = "sweeprs", version, about = "CLI for sweeping near-duplicate photos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a directory and list duplicate groups
    Scan {
        /// Directory holding the photos
        #[arg(short, long, value_name = "DIR")]
        path: PathBuf,
        /// Maximum Hamming distance for "near duplicate"
        #[arg(long, default_value_t = SIMILARITY_THRESHOLD)]
        threshold: u32,
    },

    /// Review duplicate groups interactively and finalize the selection
    Review {
        /// Directory holding the photos
        #[arg(short, long, value_name = "DIR")]
        path: PathBuf,
        /// Maximum Hamming distance for "near duplicate"
        #[arg(long, default_value_t = SIMILARITY_THRESHOLD)]
        threshold: u32,
    },

    /// Write an HTML gallery of the duplicate groups
    Report {
        /// Directory holding the photos
        #[arg(short, long, value_name = "DIR")]
        path: PathBuf,
        /// Maximum Hamming distance for "near duplicate"
        #[arg(long, default_value_t = SIMILARITY_THRESHOLD)]
        threshold: u32,
        /// Output file (default: `<dir>/sweep-report.html`)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { path, threshold } => scan(&path, threshold),
        Commands::Review { path, threshold } => review(&path, threshold),
        Commands::Report {
            path,
            threshold,
            out,
        } => report(&path, threshold, out),
    }
}

fn scan(path: &Path, threshold: u32) -> Result<()> {
    let mut session = ReviewSession::new();
    let outcome = analyze_directory(path, threshold, &mut session)?;

    let reviewable = outcome.reviewable().count();
    if reviewable == 0 {
        println!("No duplicates found.");
        return Ok(());
    }

    println!("Found {} duplicate group(s):", reviewable);
    print_groups(&outcome, &session);

    let stats = session.stats(&outcome.groups);
    println!(
        "\n💾 Deleting the {} flagged photo(s) would free about {:.2} MB",
        stats.deleted_count,
        stats.deleted_megabytes()
    );
    Ok(())
}

fn review(path: &Path, threshold: u32) -> Result<()> {
    let mut session = ReviewSession::new();
    let outcome = analyze_directory(path, threshold, &mut session)?;

    if outcome.reviewable().next().is_none() {
        println!("No duplicates found.");
        return Ok(());
    }
    print_groups(&outcome, &session);

    // One entry per photo under review, pre-checked when flagged delete.
    let mut names = Vec::new();
    let mut labels = Vec::new();
    let mut defaults = Vec::new();
    for (idx, group) in outcome.reviewable().enumerate() {
        for photo in &group.members {
            labels.push(format!(
                "[group {}] {} ({:.2} MB)",
                idx + 1,
                photo.name,
                photo.megabytes()
            ));
            defaults.push(session.is_deleted(&photo.name));
            names.push(photo.name.clone());
        }
    }

    let checked = MultiSelect::new()
        .with_prompt("Select the photos to delete (space toggles, enter confirms)")
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .context("review selection aborted")?;

    // Turn the final selection into per-name toggle events.
    let chosen: HashSet<usize> = checked.into_iter().collect();
    for (i, name) in names.iter().enumerate() {
        if chosen.contains(&i) != session.is_deleted(name) {
            session.toggle(name);
        }
    }

    let stats = session.stats(&outcome.groups);
    if stats.deleted_count == 0 {
        println!("Nothing flagged for deletion.");
        return Ok(());
    }
    println!(
        "\n💾 {} photo(s) selected, about {:.2} MB to free",
        stats.deleted_count,
        stats.deleted_megabytes()
    );

    let go = Confirm::new()
        .with_prompt("Finalize the review? (reporting only, no file is deleted)")
        .default(false)
        .interact()?;
    if !go {
        println!("Review left open.");
        return Ok(());
    }

    let report = session.finalize(&outcome.groups);
    println!("\n✅ Review finalized at {}", report.timestamp);
    println!("   photos flagged: {}", report.deleted_count);
    println!("   space reclaimable: {:.2} MB", report.deleted_megabytes());
    for name in &report.deleted_names {
        println!("   🗑️  {}", name);
    }
    Ok(())
}

fn report(path: &Path, threshold: u32, out: Option<PathBuf>) -> Result<()> {
    let mut session = ReviewSession::new();
    let outcome = analyze_directory(path, threshold, &mut session)?;

    let out = out.unwrap_or_else(|| path.join("sweep-report.html"));
    let html = render_report(&outcome, &session);
    fs::write(&out, html).with_context(|| format!("Failed to write report {:?}", out))?;

    println!("✅ Wrote report to {}", out.display());
    Ok(())
}

fn analyze_directory(
    path: &Path,
    threshold: u32,
    session: &mut ReviewSession,
) -> Result<AnalysisOutcome> {
    let uploads = collect_uploads(path)?;
    println!("▶ Analyzing {} photo(s)…", uploads.len());

    let analyzer = AnalyzerService::new().with_threshold(threshold);
    let outcome = benchmark("analysis", || analyzer.analyze(uploads, session));

    for (name, err) in &outcome.skipped {
        eprintln!("⚠️  Skipped {}: {}", name, err);
    }
    Ok(outcome)
}

/// Recursively walk `dir`, reading every JPEG/PNG into an upload.
fn collect_uploads(dir: &Path) -> Result<Vec<PhotoUpload>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message("Scanning for images…");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let allowed_exts = ["jpg", "jpeg", "png"];
    let mut uploads = Vec::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if path.is_file() {
            if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
                if allowed_exts.contains(&ext.to_lowercase().as_str()) {
                    let bytes =
                        fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
                    // Path relative to the scan root, so names stay
                    // unique across subdirectories.
                    let name = path
                        .strip_prefix(dir)
                        .unwrap_or(path)
                        .to_string_lossy()
                        .into_owned();
                    uploads.push(PhotoUpload { name, bytes });
                }
            }
        }
        spinner.tick();
    }
    spinner.finish_with_message("Scan complete");
    Ok(uploads)
}

fn print_groups(outcome: &AnalysisOutcome, session: &ReviewSession) {
    for (idx, group) in outcome.reviewable().enumerate() {
        println!("\n📂 Group #{}", idx + 1);
        for photo in &group.members {
            let marker = if session.is_deleted(&photo.name) {
                "🗑️  DELETE"
            } else {
                "✅ KEEP  "
            };
            let blur = if photo.sharpness < BLUR_THRESHOLD {
                "  ⚠ blurry"
            } else {
                ""
            };
            println!(
                "   {} {} ({:.2} MB, sharpness {:.1}){}",
                marker,
                photo.name,
                photo.megabytes(),
                photo.sharpness,
                blur
            );
        }
    }
}

fn render_report(outcome: &AnalysisOutcome, session: &ReviewSession) -> String {
    let mut html = String::from(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <title>Photo sweep report</title>\
         <style>body{font-family:sans-serif;background:#111;color:#eee}\
         .group{margin-bottom:24px}\
         .card{display:inline-block;margin:6px;text-align:center}\
         .card img{max-width:300px;border-radius:10px}\
         .keep img{border:4px solid #4CAF50}\
         .delete img{border:4px solid #FF4B4B;opacity:.6}\
         .caption{font-size:.9rem;font-weight:bold;margin-top:5px}\
         </style></head><body><h1>📸 Photo sweep report</h1>",
    );

    for (idx, group) in outcome.reviewable().enumerate() {
        html.push_str(&format!(
            "<div class=\"group\"><h2>📂 Group #{}</h2>",
            idx + 1
        ));
        for photo in &group.members {
            let deleted = session.is_deleted(&photo.name);
            let class = if deleted { "card delete" } else { "card keep" };
            let status = if deleted { "🗑️ DELETE" } else { "✅ KEEP" };
            html.push_str(&format!(
                "<div class=\"{}\"><img src=\"data:image/jpeg;base64,{}\">\
                 <div class=\"caption\">{}<br>{} ({:.2} MB)</div></div>",
                class,
                BASE64.encode(&photo.preview),
                status,
                photo.name,
                photo.megabytes(),
            ));
        }
        html.push_str("</div>");
    }

    let stats = session.stats(&outcome.groups);
    html.push_str(&format!(
        "<p>💾 Deleting the {} flagged photo(s) frees about {:.2} MB</p></body></html>",
        stats.deleted_count,
        stats.deleted_megabytes()
    ));
    html
}

/// Run `f()`, print how long it took (with `label`), and return its result.
fn benchmark<T, F: FnOnce() -> T>(label: &str, f: F) -> T {
    let start = Instant::now();
    let result = f();
    println!("⏱ {} took {:.2?}", label, start.elapsed());
    result
}
