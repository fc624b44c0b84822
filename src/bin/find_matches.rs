use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, LevelFilter};

use namelink::{
    Error,
    LinkerConfig,
    catalog::{ConceptCatalog, ReferenceCatalog},
    matcher::Normalizer,
    parser::{NameExpander, NameParser},
    report::{write_report_file, ReportEmitter, RunSummary},
    source::{collect_concept_rows, read_references, TabularConceptSource},
};

/// Match person-name references against knowledge-base concepts.
#[derive(Parser, Debug)]
#[command(name = "find_matches", version, about)]
struct Cli {
    /// Reference table (comma-delimited, with a `Name` column)
    #[arg(short = 'r', long = "references", alias = "ref")]
    references: Option<PathBuf>,

    /// Concept table (tab-delimited, with `concept`, `label` and `names` columns)
    #[arg(short = 'w', long = "concepts", alias = "wiki")]
    concepts: Option<PathBuf>,

    /// Directory for the report and run summary
    #[arg(short = 'o', long = "output-dir", alias = "output")]
    output_dir: Option<PathBuf>,

    /// INI configuration; defaults are used when omitted and default.ini is absent
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

fn load_config(cli: &Cli) -> namelink::Result<LinkerConfig> {
    let mut config = match &cli.config {
        Some(path) => LinkerConfig::from_ini(path)?,
        None if Path::new("default.ini").is_file() => LinkerConfig::from_ini("default.ini")?,
        None => LinkerConfig::default(),
    };

    if let Some(path) = &cli.references {
        config.files.reference_file = path.clone();
    }
    if let Some(path) = &cli.concepts {
        config.files.concept_file = path.clone();
    }
    if let Some(path) = &cli.output_dir {
        config.files.output_dir = path.clone();
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(level: LevelFilter) -> std::io::Result<()> {
    let timestamp = Local::now().format("%m_%d_%H_%M");
    fs::create_dir_all("logs")?;
    let log_file = File::create(format!("logs/find_matches_{}.log", timestamp))?;

    Builder::new()
        .filter(None, level)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

fn run(config: &LinkerConfig) -> namelink::Result<()> {
    let start_time = Instant::now();
    let parser = NameParser::new(&config.text_processing);

    let (names, reference_stats) = read_references(&config.files.reference_file)?;
    let (source, concept_stats) = TabularConceptSource::from_path(&config.files.concept_file)?;
    if reference_stats.skipped > 0 || concept_stats.skipped > 0 {
        warn!(
            "Skipped {} reference rows and {} concept rows",
            reference_stats.skipped, concept_stats.skipped
        );
    }

    let references = ReferenceCatalog::build(&parser, &names);
    let mut concepts = ConceptCatalog::build(
        &parser,
        collect_concept_rows(&source),
        &config.text_processing,
    );
    if config.matcher.use_name_expansion {
        let expander = NameExpander::new(&parser, config.text_processing.max_expansion_words);
        concepts.build_synonym_index(&expander);
    }

    let mut normalizer = Normalizer::new(
        &references,
        &concepts,
        &config.matcher,
        &config.text_processing,
        &config.processor,
    );
    normalizer.run_exact_phase();

    let thresholds = normalizer.thresholds().to_vec();
    let progress = ProgressBar::new(thresholds.len() as u64);
    progress.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} Fuzzy passes: [{bar:40.cyan/blue}] {pos}/{len} | Elapsed: {elapsed_precise}\n{msg}")
        .map_err(|e| Error::config(format!("Invalid progress template: {}", e)))?
        .progress_chars("█▉▊▋▌▍▎▏  "));

    for threshold in thresholds {
        progress.set_message(format!("Matching at similarity >= {:.2}", threshold));
        let pass = normalizer.run_fuzzy_pass(threshold);
        if pass.ran {
            progress.println(format!(
                "threshold {:.2}: {} new matches, {} references still unmatched",
                threshold, pass.edges_added, normalizer.stats().references_unmatched
            ));
        }
        progress.inc(1);
    }
    progress.finish_with_message("Fuzzy passes complete");

    let (relation, stats) = normalizer.finish();
    let rows = ReportEmitter::new(&references, &concepts).emit(&relation);
    write_report_file(config.files.output_path(), &rows)?;
    RunSummary::new(config, &stats, rows.len()).write(config.files.summary_path())?;

    let elapsed = format_duration(start_time.elapsed());
    info!(
        "Matched {}/{} references to {}/{} concepts in {}",
        stats.references_matched, stats.references_total,
        stats.concepts_matched, stats.concepts_total,
        elapsed
    );
    println!(
        "Matched {}/{} references ({} exact edges, {} fuzzy edges) in {}. Report: {}",
        stats.references_matched,
        stats.references_total,
        stats.exact_edges + stats.alias_edges + stats.synonym_edges,
        stats.fuzzy_edges(),
        elapsed,
        config.files.output_path().display()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Use --help to see available options.");
            return Err(e.into());
        }
    };

    let log_level = config.processor.level_filter();
    init_logging(log_level)?;
    if log_level != LevelFilter::Off {
        info!("Starting match finding with log level: {:?}", log_level);
    }
    info!("Text processing: {}", config.text_processing.describe());

    match config.processor.build_thread_pool()? {
        Some(pool) => {
            info!("Using a dedicated pool of {} threads", pool.current_num_threads());
            pool.install(|| run(&config))?;
        }
        None => run(&config)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_long_flags_are_accepted() {
        let cli = Cli::try_parse_from([
            "find_matches", "--ref", "refs.csv", "--wiki", "concepts.tsv", "--output", "out",
        ]).unwrap();
        assert_eq!(cli.references, Some(PathBuf::from("refs.csv")));
        assert_eq!(cli.concepts, Some(PathBuf::from("concepts.tsv")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));

        let cli = Cli::try_parse_from(["find_matches", "-r", "a.csv", "--concepts", "b.tsv"]).unwrap();
        assert_eq!(cli.references, Some(PathBuf::from("a.csv")));
        assert_eq!(cli.concepts, Some(PathBuf::from("b.tsv")));
        assert!(cli.output_dir.is_none());
    }
}
