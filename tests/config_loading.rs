use std::fs;

use log::LevelFilter;
use namelink::config::LinkerConfig;
use namelink::Error;
use tempfile::TempDir;

#[test]
fn ini_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let references = dir.path().join("refs.csv");
    let concepts = dir.path().join("concepts.tsv");
    fs::write(&references, "Name\nJean Dupont\n").unwrap();
    fs::write(&concepts, "concept\tlabel\tnames\nJean_Dupont\tJean Dupont\t\n").unwrap();

    let ini = format!(
        "[file]\nreference_file = {}\nconcept_file = {}\noutput_dir = {}\n\
         [matcher]\nthresholds = 0.9, 0.8\nneighbors_per_name = 2\n\
         [processor]\nlog_level = warn\nmystery = 1\n",
        references.display(),
        concepts.display(),
        dir.path().join("out").display(),
    );
    let ini_path = dir.path().join("linker.ini");
    fs::write(&ini_path, ini).unwrap();

    let config = LinkerConfig::from_ini(&ini_path).unwrap();
    assert_eq!(config.matcher.thresholds, vec![0.9, 0.8]);
    assert_eq!(config.matcher.neighbors_per_name, 2);
    assert_eq!(config.processor.level_filter(), LevelFilter::Warn);

    config.validate().unwrap();
    assert!(dir.path().join("out").is_dir());
    assert_eq!(config.files.output_path(), dir.path().join("out").join("matching_athletes.tsv"));
}

#[test]
fn missing_input_files_fail_validation() {
    let dir = TempDir::new().unwrap();
    let mut config = LinkerConfig::default();
    config.files.reference_file = dir.path().join("absent.csv");
    config.files.concept_file = dir.path().join("absent.tsv");

    assert!(matches!(config.validate(), Err(Error::Config(_))));
    assert!(config.validate_settings().is_ok());
}

#[test]
fn missing_ini_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let result = LinkerConfig::from_ini(dir.path().join("nope.ini"));
    assert!(matches!(result, Err(Error::Io(_))));
}
