//! The exercise catalog: a directory of paired `<name>.json` / `<name>.txt` files, where the JSON
//! half is an `ExerciseSpec` and the text half is a human-readable description.
//!

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::time::Duration;

use sandbox::MemorySize;

use judge::types::{ExerciseSpec, TestCase};
use judge::Comparator;

use crate::config::AppConfig;
use crate::{Error, ErrorKind, Result, ResultExt};

const SPEC_EXTENSION: &str = "json";
const DESCRIPTION_EXTENSION: &str = "txt";

/// On-disk shape of an `ExerciseSpec`, matching the catalog input contract. `judge`, `time_limit`
/// and `memory_limit` fall back to the application configuration's defaults when the exercise
/// specification omits them; `exercise` and `testcases` are always required.
#[derive(serde::Deserialize)]
struct ExerciseSpecFile {
    exercise: String,
    judge: Option<String>,
    time_limit: Option<f64>,
    memory_limit: Option<u64>,
    testcases: Vec<(Vec<String>, Vec<String>)>,
}

/// List the exercise names present in `dir`: filename stems that have both a `.json` and a `.txt`
/// file, sorted lexicographically. A stem missing either half is silently skipped.
pub fn list_exercises(dir: &Path) -> Result<Vec<String>> {
    let mut json_stems = BTreeSet::new();
    let mut txt_stems = BTreeSet::new();

    let entries = fs::read_dir(dir)
        .chain_err(|| format!("failed to read catalog directory \"{}\"", dir.display()))?;

    for entry in entries {
        let entry = entry.chain_err(|| "failed to read catalog directory entry")?;
        let path = entry.path();
        let stem = match path.file_stem().and_then(OsStr::to_str) {
            Some(stem) => stem.to_owned(),
            None => continue,
        };

        match path.extension().and_then(OsStr::to_str) {
            Some(SPEC_EXTENSION) => {
                json_stems.insert(stem);
            }
            Some(DESCRIPTION_EXTENSION) => {
                txt_stems.insert(stem);
            }
            _ => (),
        }
    }

    Ok(json_stems.intersection(&txt_stems).cloned().collect())
}

/// Load the exercise specification named `name` from `dir`, filling in any field it omits
/// (comparator, time limit, memory limit) from `config`'s defaults.
pub fn load_exercise(dir: &Path, name: &str, config: &AppConfig) -> Result<ExerciseSpec> {
    let path = spec_path(dir, name);
    let contents = fs::read_to_string(&path)
        .chain_err(|| format!("failed to read exercise specification \"{}\"", path.display()))?;

    let raw: ExerciseSpecFile = serde_json::from_str(&contents).map_err(|e| {
        Error::from(ErrorKind::ConfigurationError(format!(
            "malformed exercise specification \"{}\": {}",
            path.display(),
            e
        )))
    })?;

    let judge_name = raw.judge.as_deref().unwrap_or(&config.default_comparator);
    let comparator = Comparator::parse(judge_name)
        .map_err(|e| Error::from(ErrorKind::ConfigurationError(e.to_string())))?;

    let time_limit = raw.time_limit.unwrap_or(config.default_time_limit_secs);
    let memory_limit = raw.memory_limit.unwrap_or(config.default_memory_limit_mb);

    let testcases = raw
        .testcases
        .into_iter()
        .map(|(input, expected)| TestCase::new(input, expected))
        .collect();

    Ok(ExerciseSpec {
        name: raw.exercise,
        comparator,
        time_limit: Duration::from_secs_f64(time_limit),
        memory_limit: MemorySize::MegaBytes(memory_limit as usize),
        testcases,
    })
}

/// Read the description of the exercise named `name` from `dir`, verbatim.
pub fn describe_exercise(dir: &Path, name: &str) -> Result<String> {
    let path = description_path(dir, name);
    fs::read_to_string(&path)
        .chain_err(|| format!("failed to read exercise description \"{}\"", path.display()))
        .map_err(Into::into)
}

fn spec_path(dir: &Path, name: &str) -> std::path::PathBuf {
    dir.join(name).with_extension(SPEC_EXTENSION)
}

fn description_path(dir: &Path, name: &str) -> std::path::PathBuf {
    dir.join(name).with_extension(DESCRIPTION_EXTENSION)
}
