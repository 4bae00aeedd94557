//! `.nng` puzzle records: the model as JSON, one file per puzzle.

use crate::nonogram::error::PersistError;
use crate::nonogram::model::PuzzleModel;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// File extension of saved puzzles.
pub const EXTENSION: &str = "nng";

/// The file name a puzzle is saved under: its name lowercased, with anything
/// that is not alphanumeric, `-` or `_` replaced by `_`.
#[must_use]
pub fn file_name(model: &PuzzleModel) -> String {
    let stem: String = model
        .name()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = if stem.is_empty() { "nonogram".to_string() } else { stem };
    format!("{stem}.{EXTENSION}")
}

/// Writes `model` into `dir` and returns the path written.
///
/// An existing file of the same name is replaced.
///
/// # Errors
///
/// If the directory cannot be written.
pub fn save(model: &PuzzleModel, dir: impl AsRef<Path>) -> Result<PathBuf, PersistError> {
    let path = dir.as_ref().join(file_name(model));
    let mut writer = BufWriter::new(fs::File::create(&path)?);
    serde_json::to_writer(&mut writer, model)?;
    writer.flush()?;
    info!(path = %path.display(), puzzle = model.name(), "saved puzzle");
    Ok(path)
}

/// Reads a puzzle saved by [`save`]. The record is validated like any other model.
///
/// # Errors
///
/// If the file cannot be read, is not a puzzle record, or describes an invalid puzzle.
pub fn load(path: impl AsRef<Path>) -> Result<PuzzleModel, PersistError> {
    let file = fs::File::open(path.as_ref())?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "nonogram-sat-{tag}-{}-{}",
            std::process::id(),
            fastrand::u64(..)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_file_name() {
        let model = PuzzleModel::from_runs("My Heart/2", vec![vec![1]], vec![vec![1]]).unwrap();
        assert_eq!(file_name(&model), "my_heart_2.nng");
        let unnamed = model.with_name("");
        assert_eq!(file_name(&unnamed), "nonogram.nng");
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir("roundtrip");
        let model = PuzzleModel::from_runs(
            "Boat",
            vec![vec![1], vec![3], vec![0]],
            vec![vec![1], vec![2], vec![1]],
        )
        .unwrap();
        let path = save(&model, &dir).unwrap();
        assert_eq!(path, dir.join("boat.nng"));
        assert_eq!(load(&path).unwrap(), model);

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"row\":[[1],[3],[]]"));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_rejects_invalid_record() {
        let dir = scratch_dir("invalid");
        let path = dir.join("bad.nng");
        fs::write(&path, r#"{"width":0,"height":1,"name":"b","row":[[]],"col":[]}"#).unwrap();
        assert!(matches!(load(&path), Err(PersistError::Json(_))));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(load(&path), Err(PersistError::Json(_))));

        assert!(matches!(load(dir.join("missing.nng")), Err(PersistError::Io(_))));
        fs::remove_dir_all(dir).unwrap();
    }
}
