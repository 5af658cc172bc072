use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

pub mod reader;

use reader::{is_line_delimited, open_maybe_gz};

use crate::model::contest::Contest;
use crate::model::submission::{JudgedSubmission, Submission};
use crate::model::weights::ScoringProfile;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {}{}: {source}", .path.display(), line_suffix(.line))]
    Json {
        path: PathBuf,
        line: Option<usize>,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid input in {}: {msg}", .path.display())]
    Invalid { path: PathBuf, msg: String },
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|n| format!(" (line {n})")).unwrap_or_default()
}

pub fn load_contest(path: &Path) -> Result<Contest, InputError> {
    let contest: Contest = read_document(path)?;
    contest.validate().map_err(|msg| InputError::Invalid {
        path: path.to_path_buf(),
        msg,
    })?;
    Ok(contest)
}

pub fn load_judged(path: &Path) -> Result<JudgedSubmission, InputError> {
    read_document(path)
}

pub fn load_profile(path: &Path) -> Result<ScoringProfile, InputError> {
    read_document(path)
}

/// Loads a submission history as a JSON array or as JSON lines.
pub fn load_submissions(path: &Path) -> Result<Vec<Submission>, InputError> {
    let submissions: Vec<Submission> = if is_line_delimited(path) {
        read_lines(path)?
    } else {
        read_document(path)?
    };
    tracing::info!(
        path = %path.display(),
        submissions = submissions.len(),
        "loaded submission history"
    );
    Ok(submissions)
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let reader = open_maybe_gz(path)?;
    serde_json::from_reader(reader).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        line: None,
        source,
    })
}

fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();
    let mut out = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader.read_line(&mut buf).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|source| InputError::Json {
            path: path.to_path_buf(),
            line: Some(line_no),
            source,
        })?;
        out.push(record);
    }

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
