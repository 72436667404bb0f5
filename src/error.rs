//! Failures the relay pipeline can run into.
//!
//! None of these ever turn into an error page. The relay logs them and,
//! for the ones that leave the output field empty, shows a one-line
//! [`diagnostic`](RelayError::diagnostic) in its place.

use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    /// The request body was not a readable form (too large, bad encoding).
    #[error("submission could not be read: {0}")]
    Unreadable(String),

    /// The scratch file could not be allocated in the scratch directory.
    #[error("scratch file could not be created: {0}")]
    ScratchCreate(#[source] io::Error),

    /// The scratch file exists but the submission could not be written to it.
    #[error("scratch file could not be written: {0}")]
    ScratchWrite(#[source] io::Error),

    /// The analyzer process could not be spawned (missing binary, permissions).
    #[error("analyzer could not be started: {0}")]
    Spawn(#[source] io::Error),

    /// The analyzer ran but exited unsuccessfully. `None` means killed by a signal.
    #[error("analyzer exited with code {}", .0.map_or_else(|| "-1".to_string(), |c| c.to_string()))]
    NonZeroExit(Option<i32>),

    /// Waiting on the analyzer or collecting its output failed.
    #[error("analyzer output could not be read: {0}")]
    OutputRead(#[source] io::Error),

    /// The analyzer did not finish within the configured bound and was killed.
    #[error("analyzer timed out after {0:?}")]
    Timeout(Duration),
}

impl RelayError {
    /// The line shown to the user in the output field, if this failure is surfaced.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            RelayError::Unreadable(_) => Some("submission could not be read".to_string()),
            RelayError::ScratchCreate(_) | RelayError::ScratchWrite(_) => {
                Some("submission could not be staged for analysis".to_string())
            }
            RelayError::Spawn(_) => Some("analyzer could not be started".to_string()),
            RelayError::OutputRead(_) => Some("analyzer output could not be read".to_string()),
            RelayError::Timeout(limit) => Some(format!(
                "analyzer timed out after {}s",
                limit.as_secs_f64()
            )),
            RelayError::NonZeroExit(_) => None,
        }
    }
}
