//! Text extraction: the [`Extractor`] capability and the converter-process implementation.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::Opts;
use crate::error::ExtractionError;
use crate::utils::config::Defaults;

/// Turns one document into plain text. Called from many workers at once.
pub trait Extractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

impl<F> Extractor for F
where
    F: Fn(&Path) -> Result<String, ExtractionError> + Send + Sync,
{
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        self(path)
    }
}

/// Runs an external converter (default `pdftotext <input> -`) and reads its stdout.
#[derive(Clone, Debug)]
pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
}

impl CommandExtractor {
    /// `args` may contain `{input}`; if none does, the path is appended as the last argument.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_opts(opts: &Opts) -> Self {
        Self::new(opts.converter.clone(), opts.converter_args.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for one invocation with the placeholder substituted.
    ///
    /// The path is spliced in as an `OsStr`, so file names that are not valid UTF-8 reach the
    /// converter unchanged.
    pub fn args_for(&self, path: &Path) -> Vec<OsString> {
        let input = path.as_os_str();
        let mut substituted = false;
        let mut args: Vec<OsString> = self
            .args
            .iter()
            .map(|a| match substitute_input(a, input) {
                Some(arg) => {
                    substituted = true;
                    arg
                }
                None => OsString::from(a),
            })
            .collect();
        if !substituted {
            args.push(input.to_os_string());
        }
        args
    }
}

/// Replace every `{input}` in `arg` with `input`; `None` when the placeholder is absent.
fn substitute_input(arg: &str, input: &OsStr) -> Option<OsString> {
    if !arg.contains(Defaults::INPUT_PLACEHOLDER) {
        return None;
    }
    let mut parts = arg.split(Defaults::INPUT_PLACEHOLDER);
    let mut out = OsString::from(parts.next().unwrap_or_default());
    for part in parts {
        out.push(input);
        out.push(part);
    }
    Some(out)
}

impl Default for CommandExtractor {
    fn default() -> Self {
        Self::new(Defaults::CONVERTER, Defaults::converter_args())
    }
}

impl Extractor for CommandExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let args = self.args_for(path);
        debug!(
            "{} {}",
            self.program,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ExtractionError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(ExtractionError::Converter {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
