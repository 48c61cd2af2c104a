// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::fs::write;
use std::path::Path;

use flashygen_core::PipelineConfig;
use flashygen_core::error::ErrorReport;
use flashygen_core::error::Fallible;
use log::debug;
use serde::de::DeserializeOwned;

/// Read a file, naming it in the error.
pub fn read_file(path: &str) -> Fallible<String> {
    read_to_string(path).map_err(|e| ErrorReport::new(format!("Failed to read {path}: {e}")))
}

pub fn read_json<T: DeserializeOwned>(path: &str) -> Fallible<T> {
    let text = read_file(path)?;
    serde_json::from_str(&text)
        .map_err(|e| ErrorReport::new(format!("Failed to parse {path} as JSON: {e}")))
}

/// Load the pipeline configuration, or the defaults if no path is given.
pub fn load_config(path: Option<&str>) -> Fallible<PipelineConfig> {
    match path {
        Some(path) => {
            debug!("Loading configuration from {path}");
            PipelineConfig::from_toml(&read_file(path)?)
        }
        None => Ok(PipelineConfig::default()),
    }
}

/// Write `text` to `output`, or print it to stdout if there is no output path.
pub fn write_output(output: Option<&str>, text: &str) -> Fallible<()> {
    match output {
        Some(path) => {
            write(path, text)?;
            debug!("Wrote {} bytes to {path}", text.len());
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// The file name of `path` without its extension.
pub fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
