// Copyright 2026 Octave Online LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io;
use std::path::PathBuf;

/// Reasons a process could not be moved into a control group.
#[derive(thiserror::Error, Debug)]
pub enum AssignError {
	#[error("membership file path {path} is longer than {limit} bytes")]
	PathTooLong { path: PathBuf, limit: usize },
	#[error("no membership file under {cgroup}")]
	PathNotFound { cgroup: PathBuf },
	#[error("failed to open {path}: {err}")]
	OpenFailed { err: io::Error, path: PathBuf },
	#[error("failed to write {data:?} to {path}: {err}")]
	WriteFailed {
		err: io::Error,
		path: PathBuf,
		data: String,
	},
	#[error("short write to {path}: {written} of {expected} bytes")]
	ShortWrite {
		path: PathBuf,
		written: usize,
		expected: usize,
	},
}

impl AssignError {
	/// The underlying I/O error, for the variants that carry one.
	pub fn io_error(&self) -> Option<&io::Error> {
		match self {
			AssignError::OpenFailed { err, .. } => Some(err),
			AssignError::WriteFailed { err, .. } => Some(err),
			_ => None,
		}
	}
}

#[derive(thiserror::Error, Debug)]
pub enum ProcCgroupError {
	#[error("failed to read {path}: {err}")]
	Read { err: io::Error, path: PathBuf },
	#[error("no unified hierarchy entry in cgroup file. Are you using cgroups v1?\n\n{contents}")]
	NotUnified { contents: String },
}
