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

use crate::cgroup::CGroup;
use crate::error::AssignError;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Capacity of a membership file path in bytes, counting the terminating NUL the kernel expects.
pub const PATH_LIMIT: usize = 1024;

/// Which membership files are tried, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
	/// Only `<cgroup>/uid_0/cgroup.procs`. A missing file is a failure.
	#[default]
	FirstCandidateOnly,
	/// `<cgroup>/uid_0/cgroup.procs`, then `<cgroup>/cgroup.procs`.
	MembershipFile,
}

/// Moves processes into a control group by writing their PID to its membership file.
///
/// The membership file is probed for existence before it is opened. Nothing guards
/// the window between the probe and the open; a file removed in between surfaces as
/// [`AssignError::OpenFailed`] since the open never creates files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Assigner {
	policy: FallbackPolicy,
}

impl Assigner {
	pub fn new(policy: FallbackPolicy) -> Self {
		Self { policy }
	}

	pub fn policy(&self) -> FallbackPolicy {
		self.policy
	}

	/// Writes `"<pid>\n"` to the membership file of `cgroup` and returns the file written.
	pub fn assign(&self, cgroup: impl AsRef<Path>, pid: u32) -> Result<PathBuf, AssignError> {
		let cgroup = CGroup::from_path(cgroup);
		let data = format!("{pid}\n");
		let path = self.locate(&cgroup)?;

		let mut file = OpenOptions::new()
			.create(false)
			.write(true)
			.truncate(false)
			.open(&path)
			.map_err(|err| AssignError::OpenFailed {
				err,
				path: path.clone(),
			})?;
		write_membership(&mut file, &path, &data)?;

		info!(pid, path = %path.display(), "moved process into cgroup");
		Ok(path)
	}

	fn locate(&self, cgroup: &CGroup) -> Result<PathBuf, AssignError> {
		let primary = within_limit(cgroup.membership_file())?;
		if probe(&primary) {
			return Ok(primary);
		}
		if self.policy == FallbackPolicy::MembershipFile {
			let fallback = within_limit(cgroup.fallback_membership_file())?;
			if probe(&fallback) {
				warn!(missing = %primary.display(), using = %fallback.display(), "falling back to cgroup membership file");
				return Ok(fallback);
			}
		}
		Err(AssignError::PathNotFound {
			cgroup: cgroup.as_path().to_path_buf(),
		})
	}
}

/// Moves `pid` into `cgroup` with the default [`Assigner`], reporting only whether it worked.
pub fn assign(cgroup: impl AsRef<Path>, pid: u32) -> bool {
	match Assigner::default().assign(cgroup, pid) {
		Ok(_) => true,
		Err(err) => {
			debug!(pid, "{err}");
			false
		}
	}
}

fn within_limit(path: PathBuf) -> Result<PathBuf, AssignError> {
	if path.as_os_str().len() >= PATH_LIMIT {
		return Err(AssignError::PathTooLong { path, limit: PATH_LIMIT });
	}
	Ok(path)
}

// Existence only, following symlinks. Probe errors count as absent.
fn probe(path: &Path) -> bool {
	match path.try_exists() {
		Ok(exists) => {
			debug!(path = %path.display(), exists, "probed membership file");
			exists
		}
		Err(err) => {
			debug!(path = %path.display(), "probe failed: {err}");
			false
		}
	}
}

fn write_membership<W: Write>(writer: &mut W, path: &Path, data: &str) -> Result<(), AssignError> {
	let bytes = data.as_bytes();
	let mut written = 0;
	while written < bytes.len() {
		match writer.write(&bytes[written..]) {
			Ok(0) => {
				return Err(AssignError::ShortWrite {
					path: path.to_path_buf(),
					written,
					expected: bytes.len(),
				})
			}
			Ok(n) => written += n,
			Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
			Err(err) => {
				return Err(AssignError::WriteFailed {
					err,
					path: path.to_path_buf(),
					data: data.to_string(),
				})
			}
		}
	}
	Ok(())
}
