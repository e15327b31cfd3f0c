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

use crate::error::ProcCgroupError;
use std::fmt;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::process;

/// Name of the membership control file in every cgroup directory.
pub const PROCS_FILE: &str = "cgroup.procs";

/// Per-identity subdirectory that holds the preferred membership file.
pub const UID_SUBDIR: &str = "uid_0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CGroup(PathBuf);

impl CGroup {
	/// The control group of the current process, relative to the cgroupfs root.
	pub fn current() -> Result<Self, ProcCgroupError> {
		Self::from_proc_pid_cgroup(process::id())
	}

	pub fn from_proc_pid_cgroup(pid: u32) -> Result<Self, ProcCgroupError> {
		let mut path = PathBuf::from("/proc");
		path.push(pid.to_string());
		path.push("cgroup");
		let contents = fs::read_to_string(&path).map_err(|err| ProcCgroupError::Read { err, path })?;
		Self::parse_proc_cgroup(&contents)
	}

	/// Extracts the unified hierarchy entry from the contents of `/proc/<pid>/cgroup`.
	///
	/// # Examples
	///
	/// ```
	/// use cgswitch::CGroup;
	///
	/// let cgroup = CGroup::parse_proc_cgroup("1:name=systemd:/init.scope\n0::/init.scope\n").unwrap();
	/// assert_eq!(cgroup.as_path().to_str(), Some("/init.scope"));
	/// ```
	pub fn parse_proc_cgroup(contents: &str) -> Result<Self, ProcCgroupError> {
		contents
			.lines()
			.find_map(|line| line.trim().strip_prefix("0::"))
			.map(|s| Self(PathBuf::from(s)))
			.ok_or_else(|| ProcCgroupError::NotUnified {
				contents: contents.to_string(),
			})
	}

	pub fn from_path(path: impl AsRef<Path>) -> Self {
		Self(PathBuf::from(path.as_ref()))
	}

	pub fn as_path(&self) -> &Path {
		&self.0
	}

	/// # Examples
	///
	/// ```
	/// use cgswitch::CGroup;
	///
	/// let mut cgroup = CGroup::from_path("/a/b/c");
	/// cgroup.append("d");
	/// assert_eq!(cgroup.as_path().to_str(), Some("/a/b/c/d"));
	/// cgroup.append("/e");
	/// assert_eq!(cgroup.as_path().to_str(), Some("/e"));
	/// ```
	pub fn append(&mut self, path: impl AsRef<Path>) {
		self.0.push(path);
	}

	/// Places a cgroupfs-relative path under the directory where the hierarchy is mounted.
	///
	/// # Examples
	///
	/// ```
	/// use cgswitch::CGroup;
	///
	/// let cgroup = CGroup::from_path("/user.slice/app");
	/// let mounted = cgroup.mounted_at("/sys/fs/cgroup");
	/// assert_eq!(mounted.as_path().to_str(), Some("/sys/fs/cgroup/user.slice/app"));
	/// let root = CGroup::from_path("/").mounted_at("/sys/fs/cgroup");
	/// assert_eq!(root.as_path().to_str(), Some("/sys/fs/cgroup"));
	/// ```
	pub fn mounted_at(&self, root: impl AsRef<Path>) -> Self {
		let mut path = PathBuf::from(root.as_ref());
		for component in self.0.components() {
			if let Component::Normal(part) = component {
				path.push(part);
			}
		}
		Self(path)
	}

	/// `<cgroup>/uid_0/cgroup.procs`
	pub fn membership_file(&self) -> PathBuf {
		self.0.join(UID_SUBDIR).join(PROCS_FILE)
	}

	/// `<cgroup>/cgroup.procs`
	pub fn fallback_membership_file(&self) -> PathBuf {
		self.0.join(PROCS_FILE)
	}
}

impl AsRef<Path> for CGroup {
	fn as_ref(&self) -> &Path {
		&self.0
	}
}

impl fmt::Display for CGroup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0.display())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_unified() {
		let cgroup = CGroup::parse_proc_cgroup("0::/user.slice/user-1000.slice/session-2.scope\n").unwrap();
		assert_eq!(cgroup.as_path(), Path::new("/user.slice/user-1000.slice/session-2.scope"));
	}

	#[test]
	fn test_parse_hybrid() {
		let contents = "12:pids:/user.slice\n1:name=systemd:/user.slice/session-2.scope\n0::/user.slice/session-2.scope\n";
		let cgroup = CGroup::parse_proc_cgroup(contents).unwrap();
		assert_eq!(cgroup.as_path(), Path::new("/user.slice/session-2.scope"));
	}

	#[test]
	fn test_parse_v1_only() {
		let contents = "12:pids:/user.slice\n4:memory:/user.slice\n";
		let err = CGroup::parse_proc_cgroup(contents).unwrap_err();
		assert!(matches!(err, ProcCgroupError::NotUnified { .. }));
	}

	#[test]
	fn test_current() {
		// Only meaningful on hosts with a unified hierarchy.
		if let Ok(cgroup) = CGroup::current() {
			assert!(cgroup.as_path().is_absolute());
		}
	}

	#[test]
	fn test_membership_files() {
		let cgroup = CGroup::from_path("/sys/fs/cgroup/app");
		assert_eq!(cgroup.membership_file(), Path::new("/sys/fs/cgroup/app/uid_0/cgroup.procs"));
		assert_eq!(cgroup.fallback_membership_file(), Path::new("/sys/fs/cgroup/app/cgroup.procs"));
	}

	#[test]
	fn test_display() {
		assert_eq!(CGroup::from_path("/a/b").to_string(), "/a/b");
	}
}
