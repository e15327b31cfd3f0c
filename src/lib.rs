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

//! This package moves processes into Linux control groups by writing their PIDs to the group's `cgroup.procs` membership file.
//!
//! The membership file looked up under a cgroup directory is `uid_0/cgroup.procs`. Falling back to the
//! directory's own `cgroup.procs` is available as an opt-in [`FallbackPolicy`].
//!
//! ```no_run
//! use cgswitch::{Assigner, FallbackPolicy};
//!
//! if !cgswitch::assign("/sys/fs/cgroup/apps", 1234) {
//!     eprintln!("could not move 1234");
//! }
//!
//! let written = Assigner::new(FallbackPolicy::MembershipFile).assign("/sys/fs/cgroup/apps", 1234)?;
//! println!("wrote {}", written.display());
//! # Ok::<(), cgswitch::AssignError>(())
//! ```
//!
//! The `cgswitch` binary wraps the same operation for use from scripts.

mod assign;
mod cgroup;
mod error;

pub use assign::assign;
pub use assign::Assigner;
pub use assign::FallbackPolicy;
pub use assign::PATH_LIMIT;
pub use cgroup::CGroup;
pub use cgroup::PROCS_FILE;
pub use cgroup::UID_SUBDIR;
pub use error::AssignError;
pub use error::ProcCgroupError;
