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

use cgswitch::Assigner;
use cgswitch::CGroup;
use cgswitch::FallbackPolicy;
use cgswitch::ProcCgroupError;
use clap::Parser;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CGSWITCH_LOG";

#[derive(Parser, Debug)]
#[command(version, about = "Moves running processes into a control group")]
struct Cli {
	/// Name of the control group. May be relative (appended to the control group of the current process) or absolute (starting with "/").
	#[arg()]
	cgroup: String,

	/// Process IDs to reclassify.
	#[arg(value_delimiter = ',', required = true)]
	pids: Vec<u32>,

	/// Use CGROUP/cgroup.procs when CGROUP/uid_0/cgroup.procs does not exist.
	#[arg(long)]
	fallback: bool,

	/// Mount point of the unified hierarchy, used to resolve relative control group names.
	#[arg(long, value_name = "DIR", default_value = "/sys/fs/cgroup")]
	root: PathBuf,

	/// Log filter such as "debug". Overrides the CGSWITCH_LOG environment variable.
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,
}

fn init_logging(level: Option<&str>) -> Result<(), String> {
	let filter = match level {
		Some(level) => EnvFilter::try_new(level).map_err(|e| format!("invalid log level {level:?}: {e}"))?,
		None => EnvFilter::builder()
			.with_default_directive(LevelFilter::WARN.into())
			.with_env_var(LOG_ENV)
			.from_env_lossy(),
	};
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.try_init()
		.map_err(|e| e.to_string())
}

fn resolve(args: &Cli) -> Result<CGroup, ProcCgroupError> {
	if Path::new(&args.cgroup).is_absolute() {
		return Ok(CGroup::from_path(&args.cgroup));
	}
	let mut cgroup = CGroup::current()?.mounted_at(&args.root);
	cgroup.append(&args.cgroup);
	Ok(cgroup)
}

fn main() -> ExitCode {
	let args = Cli::parse();
	if let Err(err) = init_logging(args.log_level.as_deref()) {
		eprintln!("cgswitch: {err}");
		return ExitCode::FAILURE;
	}
	let cgroup = match resolve(&args) {
		Ok(cgroup) => cgroup,
		Err(err) => {
			error!("{err}");
			return ExitCode::FAILURE;
		}
	};
	let policy = if args.fallback {
		FallbackPolicy::MembershipFile
	} else {
		FallbackPolicy::FirstCandidateOnly
	};
	let assigner = Assigner::new(policy);
	let mut failed = false;
	for pid in args.pids.iter().copied() {
		if let Err(err) = assigner.assign(&cgroup, pid) {
			error!(pid, "{err}");
			failed = true;
		}
	}
	if failed {
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	}
}

#[test]
fn test_cli() {
	fn cli(input: &str) -> Result<Cli, String> {
		Cli::try_parse_from(shlex::split(input).unwrap()).map_err(|e| format!("{e}"))
	}
	assert!(cli("cgswitch").is_err());
	assert!(cli("cgswitch grp").is_err());
	assert!(cli("cgswitch grp pid").is_err());
	assert!(cli("cgswitch grp -1").is_err());
	assert!(cli("cgswitch grp 123 extra").is_err());
	insta::assert_debug_snapshot!(cli("cgswitch grp 123"), @r#"
	Ok(
	    Cli {
	        cgroup: "grp",
	        pids: [
	            123,
	        ],
	        fallback: false,
	        root: "/sys/fs/cgroup",
	        log_level: None,
	    },
	)
	"#);
	insta::assert_debug_snapshot!(cli("cgswitch grp 123,456 --fallback"), @r#"
	Ok(
	    Cli {
	        cgroup: "grp",
	        pids: [
	            123,
	            456,
	        ],
	        fallback: true,
	        root: "/sys/fs/cgroup",
	        log_level: None,
	    },
	)
	"#);
	insta::assert_debug_snapshot!(cli("cgswitch --root /mnt/cg --log-level debug /apps 7 8"), @r#"
	Ok(
	    Cli {
	        cgroup: "/apps",
	        pids: [
	            7,
	            8,
	        ],
	        fallback: false,
	        root: "/mnt/cg",
	        log_level: Some(
	            "debug",
	        ),
	    },
	)
	"#);
}

#[test]
fn test_resolve_absolute() {
	let args = Cli::try_parse_from(["cgswitch", "--root", "/mnt/cg", "/sys/fs/cgroup/apps", "1"]).unwrap();
	assert_eq!(resolve(&args).unwrap(), CGroup::from_path("/sys/fs/cgroup/apps"));
}

#[test]
fn test_resolve_relative() {
	let args = Cli::try_parse_from(["cgswitch", "--root", "/mnt/cg", "apps", "1"]).unwrap();
	// Only meaningful on hosts with a unified hierarchy.
	if let Ok(current) = CGroup::current() {
		let mut expected = current.mounted_at("/mnt/cg");
		expected.append("apps");
		assert_eq!(resolve(&args).unwrap(), expected);
	}
}
