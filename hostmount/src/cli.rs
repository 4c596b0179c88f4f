//! Command line surface and invocation flow.
//!
//! ```text
//! hostmount [-r] [-o OPTIONS]... [-t FSTYPE] [-bind|-rbind] [-make-*] DEV PATH
//! hostmount                      # print the mount table
//! ```
//!
//! Long switches accept one or two leading dashes (`-bind`, `--bind`) and an
//! optional boolean value (`-bind=true`, `-make-rshared=false`).

use clap::{ArgAction, CommandFactory, Parser};
use hostmount_shared::errors::{HostmountError, HostmountResult};
use tracing::debug;

use crate::config::HostPaths;
use crate::dispatch::{Dispatcher, read_mount_table};
use crate::loopdev::LoopBinder;
use crate::mounter::Mounter;
use crate::options::{
    KnownOptionTable, MountOptionSet, MountRequest, MountSwitches, OptionTranslator,
};

/// Long switches that may be written with a single dash.
const LONG_SWITCHES: &[&str] = &[
    "bind",
    "rbind",
    "make-shared",
    "make-slave",
    "make-private",
    "make-unbindable",
    "make-rshared",
    "make-rslave",
    "make-rprivate",
    "make-runbindable",
    "verbose",
    "help",
    "version",
];

/// Mount a filesystem at the specified path.
///
/// With no arguments, prints the current mount table.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(
    name = "hostmount",
    version,
    override_usage = "hostmount [-r] [-o OPTIONS] [-t FSTYPE] DEV PATH"
)]
pub struct MountArgs {
    /// Read only mount
    #[arg(short = 'r')]
    pub read_only: bool,

    /// File system type
    #[arg(short = 't', value_name = "FSTYPE")]
    pub fstype: Option<String>,

    /// Comma separated list of mount options (repeatable)
    #[arg(short = 'o', value_name = "OPTIONS", action = ArgAction::Append)]
    pub options: Vec<String>,

    /// Mount with -o bind
    #[arg(long)]
    pub bind: bool,

    /// Mount with -o bind,rec
    #[arg(long)]
    pub rbind: bool,

    /// Mount with -o shared
    #[arg(long)]
    pub make_shared: bool,

    /// Mount with -o slave
    #[arg(long)]
    pub make_slave: bool,

    /// Mount with -o private
    #[arg(long)]
    pub make_private: bool,

    /// Mount with -o unbindable
    #[arg(long)]
    pub make_unbindable: bool,

    /// Mount with -o shared,rec
    #[arg(long)]
    pub make_rshared: bool,

    /// Mount with -o slave,rec
    #[arg(long)]
    pub make_rslave: bool,

    /// Mount with -o private,rec
    #[arg(long)]
    pub make_rprivate: bool,

    /// Mount with -o unbindable,rec
    #[arg(long)]
    pub make_runbindable: bool,

    /// Log option translation and mount attempts
    #[arg(long)]
    pub verbose: bool,

    /// DEV PATH
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

impl MountArgs {
    pub fn switches(&self) -> MountSwitches {
        MountSwitches {
            read_only: self.read_only,
            bind: self.bind,
            rbind: self.rbind,
            make_shared: self.make_shared,
            make_slave: self.make_slave,
            make_private: self.make_private,
            make_unbindable: self.make_unbindable,
            make_rshared: self.make_rshared,
            make_rslave: self.make_rslave,
            make_rprivate: self.make_rprivate,
            make_runbindable: self.make_runbindable,
        }
    }

    pub fn option_set(&self) -> MountOptionSet {
        MountOptionSet::from_values(&self.options)
    }

    /// Explicit filesystem type; an empty `-t` means none.
    pub fn fstype(&self) -> Option<&str> {
        self.fstype.as_deref().filter(|t| !t.is_empty())
    }

    pub fn usage() -> String {
        MountArgs::command().render_usage().to_string()
    }
}

/// Rewrite switches into the form clap expects.
///
/// - `-bind` becomes `--bind`
/// - `-bind=true` (any true spelling) becomes `--bind`, `-r=1` becomes `-r`
/// - `-bind=false` is dropped
/// - `-bind=maybe` is forwarded as `--bind=maybe` and rejected by clap
///
/// The first item is the program name. Everything after `--` is untouched.
pub fn normalize_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for (i, arg) in args.into_iter().map(Into::into).enumerate() {
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }

        let Some(body) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
            out.push(arg);
            continue;
        };
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let canonical = if name == "r" {
            "-r".to_string()
        } else if LONG_SWITCHES.contains(&name) {
            format!("--{}", name)
        } else {
            out.push(arg);
            continue;
        };

        match value.map(|v| (v, parse_switch_value(v))) {
            None | Some((_, Some(true))) => out.push(canonical),
            Some((_, Some(false))) => {}
            Some((raw, None)) => out.push(format!("{}={}", canonical, raw)),
        }
    }
    out
}

/// Boolean spellings accepted after `=` on a switch.
fn parse_switch_value(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Parse a full argv (program name first).
pub fn parse_args<I, S>(args: I) -> Result<MountArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    MountArgs::try_parse_from(normalize_args(args))
}

/// Collaborators for one invocation.
pub struct Host<'a> {
    pub paths: &'a HostPaths,
    pub table: &'a KnownOptionTable,
    pub binder: &'a dyn LoopBinder,
    pub mounter: &'a dyn Mounter,
}

/// Terminal state of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No positional arguments: contents of the first readable mount table.
    Listed(String),
    /// The request that was mounted.
    Mounted(MountRequest),
}

/// Run one invocation.
///
/// The mount table listing only happens when no positional argument is
/// given. Otherwise both DEV and PATH are required.
pub fn run(args: &MountArgs, host: &Host<'_>) -> HostmountResult<Outcome> {
    if args.args.is_empty() {
        if let Some((path, contents)) = read_mount_table(&host.paths.mount_tables) {
            debug!(path = %path.display(), "Listing mount table");
            return Ok(Outcome::Listed(contents));
        }
    }

    let [device, path, ..] = args.args.as_slice() else {
        return Err(HostmountError::Usage(MountArgs::usage()));
    };

    let request = OptionTranslator::new(host.table, host.binder).translate(
        device,
        path,
        args.fstype(),
        &args.option_set(),
        &args.switches(),
    )?;

    Dispatcher::new(host.mounter, host.paths.filesystems_path()).dispatch(&request)?;
    Ok(Outcome::Mounted(request))
}
