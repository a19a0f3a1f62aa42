//! Command line parsing.
//!
//! The grammar is `kvtool [global options] <command> [args...]`. Global
//! options must precede the command. Single-dash long flags such as `-db`
//! and `-format=hex` are accepted alongside `--db` and `--format=hex`.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::codec::Format;
use crate::commands::{self, GetArgs, Invocation, SetArgs};
use crate::config::{GlobalOptions, LogLevel};
use crate::error::{Error, Result};
use crate::output::OutputFormat;

/// Global long flags that may also be spelled with a single dash. All take a value.
const GLOBAL_LONG_FLAGS: [&str; 4] = ["db", "level", "output", "cache-size"];

/// Global short flags that take a value
const GLOBAL_SHORT_FLAGS: [&str; 2] = ["-l", "-o"];

/// `get` long flags that may also be spelled with a single dash
const GET_LONG_FLAGS: [&str; 1] = ["format"];

/// Build the CLI command structure
pub fn build_cli() -> Command {
    Command::new("kvtool")
        .about("Inspect and edit an embedded key-value store")
        .version(env!("CARGO_PKG_VERSION"))
        .disable_help_subcommand(true)
        .allow_external_subcommands(true)
        .arg(
            Arg::new("db")
                .help("Store directory")
                .long("db")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("level")
                .help("Log level: trace, debug, info, warn, error, fatal, panic or off")
                .short('l')
                .long("level")
                .value_name("LEVEL")
                .default_value("error"),
        )
        .arg(
            Arg::new("output")
                .help("Output format: text (default) or json")
                .short('o')
                .long("output")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("cache-size")
                .help("Store cache size in MB")
                .long("cache-size")
                .value_name("MB")
                .value_parser(value_parser!(u64)),
        )
        .subcommand(get_command())
        .subcommand(set_command())
        .subcommand(Command::new("help").about("Print usage"))
}

fn get_command() -> Command {
    Command::new("get")
        .about("Print the value of a key, or every entry whose key contains all terms")
        .arg(
            Arg::new("format")
                .help("Encoding of keys and printed output")
                .long("format")
                .value_parser(Format::NAMES)
                .ignore_case(true)
                .default_value("quoted"),
        )
        .arg(
            Arg::new("keys")
                .help("Exact key, or substring terms")
                .value_name("KEY")
                .num_args(1..)
                .action(ArgAction::Append),
        )
}

fn set_command() -> Command {
    Command::new("set")
        .about("Write a key, confirming before overwriting an existing value")
        .arg(
            Arg::new("force")
                .help("Overwrite without confirmation")
                .short('f')
                .long("force")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("key")
                .help("Key as a quoted-string literal")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("value")
                .help("Value as a quoted-string literal")
                .required(true)
                .allow_hyphen_values(true)
                .index(2),
        )
}

/// Rewrite `-db`, `-format=hex` and friends into their `--` spelling.
///
/// Only option positions are rewritten: global flags before the command and
/// `get` flags before its first key. Positional arguments, and everything
/// after them or after a bare `--`, pass through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut long_flags: &[&str] = &GLOBAL_LONG_FLAGS;
    let mut in_command = false;
    let mut takes_value = false;

    while let Some(arg) = args.next() {
        if takes_value {
            takes_value = false;
            normalized.push(arg);
            continue;
        }
        let text = arg.to_string_lossy().into_owned();

        if text == "--" || text == "-" || !text.starts_with('-') {
            let first_positional = in_command || text == "--";
            in_command = true;
            long_flags = match text.as_str() {
                "get" => &GET_LONG_FLAGS,
                _ => &[],
            };
            normalized.push(arg);
            if first_positional || long_flags.is_empty() {
                break;
            }
            continue;
        }

        match long_flag(&text).filter(|(name, _)| long_flags.contains(name)) {
            Some((_, inline)) => {
                takes_value = !inline;
                if text.starts_with("--") {
                    normalized.push(arg);
                } else {
                    normalized.push(OsString::from(format!("-{}", text)));
                }
            }
            None => {
                takes_value = !in_command && GLOBAL_SHORT_FLAGS.contains(&text.as_str());
                normalized.push(arg);
            }
        }
    }

    normalized.extend(args);
    normalized
}

/// Name of a `-name`, `-name=value`, `--name` or `--name=value` token, and
/// whether the value is inline
fn long_flag(text: &str) -> Option<(&str, bool)> {
    let rest = text.strip_prefix("--").or_else(|| text.strip_prefix('-'))?;
    Some(match rest.split_once('=') {
        Some((name, _)) => (name, true),
        None => (rest, false),
    })
}

/// Parse a full argument list, program name first
pub fn parse<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let matches = build_cli().try_get_matches_from(normalize_args(args))?;
    let globals = global_options(&matches)?;

    let command = match matches.subcommand() {
        None => None,
        Some(("get", sub)) => Some(commands::Command::Get(get_args(sub)?)),
        Some(("set", sub)) => Some(commands::Command::Set(set_args(sub)?)),
        Some(("help", _)) => Some(commands::Command::Help),
        Some((other, _)) => return Err(Error::UnknownCommand(other.to_string())),
    };

    Ok(Invocation { globals, command })
}

fn global_options(matches: &ArgMatches) -> Result<GlobalOptions> {
    let log_level = match matches.get_one::<String>("level") {
        Some(level) => level.parse::<LogLevel>()?,
        None => LogLevel::default(),
    };
    let output = match matches.get_one::<String>("output") {
        Some(output) => output.parse::<OutputFormat>().map_err(Error::Config)?,
        None => OutputFormat::default(),
    };

    Ok(GlobalOptions {
        db: matches.get_one::<PathBuf>("db").cloned(),
        log_level,
        output,
        cache_size_mb: matches.get_one::<u64>("cache-size").copied(),
    })
}

fn get_args(matches: &ArgMatches) -> Result<GetArgs> {
    let format = match matches.get_one::<String>("format") {
        Some(format) => format.parse::<Format>().map_err(Error::Config)?,
        None => Format::default(),
    };
    let keys = matches
        .get_many::<String>("keys")
        .map(|keys| keys.cloned().collect())
        .unwrap_or_default();
    Ok(GetArgs { keys, format })
}

fn set_args(matches: &ArgMatches) -> Result<SetArgs> {
    let key = matches
        .get_one::<String>("key")
        .ok_or_else(|| Error::Config("key argument is required".to_string()))?;
    let value = matches
        .get_one::<String>("value")
        .ok_or_else(|| Error::Config("value argument is required".to_string()))?;
    Ok(SetArgs {
        key: key.clone(),
        value: value.clone(),
        force: matches.get_flag("force"),
    })
}
