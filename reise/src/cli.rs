//! Command-line surface.

use std::ffi::OsString;

use clap::Parser;

use crate::domain::{ModeSet, ModeTag, Query};
use crate::error::Error;

/// Show departures from a public-transport stop in Norway.
#[derive(Debug, Parser)]
#[command(
    name = "reise",
    about = "Show upcoming departures from a stop, remembering stops you have looked up",
    after_help = "Stops are looked up in the local cache first and saved there after a \
                  successful search. Mode flags can be combined, e.g. `reise -bt jernbanetorget`."
)]
pub struct Args {
    /// Name of the stop; several words are joined with spaces
    #[arg(value_name = "STOP")]
    pub stop: Vec<String>,

    /// Only buses
    #[arg(short, long)]
    pub bus: bool,

    /// Only metro
    #[arg(short, long)]
    pub metro: bool,

    /// Only trams
    #[arg(short, long)]
    pub tram: bool,

    /// Only trains
    #[arg(short = 'r', long)]
    pub train: bool,

    /// Only ferries and boats
    #[arg(short, long)]
    pub water: bool,

    /// Search the directory even if the stop is cached; nothing is saved
    #[arg(short, long)]
    pub search: bool,

    /// List cached stops
    #[arg(short, long)]
    pub list: bool,

    /// Show everything cached about a stop
    #[arg(short, long, num_args = 1.., value_name = "STOP")]
    pub info: Option<Vec<String>>,

    /// Rename a cached stop: `-n old name : new name`
    #[arg(short = 'n', long, num_args = 1.., value_name = "OLD : NEW")]
    pub rename: Option<Vec<String>>,

    /// Delete a cached stop
    #[arg(short, long, num_args = 1.., value_name = "STOP")]
    pub delete: Option<Vec<String>>,

    /// Delete all cached stops
    #[arg(short, long)]
    pub clear_cache: bool,

    /// Skip confirmation; with --rename, replace an existing name
    #[arg(short, long)]
    pub force: bool,

    /// Print version
    #[arg(short = 'v', long)]
    pub version: bool,
}

/// What a single invocation should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Help,
    Version,
    Run(Command),
}

/// A command that works on the cache or the network.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Clear { force: bool },
    Delete { name: String, force: bool },
    Info { name: String },
    Rename {
        old: String,
        new: String,
        force: bool,
    },
    Search(Query),
}

impl Args {
    /// Mode restriction from the mode flags; none set means all modes.
    pub fn modes(&self) -> ModeSet {
        [
            (self.bus, ModeTag::Bus),
            (self.metro, ModeTag::Metro),
            (self.tram, ModeTag::Tram),
            (self.train, ModeTag::Rail),
            (self.water, ModeTag::Ferry),
        ]
        .into_iter()
        .filter_map(|(set, mode)| set.then_some(mode))
        .collect()
    }

    /// Pick the one action to run.
    ///
    /// When several action flags are given, the first of version, list,
    /// clear, delete, info, rename and search wins.
    pub fn into_invocation(self) -> Result<Invocation, Error> {
        if self.version {
            return Ok(Invocation::Version);
        }
        if self.list {
            return Ok(Invocation::Run(Command::List));
        }
        if self.clear_cache {
            return Ok(Invocation::Run(Command::Clear { force: self.force }));
        }
        if let Some(words) = &self.delete {
            return Ok(Invocation::Run(Command::Delete {
                name: join_words(words, "--delete")?,
                force: self.force,
            }));
        }
        if let Some(words) = &self.info {
            return Ok(Invocation::Run(Command::Info {
                name: join_words(words, "--info")?,
            }));
        }
        if let Some(words) = &self.rename {
            let (old, new) = parse_rename(words)?;
            return Ok(Invocation::Run(Command::Rename {
                old,
                new,
                force: self.force,
            }));
        }

        let text = self.stop.join(" ");
        if text.trim().is_empty() {
            return Ok(Invocation::Help);
        }

        let mut query = Query::new(text.trim()).with_modes(self.modes());
        if self.search {
            query = query.bypassing_cache();
        }
        Ok(Invocation::Run(Command::Search(query)))
    }
}

/// Short flags that take the words after them as their value.
const VALUE_FLAGS: &[char] = &['d', 'i', 'n'];

/// Short flags that take no value.
const SWITCH_FLAGS: &[char] = &['b', 'm', 't', 'r', 'w', 's', 'l', 'c', 'f', 'v', 'h'];

/// Move value-taking flags to the end of combined short flags.
///
/// Clap reads everything after a value flag inside a cluster as its value,
/// so `-df oslo s` would delete a stop called `f`. Clusters made only of
/// known flags are split into one cluster of switches followed by each value
/// flag on its own: `-df` becomes `-f -d`, `-bd` becomes `-b -d`. Anything
/// after `--` is left alone.
pub fn split_flag_clusters<I, T>(argv: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut literal = false;
    for arg in argv.into_iter().map(Into::into) {
        if literal {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            literal = true;
            out.push(arg);
            continue;
        }
        match arg.to_str().and_then(reorder_cluster) {
            Some(split) => out.extend(split.into_iter().map(OsString::from)),
            None => out.push(arg),
        }
    }
    out
}

/// The split form of `arg`, or `None` when it needs no rewriting.
fn reorder_cluster(arg: &str) -> Option<Vec<String>> {
    let flags = arg.strip_prefix('-').filter(|f| !f.starts_with('-'))?;
    let known = |c: char| VALUE_FLAGS.contains(&c) || SWITCH_FLAGS.contains(&c);
    if flags.chars().count() < 2 || !flags.chars().all(known) {
        return None;
    }

    let (values, switches): (Vec<char>, Vec<char>) =
        flags.chars().partition(|c| VALUE_FLAGS.contains(c));
    let trailing_value = flags.chars().last().filter(|c| VALUE_FLAGS.contains(c));
    if values.is_empty() || (values.len() == 1 && trailing_value.is_some()) {
        return None;
    }

    let mut split = Vec::new();
    if !switches.is_empty() {
        split.push(format!("-{}", switches.iter().collect::<String>()));
    }
    split.extend(values.iter().map(|c| format!("-{c}")));
    Some(split)
}

fn join_words(words: &[String], flag: &str) -> Result<String, Error> {
    let joined = words.join(" ");
    let name = joined.trim();
    if name.is_empty() {
        return Err(Error::Usage(format!("{flag} needs a stop name")));
    }
    Ok(name.to_string())
}

/// Split `OLD : NEW` into its two trimmed halves.
///
/// The words are joined with spaces first and split on the first `:`, so
/// `-n oslo s : sentralen`, `-n "oslo s:sentralen"` and `-n oslo s: sentralen`
/// all mean the same.
pub fn parse_rename(words: &[String]) -> Result<(String, String), Error> {
    let joined = words.join(" ");
    let usage = || Error::Usage("--rename expects 'OLD : NEW'".to_string());

    let (old, new) = joined.split_once(':').ok_or_else(usage)?;
    let (old, new) = (old.trim(), new.trim());
    if old.is_empty() || new.is_empty() {
        return Err(usage());
    }
    Ok((old.to_string(), new.to_string()))
}
