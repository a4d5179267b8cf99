//! Command handlers.
//!
//! Every command works on a [`CacheStore`] passed in by the caller and
//! writes its normal output to a writer, so the same code runs against the
//! terminal and against in-memory fakes.

use std::io::Write;

use tracing::{debug, info};

use crate::cli::Command;
use crate::display;
use crate::domain::Query;
use crate::error::Error;
use crate::filter::{DepartureSource, filter};
use crate::prompt::Chooser;
use crate::resolve::{ResolutionSource, Resolver, StopDirectory};
use crate::store::{CacheStore, Snapshot, StoreError};

/// Runs commands against one cache, one remote service and one user.
pub struct Dispatcher<'a, S: Snapshot, D, C, W> {
    store: &'a mut CacheStore<S>,
    remote: &'a D,
    chooser: &'a mut C,
    out: W,
}

impl<'a, S, D, C, W> Dispatcher<'a, S, D, C, W>
where
    S: Snapshot,
    D: StopDirectory + DepartureSource,
    C: Chooser,
    W: Write,
{
    pub fn new(store: &'a mut CacheStore<S>, remote: &'a D, chooser: &'a mut C, out: W) -> Self {
        Self {
            store,
            remote,
            chooser,
            out,
        }
    }

    /// Run a single command to completion.
    pub fn run(&mut self, command: Command) -> Result<(), Error> {
        debug!(?command, "running command");
        match command {
            Command::List => self.list(),
            Command::Clear { force } => self.clear(force),
            Command::Delete { name, force } => self.delete(&name, force),
            Command::Info { name } => self.info(&name),
            Command::Rename { old, new, force } => self.rename(&old, &new, force),
            Command::Search(query) => self.search(&query),
        }
    }

    fn list(&mut self) -> Result<(), Error> {
        let text = display::stop_list(self.store.list());
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    fn info(&mut self, name: &str) -> Result<(), Error> {
        let record = self
            .store
            .lookup(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let text = display::stop_info(record);
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    fn rename(&mut self, old: &str, new: &str, force: bool) -> Result<(), Error> {
        let previous = if force {
            self.store.rename_replacing(old, new)?
        } else {
            self.store.rename(old, new)?
        };
        writeln!(self.out, "Renamed '{previous}' to '{}'", new.trim())?;
        Ok(())
    }

    fn delete(&mut self, name: &str, force: bool) -> Result<(), Error> {
        let alias = self
            .store
            .resolve_alias(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?
            .to_string();

        if !force && !self.chooser.confirm(&format!("Delete '{alias}' from the cache?")) {
            writeln!(self.out, "Canceled")?;
            return Ok(());
        }

        let removed = self.store.delete(&alias)?;
        writeln!(self.out, "Deleted '{}' ({})", removed.alias, removed.stop_id)?;
        Ok(())
    }

    fn clear(&mut self, force: bool) -> Result<(), Error> {
        if self.store.is_empty() {
            writeln!(self.out, "Cache is already empty")?;
            return Ok(());
        }

        let count = self.store.len();
        let noun = if count == 1 { "entry" } else { "entries" };
        if !force && !self.chooser.confirm(&format!("Delete all {count} cached {noun}?")) {
            writeln!(self.out, "Canceled")?;
            return Ok(());
        }

        let removed = self.store.clear()?;
        writeln!(self.out, "Cleared {removed} cached {noun}")?;
        Ok(())
    }

    /// Resolve the stop, fetch its board and print the departures that
    /// pass the mode filter. An empty result is not an error.
    fn search(&mut self, query: &Query) -> Result<(), Error> {
        let resolution = Resolver::new(self.remote).resolve(self.store, self.chooser, query)?;
        let stop = resolution.record;

        if resolution.source == (ResolutionSource::Directory { saved: true }) {
            writeln!(self.out, "Saved '{}' as {}", stop.alias, stop.stop_id)?;
        }

        let all = self
            .remote
            .departures(&stop.stop_id)
            .map_err(|source| Error::DepartureFetch {
                stop_id: stop.stop_id.clone(),
                source,
            })?;
        let shown = filter(&all, &query.requested_modes);
        info!(
            stop = %stop.stop_id,
            fetched = all.len(),
            shown = shown.len(),
            modes = %query.requested_modes,
            "departures"
        );

        let text = if shown.is_empty() {
            display::no_departures(&stop, &query.requested_modes)
        } else {
            display::departures(&stop, &shown)
        };
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DepartureRecord, ModeSet, ModeTag, Place, StopId, StopRecord};
    use crate::entur::EnturError;
    use crate::resolve::{Candidates, ResolveError};
    use crate::store::MemorySnapshot;
    use chrono::DateTime;
    use std::cell::Cell;

    /// Fake Entur: one stop and a fixed board.
    struct FakeRemote {
        places: Vec<Place>,
        board: Vec<DepartureRecord>,
        board_fails: bool,
        searches: Cell<usize>,
    }

    impl FakeRemote {
        fn new() -> Self {
            Self {
                places: vec![place("Jernbanetorget", "NSR:StopPlace:1234")],
                board: vec![
                    departure("31", ModeTag::Bus, "08:00"),
                    departure("5", ModeTag::Metro, "08:05"),
                    departure("12", ModeTag::Tram, "08:02"),
                ],
                board_fails: false,
                searches: Cell::new(0),
            }
        }
    }

    impl StopDirectory for FakeRemote {
        fn search(&self, _text: &str) -> Result<Candidates, EnturError> {
            self.searches.set(self.searches.get() + 1);
            Ok(Candidates::stops(self.places.clone()))
        }
    }

    impl DepartureSource for FakeRemote {
        fn departures(&self, stop_id: &StopId) -> Result<Vec<DepartureRecord>, EnturError> {
            if self.board_fails {
                return Err(EnturError::UnknownStop(stop_id.to_string()));
            }
            Ok(self.board.clone())
        }
    }

    struct Answers {
        confirm: bool,
        asked: Vec<String>,
    }

    impl Answers {
        fn yes() -> Self {
            Self {
                confirm: true,
                asked: Vec::new(),
            }
        }

        fn no() -> Self {
            Self {
                confirm: false,
                asked: Vec::new(),
            }
        }
    }

    impl Chooser for Answers {
        fn choose(&mut self, _title: &str, _options: &[String]) -> Option<usize> {
            Some(0)
        }

        fn confirm(&mut self, question: &str) -> bool {
            self.asked.push(question.to_string());
            self.confirm
        }
    }

    fn place(name: &str, id: &str) -> Place {
        Place {
            stop_id: StopId::parse(id).unwrap(),
            name: name.to_string(),
            label: format!("{name}, Oslo"),
            county: "Oslo".to_string(),
            layer: "venue".to_string(),
            latitude: None,
            longitude: None,
            modes: vec![ModeTag::Bus],
        }
    }

    fn record(alias: &str, id: &str) -> StopRecord {
        place(alias, id).into_record(alias)
    }

    fn departure(line: &str, mode: ModeTag, hhmm: &str) -> DepartureRecord {
        DepartureRecord {
            line_name: line.to_string(),
            mode,
            destination: format!("To {line}"),
            scheduled_time: DateTime::parse_from_rfc3339(&format!("2024-03-15T{hhmm}:00+01:00"))
                .unwrap(),
            realtime_time: None,
        }
    }

    fn store_with(records: Vec<StopRecord>) -> CacheStore<MemorySnapshot> {
        CacheStore::open(MemorySnapshot::with_entries(records)).unwrap()
    }

    fn run(
        store: &mut CacheStore<MemorySnapshot>,
        remote: &FakeRemote,
        chooser: &mut Answers,
        command: Command,
    ) -> (Result<(), Error>, String) {
        let mut out = Vec::new();
        let result = Dispatcher::new(store, remote, chooser, &mut out).run(command);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn search_saves_and_filters() {
        let mut store = store_with(vec![]);
        let remote = FakeRemote::new();
        let query = Query::new("jernbanetorget")
            .with_modes([ModeTag::Bus, ModeTag::Tram].into_iter().collect());

        let search = Command::Search(query);
        let (result, out) = run(&mut store, &remote, &mut Answers::yes(), search);

        result.unwrap();
        assert!(out.starts_with("Saved 'jernbanetorget' as NSR:StopPlace:1234\n"));
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines.iter().any(|l| l.starts_with("08:00:00  31")));
        assert!(lines.iter().any(|l| l.starts_with("08:02:00  12")));
        assert!(!out.contains("To 5"));
        // 31 before 12
        assert!(out.find("To 31").unwrap() < out.find("To 12").unwrap());
        assert!(store.contains("jernbanetorget"));
    }

    #[test]
    fn cached_search_does_not_announce_save() {
        let mut store = store_with(vec![record("jernbanetorget", "NSR:StopPlace:1234")]);
        let remote = FakeRemote::new();

        let (result, out) = run(
            &mut store,
            &remote,
            &mut Answers::yes(),
            Command::Search(Query::new("jernbanetorget")),
        );

        result.unwrap();
        assert!(!out.contains("Saved"));
        assert_eq!(remote.searches.get(), 0);
    }

    #[test]
    fn no_matching_departures_is_success() {
        let mut store = store_with(vec![record("jernbanetorget", "NSR:StopPlace:1234")]);
        let remote = FakeRemote::new();
        let query =
            Query::new("jernbanetorget").with_modes([ModeTag::Ferry].into_iter().collect());

        let search = Command::Search(query);
        let (result, out) = run(&mut store, &remote, &mut Answers::yes(), search);

        result.unwrap();
        assert!(out.starts_with("No ferry departures"));
    }

    #[test]
    fn board_failure_is_departure_fetch() {
        let mut store = store_with(vec![record("jernbanetorget", "NSR:StopPlace:1234")]);
        let mut remote = FakeRemote::new();
        remote.board_fails = true;

        let (result, _) = run(
            &mut store,
            &remote,
            &mut Answers::yes(),
            Command::Search(Query::new("jernbanetorget")),
        );

        match result.unwrap_err() {
            Error::DepartureFetch { stop_id, .. } => {
                assert_eq!(stop_id.as_str(), "NSR:StopPlace:1234")
            }
            other => panic!("expected DepartureFetch, got {other:?}"),
        }
    }

    #[test]
    fn no_match_propagates() {
        let mut store = store_with(vec![]);
        let mut remote = FakeRemote::new();
        remote.places.clear();

        let (result, _) = run(
            &mut store,
            &remote,
            &mut Answers::yes(),
            Command::Search(Query::new("atlantis")),
        );

        assert!(matches!(
            result.unwrap_err(),
            Error::Resolve(ResolveError::NoMatch { .. })
        ));
    }

    #[test]
    fn list_and_info() {
        let mut store = store_with(vec![
            record("jernbanetorget", "NSR:StopPlace:1234"),
            record("oslo s", "NSR:StopPlace:337"),
        ]);
        let remote = FakeRemote::new();

        let (result, out) = run(&mut store, &remote, &mut Answers::yes(), Command::List);
        result.unwrap();
        assert!(out.contains("0  jernbanetorget"));
        assert!(out.contains("1  oslo s"));

        let (result, out) = run(
            &mut store,
            &remote,
            &mut Answers::yes(),
            Command::Info {
                name: "OsloS".into(),
            },
        );
        result.unwrap();
        assert!(out.contains("NSR:StopPlace:337"));
    }

    #[test]
    fn info_unknown_is_not_found() {
        let mut store = store_with(vec![]);
        let (result, _) = run(
            &mut store,
            &FakeRemote::new(),
            &mut Answers::yes(),
            Command::Info {
                name: "nowhere".into(),
            },
        );
        assert!(matches!(
            result.unwrap_err(),
            Error::Store(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn delete_asks_first() {
        let mut store = store_with(vec![record("jernbanetorget", "NSR:StopPlace:1234")]);
        let remote = FakeRemote::new();

        let mut no = Answers::no();
        let (result, out) = run(
            &mut store,
            &remote,
            &mut no,
            Command::Delete {
                name: "Jernbanetorget".into(),
                force: false,
            },
        );
        result.unwrap();
        assert_eq!(out, "Canceled\n");
        assert_eq!(no.asked.len(), 1);
        assert!(store.contains("jernbanetorget"));

        let mut yes = Answers::yes();
        let (result, out) = run(
            &mut store,
            &remote,
            &mut yes,
            Command::Delete {
                name: "jernbanetorget".into(),
                force: false,
            },
        );
        result.unwrap();
        assert!(out.starts_with("Deleted 'jernbanetorget'"));
        assert!(store.is_empty());
    }

    #[test]
    fn forced_delete_skips_prompt() {
        let mut store = store_with(vec![record("jernbanetorget", "NSR:StopPlace:1234")]);
        let mut chooser = Answers::no();

        let (result, _) = run(
            &mut store,
            &FakeRemote::new(),
            &mut chooser,
            Command::Delete {
                name: "jernbanetorget".into(),
                force: true,
            },
        );
        result.unwrap();
        assert!(chooser.asked.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn clear() {
        let mut store = store_with(vec![
            record("a", "NSR:StopPlace:1"),
            record("b", "NSR:StopPlace:2"),
        ]);
        let remote = FakeRemote::new();

        let clear = Command::Clear { force: false };
        let (result, out) = run(&mut store, &remote, &mut Answers::no(), clear);
        result.unwrap();
        assert_eq!(out, "Canceled\n");
        assert_eq!(store.len(), 2);

        let forced = Command::Clear { force: true };
        let (result, out) = run(&mut store, &remote, &mut Answers::no(), forced);
        result.unwrap();
        assert_eq!(out, "Cleared 2 cached entries\n");
        assert!(store.is_empty());

        let clear = Command::Clear { force: false };
        let (result, out) = run(&mut store, &remote, &mut Answers::yes(), clear);
        result.unwrap();
        assert_eq!(out, "Cache is already empty\n");
    }

    #[test]
    fn rename_and_force() {
        let mut store = store_with(vec![
            record("jernbanetorget", "NSR:StopPlace:1234"),
            record("oslo s", "NSR:StopPlace:337"),
        ]);
        let remote = FakeRemote::new();

        let (result, _) = run(
            &mut store,
            &remote,
            &mut Answers::yes(),
            Command::Rename {
                old: "jernbanetorget".into(),
                new: "oslo s".into(),
                force: false,
            },
        );
        assert!(matches!(
            result.unwrap_err(),
            Error::Store(StoreError::DuplicateAlias(_))
        ));

        let (result, out) = run(
            &mut store,
            &remote,
            &mut Answers::yes(),
            Command::Rename {
                old: "jernbanetorget".into(),
                new: "oslo s".into(),
                force: true,
            },
        );
        result.unwrap();
        assert_eq!(out, "Renamed 'jernbanetorget' to 'oslo s'\n");
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("oslo s").unwrap().stop_id.as_str(),
            "NSR:StopPlace:1234"
        );
    }

    #[test]
    fn requested_modes_default_to_all() {
        assert!(Query::new("x").requested_modes.is_all());
        assert_eq!(ModeSet::all().to_string(), "all");
    }
}
