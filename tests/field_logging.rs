//! Log records emitted by the particle field on host events
//!
//! Installs a process-wide capturing logger, so everything lives in one
//! test binary with a single test.

use aura_haven::field::ParticleField;
use aura_haven::models::DisasterMode;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::Mutex;

static RECORDS: Mutex<Vec<(Level, String, String)>> = Mutex::new(Vec::new());

struct Capture;

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = RECORDS.lock() {
            records.push((record.level(), record.target().to_string(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: Capture = Capture;

#[test]
fn test_resize_and_mode_switch_log_at_info() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let mut field = ParticleField::seeded(DisasterMode::Flood, 800, 600, 3);
    field.resize(1024, 768);
    field.set_mode(DisasterMode::Fire);
    // same mode again is a no-op and stays quiet
    field.set_mode(DisasterMode::Fire);

    let records = RECORDS.lock().unwrap();
    let field_records: Vec<_> =
        records.iter().filter(|(_, target, _)| target == "aura_haven::field").collect();
    let find = |message: &str| {
        field_records.iter().filter(|(_, _, m)| m == message).map(|(l, _, _)| *l).collect::<Vec<_>>()
    };

    assert_eq!(find("backdrop resize 800x600 -> 1024x768"), [Level::Info]);
    assert_eq!(find("backdrop mode flood -> fire"), [Level::Info]);
    assert!(field_records.iter().all(|(_, _, m)| m != "backdrop mode fire -> fire"));
}
