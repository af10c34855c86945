//! Feed command implementation

use chrono::Utc;
use std::process::ExitCode;

use crate::feed::{document, FeedKind};

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Execute the feed command
pub fn run_feed(kind: FeedKind, pretty: bool) -> ExitCode {
    let doc = document(kind, Utc::now());
    let rendered =
        if pretty { serde_json::to_string_pretty(&doc) } else { serde_json::to_string(&doc) };

    match rendered {
        Ok(s) => {
            println!("{}", s);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
