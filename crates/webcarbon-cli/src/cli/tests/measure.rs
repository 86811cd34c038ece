//! Tests for the measure subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_measure_defaults() {
    match parse(&["webcarbon", "measure", "https://example.com"]) {
        CliCommand::Measure {
            url,
            visits,
            no_save,
            json,
        } => {
            assert_eq!(url, "https://example.com");
            assert!(visits.is_none());
            assert!(!no_save);
            assert!(!json);
        }
        _ => panic!("expected Measure"),
    }
}

#[test]
fn cli_parse_measure_with_flags() {
    match parse(&[
        "webcarbon",
        "measure",
        "https://example.com",
        "--visits",
        "250000",
        "--no-save",
        "--json",
    ]) {
        CliCommand::Measure {
            visits,
            no_save,
            json,
            ..
        } => {
            assert_eq!(visits, Some(250_000));
            assert!(no_save);
            assert!(json);
        }
        _ => panic!("expected Measure with flags"),
    }
}

#[test]
fn cli_rejects_zero_or_negative_visits() {
    assert!(Cli::try_parse_from(["webcarbon", "measure", "https://x.org", "--visits", "0"]).is_err());
    assert!(Cli::try_parse_from(["webcarbon", "measure", "https://x.org", "--visits", "-5"]).is_err());
}

#[test]
fn cli_requires_url() {
    assert!(Cli::try_parse_from(["webcarbon", "measure"]).is_err());
}
