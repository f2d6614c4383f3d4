//! Flag parsing.

use super::parse;
use crate::cli::Cli;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_no_flags_has_no_mode() {
    let cli = parse(&["linkgrab"]);
    assert!(!cli.has_mode());
    assert!(cli.get.is_none());
    assert!(cli.profile.is_none());
}

#[test]
fn cli_parse_modes_combine() {
    let cli = parse(&["linkgrab", "--list", "--download"]);
    assert!(cli.list);
    assert!(!cli.dry);
    assert!(cli.download);
    assert!(cli.has_mode());
}

#[test]
fn cli_parse_get_and_paths() {
    let cli = parse(&[
        "linkgrab",
        "--dry",
        "--get",
        "pdf,epub",
        "--input",
        "lib.html",
        "--output",
        "/srv/books",
    ]);
    assert_eq!(cli.get.as_deref(), Some("pdf,epub"));
    assert_eq!(cli.input, Some(PathBuf::from("lib.html")));
    assert_eq!(cli.output, Some(PathBuf::from("/srv/books")));
}

#[test]
fn cli_parse_profile_and_jobs() {
    let cli = parse(&["linkgrab", "--download", "--profile", "humble", "--jobs", "8"]);
    assert_eq!(cli.profile.as_deref(), Some("humble"));
    assert_eq!(cli.jobs, Some(8));
}

#[test]
fn cli_rejects_bad_jobs() {
    assert!(Cli::try_parse_from(["linkgrab", "--jobs", "many"]).is_err());
}

#[test]
fn cli_rejects_unknown_flag() {
    assert!(Cli::try_parse_from(["linkgrab", "--upload"]).is_err());
}
