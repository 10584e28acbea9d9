use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["igscout"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_bare_run_command() {
    let cli = Cli::try_parse_from(["igscout", "run"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Run {
            ref hashtags,
            target: None,
            workers: None,
            dry_run: false,
        }) if hashtags.is_empty()
    ));
}

#[test]
fn parses_repeated_hashtags_in_order() {
    let cli = Cli::try_parse_from([
        "igscout", "run", "--hashtag", "travel", "--hashtag", "#food",
    ])
    .expect("expected valid cli args");
    let Some(Commands::Run { hashtags, .. }) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(hashtags, ["travel", "#food"]);
}

#[test]
fn parses_run_with_dry_run_and_limits() {
    let cli = Cli::try_parse_from([
        "igscout", "run", "--target", "25", "--workers", "4", "--dry-run",
    ])
    .expect("expected valid cli args");
    let Some(Commands::Run {
        target,
        workers,
        dry_run,
        ..
    }) = cli.command
    else {
        panic!("expected run command");
    };
    assert_eq!(target, Some(25));
    assert_eq!(workers.map(NonZeroUsize::get), Some(4));
    assert!(dry_run);
}

#[test]
fn rejects_zero_workers() {
    let result = Cli::try_parse_from(["igscout", "run", "--workers", "0"]);
    assert!(result.is_err());
}

#[test]
fn overrides_cover_only_given_flags() {
    let cli = Cli::try_parse_from([
        "igscout", "run", "--hashtag", "travel", "--hashtag", "food", "--workers", "3",
    ])
    .expect("expected valid cli args");
    let overrides = cli.command.expect("run command").config_overrides();
    assert_eq!(
        overrides,
        vec![
            ("IGSCOUT_HASHTAGS", "travel,food".to_string()),
            ("IGSCOUT_WORKERS", "3".to_string()),
        ]
    );
}

#[test]
fn bare_run_has_no_overrides() {
    let cli = Cli::try_parse_from(["igscout", "run"]).expect("expected valid cli args");
    assert!(cli.command.expect("run command").config_overrides().is_empty());
}
