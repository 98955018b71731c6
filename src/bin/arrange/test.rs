use super::*;
use clap::CommandFactory as _;
use tempfile::TempDir;

#[test]
fn test_cli_definition() {
    Cli::command().debug_assert();
}

#[test]
fn test_log_level_parses() {
    let cli = Cli::try_parse_from(["arrange", "--log-level", "debug", "seatings", "--tables", "3"])
        .expect("Failed to parse the command line");

    assert_eq!(cli.log_level, log::LevelFilter::Debug);
    assert!(matches!(cli.command, Command::Seatings { tables: 3 }));

    let cli = Cli::try_parse_from(["arrange", "howell", "--pairs", "8"])
        .expect("Failed to parse the command line");
    assert_eq!(cli.log_level, log::LevelFilter::Warn);

    assert!(Cli::try_parse_from(["arrange", "--log-level", "loud", "howell", "--pairs", "8"]).is_err());
}

#[test]
fn test_load_exit_codes() {
    let dir = TempDir::new().expect("Failed to create a temporary directory");
    let path = dir.path().join("movements.json");

    let code = howell(6, None, Some(path.clone())).expect("Failed to store a Howell");
    assert_eq!(code, ExitCode::SUCCESS);

    assert_eq!(load(6, path.clone(), None).expect("Failed to load"), ExitCode::SUCCESS);
    assert_eq!(
        load(8, path.clone(), None).expect("Failed to load"),
        ExitCode::from(NOT_FOUND)
    );

    std::fs::write(&path, r#"{ "6": { "Rounds": 5 } }"#).expect("Failed to write the store");
    assert_eq!(load(6, path, None).expect("Failed to load"), ExitCode::from(INVALID));
}

#[test]
fn test_log_lines_carry_level_and_target() {
    let line = log_line(
        &log::Record::builder()
            .level(log::Level::Info)
            .target("bridge_movements::store")
            .args(format_args!("Saved {} pairs", 8))
            .build(),
    );
    assert_eq!(line, "[INFO  bridge_movements::store] Saved 8 pairs");
}
