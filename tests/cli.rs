use std::path::PathBuf;

use clap::Parser;
use ses::cli::{Cli, Command, ConfigCommand, NotifyMode};
use ses::config::SmtpSecurity;

#[test]
fn parses_report_with_several_messages() {
    let cli = Cli::try_parse_from(["ses", "report", "a.eml", "b.eml", "-"])
        .expect("cli parse should work");
    match cli.command {
        Command::Report(report) => assert_eq!(report.messages, ["a.eml", "b.eml", "-"]),
        _ => panic!("expected report command"),
    }
}

#[test]
fn parses_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "ses",
        "report",
        "a.eml",
        "--json",
        "--notify",
        "desktop",
        "--profile-dir",
        "/tmp/ses",
        "-vv",
    ])
    .expect("cli parse should work");

    assert!(cli.json);
    assert_eq!(cli.notify, NotifyMode::Desktop);
    assert_eq!(cli.profile_dir, Some(PathBuf::from("/tmp/ses")));
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.profile, "default");
}

#[test]
fn parses_config_choose_with_and_without_path() {
    let cli = Cli::try_parse_from(["ses", "config", "choose", "ses-tb.json"])
        .expect("cli parse should work");
    match cli.command {
        Command::Config(config) => match config.command {
            ConfigCommand::Choose(choose) => {
                assert_eq!(choose.path, Some(PathBuf::from("ses-tb.json")))
            }
            _ => panic!("expected choose"),
        },
        _ => panic!("expected config command"),
    }

    let cli = Cli::try_parse_from(["ses", "config", "choose"]).expect("cli parse should work");
    match cli.command {
        Command::Config(config) => {
            assert!(matches!(config.command, ConfigCommand::Choose(ref c) if c.path.is_none()))
        }
        _ => panic!("expected config command"),
    }
}

#[test]
fn parses_config_smtp() {
    let cli = Cli::try_parse_from([
        "ses",
        "config",
        "smtp",
        "--host",
        "smtp.example.com",
        "--port",
        "465",
        "--security",
        "tls",
        "--sender",
        "analyst@example.com",
    ])
    .expect("cli parse should work");
    match cli.command {
        Command::Config(config) => match config.command {
            ConfigCommand::Smtp(smtp) => {
                assert_eq!(smtp.host.as_deref(), Some("smtp.example.com"));
                assert_eq!(smtp.port, Some(465));
                assert_eq!(smtp.security, Some(SmtpSecurity::Tls));
                assert!(!smtp.ask_password);
            }
            _ => panic!("expected smtp"),
        },
        _ => panic!("expected config command"),
    }
}

#[test]
fn rejects_unknown_notify_mode() {
    assert!(Cli::try_parse_from(["ses", "--notify", "toast", "config", "show"]).is_err());
}
