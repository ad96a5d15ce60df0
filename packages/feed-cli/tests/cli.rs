use clap::Parser;
use feed_cli::{Cli, Commands, Config};

#[test]
fn parses_feed_command() {
    let cli = Cli::try_parse_from(["pinfeed", "feed", "--pages", "3", "--json"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Feed {
            pages: 3,
            json: true
        }
    );
}

#[test]
fn feed_defaults_to_one_page() {
    let cli = Cli::try_parse_from(["pinfeed", "feed"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Feed {
            pages: 1,
            json: false
        }
    );
}

#[test]
fn show_id_is_optional() {
    let cli = Cli::try_parse_from(["pinfeed", "show", "237"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Show {
            id: Some("237".into()),
            json: false
        }
    );

    let cli = Cli::try_parse_from(["pinfeed", "show"]).unwrap();
    assert!(matches!(cli.command, Commands::Show { id: None, .. }));
}

#[test]
fn flags_override_environment() {
    let cli = Cli::try_parse_from([
        "pinfeed",
        "feed",
        "--base-url",
        "http://localhost:9000",
        "--page-size",
        "25",
        "--width",
        "320",
        "--seed",
        "7",
    ])
    .unwrap();

    let config = cli.apply(Config::default());

    assert_eq!(config.picsum_base_url, "http://localhost:9000");
    assert_eq!(config.page_size, 25);
    assert_eq!(config.image_width, 320);
    assert_eq!(config.prefetch_distance, Config::default().prefetch_distance);
    assert_eq!(cli.seed, Some(7));
}

#[test]
fn unset_flags_keep_environment() {
    let cli = Cli::try_parse_from(["pinfeed", "show", "1"]).unwrap();
    let env = Config {
        page_size: 12,
        ..Config::default()
    };

    assert_eq!(cli.apply(env.clone()), env);
}

#[test]
fn rejects_unknown_command() {
    assert!(Cli::try_parse_from(["pinfeed", "upload"]).is_err());
}
