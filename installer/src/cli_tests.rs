//! Tests for installer CLI parsing and default behaviours.

use super::*;
use rstest::rstest;

#[test]
fn cli_parses_defaults() {
    let cli = Cli::parse_from(["basecut-installer"]);
    assert!(cli.command.is_none());
    assert!(cli.install.bin_dir.is_none());
    assert!(cli.install.release.is_none());
    assert!(cli.install.os.is_none());
    assert!(cli.install.arch.is_none());
    assert!(cli.install.manifest.is_none());
    assert!(!cli.install.skip_self_check);
    assert!(!cli.install.dry_run);
    assert_eq!(cli.install.verbosity, 0);
    assert!(!cli.install.quiet);
}

#[test]
fn cli_parses_bin_dir() {
    let cli = Cli::parse_from(["basecut-installer", "-b", "/usr/local/bin"]);
    assert_eq!(
        cli.install.bin_dir,
        Some(Utf8PathBuf::from("/usr/local/bin"))
    );
}

#[rstest]
#[case::plain("0.2.0", "0.2.0")]
#[case::tag_prefix("v0.2.0", "0.2.0")]
fn cli_parses_release(#[case] arg: &str, #[case] expected: &str) {
    let cli = Cli::parse_from(["basecut-installer", "--release", arg]);
    let release = cli.install.release.expect("release set");
    assert_eq!(release.as_str(), expected);
}

#[test]
fn cli_rejects_invalid_release() {
    let result = Cli::try_parse_from(["basecut-installer", "--release", "latest"]);
    assert!(result.is_err());
}

#[test]
fn cli_parses_platform_overrides() {
    let cli = Cli::parse_from(["basecut-installer", "--os", "macos", "--arch", "arm64"]);
    assert_eq!(cli.install.os.as_deref(), Some("macos"));
    assert_eq!(cli.install.arch.as_deref(), Some("arm64"));
}

#[test]
fn cli_parses_manifest_and_skip_self_check() {
    let cli = Cli::parse_from([
        "basecut-installer",
        "--manifest",
        "checksums.toml",
        "--skip-self-check",
    ]);
    assert_eq!(
        cli.install.manifest,
        Some(Utf8PathBuf::from("checksums.toml"))
    );
    assert!(cli.install.skip_self_check);
}

#[test]
fn cli_parses_install_subcommand() {
    let cli = Cli::parse_from(["basecut-installer", "install", "--dry-run"]);
    match &cli.command {
        Some(Command::Install(args)) => assert!(args.dry_run),
        _ => panic!("expected Install command"),
    }
    assert!(cli.install_args().dry_run);
}

#[test]
fn cli_parses_assets_subcommand() {
    let cli = Cli::parse_from(["basecut-installer", "assets", "--json", "--release", "0.1.0"]);
    match cli.command {
        Some(Command::Assets(args)) => {
            assert!(args.json);
            assert_eq!(args.release.map(|r| r.as_str().to_owned()).as_deref(), Some("0.1.0"));
        }
        _ => panic!("expected Assets command"),
    }
}

#[test]
fn cli_parses_status_subcommand() {
    let cli = Cli::parse_from(["basecut-installer", "status", "--json"]);
    assert!(matches!(cli.command, Some(Command::Status(StatusArgs { json: true }))));
}

#[rstest]
#[case::single("-v", 1)]
#[case::double("-vv", 2)]
#[case::long("--verbose", 1)]
fn cli_counts_verbosity(#[case] flag: &str, #[case] expected: u8) {
    let cli = Cli::parse_from(["basecut-installer", flag]);
    assert_eq!(cli.install.verbosity, expected);
}

#[test]
fn cli_rejects_quiet_with_verbose() {
    let result = Cli::try_parse_from(["basecut-installer", "-q", "-v"]);
    assert!(result.is_err());
}

#[test]
fn install_args_prefers_subcommand_arguments() {
    let cli = Cli::parse_from(["basecut-installer", "install", "--os", "linux"]);
    assert_eq!(cli.install_args().os.as_deref(), Some("linux"));
    assert!(cli.install.os.is_none());
}

#[test]
fn install_request_uses_overrides() {
    let args = InstallArgs {
        os: Some("macos".to_owned()),
        arch: Some("amd64".to_owned()),
        release: Some(ReleaseVersion::try_from("0.3.1").expect("valid")),
        skip_self_check: true,
        quiet: true,
        ..InstallArgs::default()
    };

    let request = args.install_request(Utf8PathBuf::from("/opt/bin"), None);

    assert_eq!(request.os, "macos");
    assert_eq!(request.arch, "amd64");
    assert_eq!(request.version.as_str(), "0.3.1");
    assert_eq!(request.bin_dir, Utf8PathBuf::from("/opt/bin"));
    assert!(request.skip_self_check);
    assert!(request.quiet);
}

#[test]
fn install_request_defaults_to_host() {
    let request = InstallArgs::default().install_request(Utf8PathBuf::from("/opt/bin"), None);
    let (os, arch) = host_names();
    assert_eq!(request.os, os);
    assert_eq!(request.arch, arch);
    assert_eq!(request.version, ReleaseVersion::current());
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
