//! basecut installer CLI entrypoint.
//!
//! This binary downloads the prebuilt `basecut` executable for the current
//! platform, verifies it, installs it, and smoke tests it. After
//! installation it prints shell configuration snippets when the bin
//! directory is not on `PATH`.

use basecut_installer::assets_output::{format_human, format_json};
use basecut_installer::cli::{AssetsArgs, Cli, Command, InstallArgs, StatusArgs};
use basecut_installer::dirs::{BaseDirs, SystemBaseDirs};
use basecut_installer::error::{InstallerError, Result};
use basecut_installer::install_flow::{record_receipt, report_install, resolve_bin_dir};
use basecut_installer::output::{DryRunInfo, write_stderr_line};
use basecut_installer::pipeline::{asset_table, load_manifest, resolve_asset, run_install};
use basecut_installer::receipt::{ReceiptError, read_receipt};
use basecut_installer::release::asset::resolve;
use basecut_installer::release::manifest::ChecksumManifest;
use basecut_installer::release::platform::Platform;
use camino::Utf8Path;
use clap::Parser;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let system_dirs = SystemBaseDirs::new();
    let dirs = system_dirs.as_ref().map(|d| d as &dyn BaseDirs);

    match &cli.command {
        Some(Command::Assets(args)) => run_assets(args, stdout),
        Some(Command::Status(args)) => run_status(args, dirs, stdout),
        Some(Command::Install(_)) | None => run_install_command(cli.install_args(), dirs, stderr),
    }
}

/// Installs basecut, or shows what would be installed in dry-run mode.
fn run_install_command(
    args: &InstallArgs,
    dirs: Option<&dyn BaseDirs>,
    stderr: &mut dyn Write,
) -> Result<()> {
    // Unsupported platforms are rejected before touching the filesystem.
    let (os, arch) = args.platform_names();
    resolve(&os, &arch, &args.release_version())?;

    let bin_dir = resolve_bin_dir(args.bin_dir.as_deref(), dirs)?;
    let manifest = load_optional_manifest(args.manifest.as_deref())?;
    let request = args.install_request(bin_dir, manifest);

    // Dry-run mode: resolve only, no network or filesystem side effects
    if args.dry_run {
        let asset = resolve_asset(&request)?;
        let info = DryRunInfo {
            asset: &asset,
            bin_dir: &request.bin_dir,
            manifest: args.manifest.as_deref(),
            skip_self_check: request.skip_self_check,
        };
        write_stderr_line(stderr, info.display_text());
        return Ok(());
    }

    let report = run_install(&request, stderr)?;
    record_receipt(&report, dirs, args.quiet, stderr);
    report_install(&report, args.verbosity, args.quiet, stderr);
    Ok(())
}

/// Prints the release asset table.
fn run_assets(args: &AssetsArgs, stdout: &mut dyn Write) -> Result<()> {
    let manifest = load_optional_manifest(args.manifest.as_deref())?;
    let release = args.release.clone().unwrap_or_default();
    let table = asset_table(&release, manifest.as_ref())?;
    let host = Platform::detect().ok();

    let output = if args.json {
        format_json(&table, host)
    } else {
        format_human(&table, host)
    };
    write_stdout(stdout, output)
}

/// Prints the last install receipt.
fn run_status(
    args: &StatusArgs,
    dirs: Option<&dyn BaseDirs>,
    stdout: &mut dyn Write,
) -> Result<()> {
    let dirs = dirs.ok_or(ReceiptError::MissingDataDirectory)?;
    let receipt = read_receipt(dirs)?;

    let output = if args.json {
        serde_json::to_string_pretty(&receipt).unwrap_or_else(|_| "{}".to_owned())
    } else {
        receipt.summary()
    };
    write_stdout(stdout, output)
}

fn load_optional_manifest(path: Option<&Utf8Path>) -> Result<Option<ChecksumManifest>> {
    path.map(load_manifest).transpose()
}

fn write_stdout(stdout: &mut dyn Write, output: impl std::fmt::Display) -> Result<()> {
    writeln!(stdout, "{output}").map_err(|source| InstallerError::WriteFailed { source })
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}
