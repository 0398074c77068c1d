use std::sync::LazyLock;
use regex::Regex;
use tracing::{debug, info};
use crate::context::Context;
use crate::error::{InstallRunError, Result};
use crate::npmrc::sync_npmrc;
use crate::paths::{ensure_and_join_path, rush_config_folder};
use crate::process::{Invocation, ProcessRunner, StdioMode};
use crate::specifier::PackageSpecifier;
use std::path::Path;

static VIEW_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+\s'(.+)'$").expect("npm view line pattern is valid"));

/// Version used when the specifier doesn't name one.
pub const LATEST_VERSION: &str = "*";

/// Returns `true` if `version` only contains characters found in static version
/// specifiers (`A-Z`, `a-z`, `0-9`, `-`, `+`, `.`), so it can be used without asking
/// the registry. Anything else (`^1.0.0`, `>=2 <3`, `*`) is a range.
pub fn is_static_version(version: &str) -> bool {
    !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.'))
}

/// Resolves the specifier's version (or range) to a static version.
///
/// Static versions are returned unchanged without running anything. Ranges are
/// resolved with `npm view <name>@<range> version`, run from `<common>/temp` after
/// syncing the project's `.npmrc` there.
///
/// # Errors
/// Every failure is reported as [`InstallRunError::Resolution`] naming the package and range.
pub fn resolve_package_version<R: ProcessRunner>(
    ctx: &Context<R>,
    common_folder: &Path,
    specifier: &PackageSpecifier,
) -> Result<String> {
    let version = specifier.version.as_deref().unwrap_or(LATEST_VERSION);
    if is_static_version(version) {
        debug!(name = %specifier.name, version, "static version, skipping registry query");
        return Ok(version.to_string());
    }

    query_registry(ctx, common_folder, &specifier.name, version).map_err(|e| {
        InstallRunError::Resolution {
            name: specifier.name.clone(),
            version: version.to_string(),
            reason: match e {
                InstallRunError::Resolution { reason, .. } => reason,
                other => other.to_string(),
            },
        }
    })
}

fn query_registry<R: ProcessRunner>(
    ctx: &Context<R>,
    common_folder: &Path,
    name: &str,
    version: &str,
) -> Result<String> {
    let temp_folder = ensure_and_join_path(common_folder, &["temp"])?;
    sync_npmrc(rush_config_folder(common_folder), &temp_folder)?;

    let npm = ctx.package_manager()?;
    info!(name, version, "querying registry for matching versions");
    let invocation = Invocation::new(npm, &temp_folder, StdioMode::Captured).args([
        "view".to_string(),
        format!("{name}@{version}"),
        "version".to_string(),
        "--no-update-notifier".to_string(),
    ]);
    let completion = ctx
        .runner()
        .run(&invocation)
        .map_err(|e| resolution_reason(name, version, e.to_string()))?;
    if !completion.success() {
        return Err(resolution_reason(
            name,
            version,
            format!("\"npm view\" returned error code {}", completion.status_display()),
        ));
    }
    parse_view_output(&completion.stdout).map_err(|reason| resolution_reason(name, version, reason))
}

fn resolution_reason(name: &str, version: &str, reason: String) -> InstallRunError {
    InstallRunError::Resolution {
        name: name.to_string(),
        version: version.to_string(),
        reason,
    }
}

/// Extracts the version from the last line of `npm view <spec> version` output.
///
/// The output looks like:
/// ```text
/// @microsoft/rush@3.0.0 '3.0.0'
/// @microsoft/rush@3.0.1 '3.0.1'
/// ```
/// A single match is printed as a bare version (`3.0.1`) by some npm releases, which
/// does not match the expected pattern and is rejected.
pub fn parse_view_output(stdout: &str) -> std::result::Result<String, String> {
    let latest = stdout
        .split('\n')
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .next_back()
        .ok_or_else(|| "No versions found for the specified version range.".to_string())?;

    VIEW_LINE
        .captures(latest)
        .map(|captures| captures[1].to_string())
        .ok_or_else(|| format!("Invalid npm output {latest}"))
}
