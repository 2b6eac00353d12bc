//! `placemerge merge` / `placemerge validate` - config-driven registry merge.

use std::path::{Path, PathBuf};

use placemerge_geo::{within_boundary, within_radius};
use placemerge_io::{load_new, load_old, read_table, write_registry};
use placemerge_recon::{exclude_types, MatchStrategy, MergeConfig, MergeInput};

use crate::filter::{load_boundary, load_points};
use crate::CliError;

fn load_config(config_path: &Path) -> Result<MergeConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        CliError::usage(format!("cannot read config {}: {e}", config_path.display()))
    })?;
    MergeConfig::from_toml(&config_str).map_err(|e| CliError::config(e.to_string()))
}

/// Relative paths in a config resolve against the config file's directory.
fn base_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new("."))
}

/// Load both collections and apply the configured pre-filters.
fn load_input(config: &MergeConfig, base_dir: &Path) -> Result<MergeInput, CliError> {
    let old_table = read_table(&base_dir.join(&config.old.file), config.old.sheet.as_deref())?;
    let new_table = read_table(&base_dir.join(&config.new.file), config.new.sheet.as_deref())?;
    let mut old = load_old(&old_table, &config.old.columns)?;
    let mut new = load_new(&new_table, &config.new.columns)?;

    if let Some(ref filter) = config.filter {
        if let Some(ref radius) = filter.radius {
            let points = load_points(&base_dir.join(&radius.points), "latitude", "longitude")?;
            old = within_radius(old, &points, radius.meters);
            new = within_radius(new, &points, radius.meters);
        }
        if let Some(ref boundary) = filter.boundary {
            let boundary = load_boundary(&base_dir.join(boundary))?;
            old = within_boundary(old, &boundary);
            new = within_boundary(new, &boundary);
        }
        new = exclude_types(new, &filter.exclude_types);
    }

    Ok(MergeInput { old, new })
}

pub fn cmd_merge(
    config_path: PathBuf,
    strategy: Option<MatchStrategy>,
    output: Option<PathBuf>,
    json_output: bool,
) -> Result<(), CliError> {
    let mut config = load_config(&config_path)?;
    if let Some(strategy) = strategy {
        config.strategy = strategy;
    }

    let base_dir = base_dir(&config_path);
    let input = load_input(&config, base_dir)?;

    let result =
        placemerge_recon::run(&config, &input).map_err(|e| CliError::engine(e.to_string()))?;

    let output_file = output.or_else(|| config.output.file.as_ref().map(|f| base_dir.join(f)));
    if let Some(ref path) = output_file {
        write_registry(&result, path).map_err(|e| CliError::output(e.to_string()))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::engine(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else if output_file.is_none() {
        log::warn!("no registry written: pass --output, set [output] file, or use --json");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "merge '{}' ({}): {} records, {} matched, {} old-only, {} new-only",
        result.meta.config_name,
        result.meta.strategy,
        s.total,
        s.matched,
        s.old_only,
        s.new_only,
    );

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;

    let mut filters = Vec::new();
    if let Some(ref filter) = config.filter {
        if let Some(ref radius) = filter.radius {
            filters.push(format!("radius {} m around {}", radius.meters, radius.points));
        }
        if let Some(ref boundary) = filter.boundary {
            filters.push(format!("boundary {boundary}"));
        }
        if !filter.exclude_types.is_empty() {
            filters.push(format!("exclude types {}", filter.exclude_types.join(", ")));
        }
    }

    eprintln!(
        "valid: '{}' ({} strategy), old: {}, new: {}{}",
        config.name,
        config.strategy,
        config.old.file,
        config.new.file,
        if filters.is_empty() {
            String::new()
        } else {
            format!(", filters: {}", filters.join("; "))
        },
    );
    Ok(())
}
