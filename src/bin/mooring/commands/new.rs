//! `mooring new` command

use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::NewArgs;
use crate::commands::resolve::report;
use mooring::core::Operation;
use mooring::util::fs::ensure_dir;
use mooring::{resolve, GlobalContext};

/// Validates that the target directory doesn't already exist or is empty.
///
/// Returns Ok(()) if the path is suitable for a new application.
pub fn validate_project_path(path: &Path) -> Result<(), String> {
    if path.exists() {
        if path.is_file() {
            return Err(format!(
                "destination `{}` already exists and is a file",
                path.display()
            ));
        }

        // Check if directory is non-empty
        if let Ok(entries) = std::fs::read_dir(path) {
            if entries.count() > 0 {
                return Err(format!(
                    "destination `{}` already exists and is not empty",
                    path.display()
                ));
            }
        }
    }

    Ok(())
}

pub fn execute(gctx: &GlobalContext, args: NewArgs, json: bool) -> Result<()> {
    let ctx = resolve(gctx, Operation::New, &args.import_path)?;
    let Some(ref app_path) = ctx.app_path else {
        bail!("no application path resolved for `{}`", ctx.import_path);
    };

    if let Err(message) = validate_project_path(app_path) {
        bail!(message);
    }
    ensure_dir(app_path)?;

    if json {
        report(&ctx, true)?;
    } else {
        eprintln!(
            "     Created application `{}` at {}",
            ctx.import_path,
            app_path.display()
        );
    }

    Ok(())
}
