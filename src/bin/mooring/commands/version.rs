//! `mooring version` command
//!
//! Prints the tool version, then the framework and toolchain versions when
//! they can be determined. Neither of the latter is fatal, and missing
//! framework sources are never fetched.

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::ResolveArgs;
use crate::commands::resolve::report;
use mooring::core::Operation;
use mooring::ops::{declared_framework_version, find_framework};
use mooring::{GlobalContext, ResolutionContext};

pub fn execute(gctx: &GlobalContext, args: ResolveArgs, json: bool) -> Result<()> {
    let mut ctx = ResolutionContext::resolve_paths(gctx, Operation::Version, &args.import_path)?;

    if ctx.app_path.is_some() {
        let framework = find_framework(gctx, &ctx)
            .and_then(|dir| dir.map(|dir| declared_framework_version(gctx, &dir)).transpose());
        match framework {
            Ok(Some(version)) => ctx.framework_version = Some(version),
            Ok(None) => info!(
                "framework `{}` not found locally",
                gctx.config().framework_import_path()
            ),
            Err(err) => warn!("framework version unavailable: {}", err),
        }
    }

    if json {
        return report(&ctx, true);
    }

    println!("mooring {}", ctx.tool_version);
    if let Some(ref framework) = ctx.framework_version {
        println!(
            "framework {} ({})",
            framework,
            gctx.config().framework_import_path()
        );
    }

    match ctx.toolchain().command().arg("version").exec_and_check() {
        Ok(output) => print!("{}", String::from_utf8_lossy(&output.stdout)),
        Err(err) => warn!("failed to query toolchain version: {:#}", err),
    }

    Ok(())
}
