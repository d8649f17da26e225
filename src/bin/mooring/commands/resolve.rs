//! `mooring run|build|package|clean|test` commands
//!
//! Each resolves the application and checks framework compatibility, then
//! reports what was resolved.

use anyhow::{Context, Result};

use crate::cli::ResolveArgs;
use mooring::core::Operation;
use mooring::{resolve, GlobalContext, ResolutionContext};

pub fn execute(gctx: &GlobalContext, op: Operation, args: ResolveArgs, json: bool) -> Result<()> {
    let ctx = resolve(gctx, op, &args.import_path)?;
    report(&ctx, json)
}

/// Print a resolution to stdout.
pub fn report(ctx: &ResolutionContext, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(ctx).context("failed to serialize resolution")?;
        println!("{}", out);
    } else {
        print!("{}", summary(ctx));
    }
    Ok(())
}

/// Human-readable resolution summary.
pub fn summary(ctx: &ResolutionContext) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: &str| {
        out.push_str(&format!("{:>18}: {}\n", label, value));
    };

    line("operation", ctx.operation.as_str());
    line("import path", &ctx.import_path);
    if let Some(ref app_path) = ctx.app_path {
        line("application path", &app_path.display().to_string());
    }
    match ctx.manifest_root {
        Some(ref root) => line("workspace", &format!("module at {}", root.display())),
        None => line("workspace", "flat"),
    }
    line("toolchain", &ctx.toolchain.display().to_string());
    line("tool version", &ctx.tool_version.to_string());
    if let Some(ref framework) = ctx.framework_version {
        line("framework version", &framework.to_string());
    }
    out
}
