// SPDX-License-Identifier: AGPL-3.0-or-later
//! CLI command implementations

use console::style;
use dialoguer::Confirm;
use std::path::Path;
use tether_core::{TetherError, TetherResult};
use tether_engine::{ConfirmOverwrite, SyncAction, SyncEngine};

/// Overwrite guard backed by an interactive y/n prompt.
struct PromptConfirm;

impl ConfirmOverwrite for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

fn open_engine() -> TetherResult<SyncEngine> {
    let root = std::env::current_dir()?;
    SyncEngine::open(root)
}

pub async fn track_add(path: &str, source: &str) -> TetherResult<()> {
    let mut engine = open_engine()?;
    engine.track(Path::new(path), source).await?;
    println!("Tracking {} in source {}", path, style(source).green());
    Ok(())
}

pub async fn untrack(path: &str) -> TetherResult<()> {
    let mut engine = open_engine()?;
    engine.untrack(Path::new(path)).await?;
    println!("No longer tracking {path}");
    Ok(())
}

pub async fn pull(path: &str, force: bool) -> TetherResult<()> {
    let engine = open_engine()?;
    engine.pull(Path::new(path), force, &PromptConfirm).await?;
    println!("Pulled {path}");
    Ok(())
}

pub async fn push(path: &str, force: bool) -> TetherResult<()> {
    let engine = open_engine()?;
    engine.push(Path::new(path), force, &PromptConfirm).await?;
    println!("Pushed {path}");
    Ok(())
}

pub async fn sync() -> TetherResult<()> {
    let engine = open_engine()?;
    let report = engine.sync().await;

    for action in &report.actions {
        match action {
            SyncAction::Pulled(uid) => println!("PULLED \"{uid}\""),
            SyncAction::Pushed(uid) => println!("PUSHED \"{uid}\""),
            SyncAction::Failed { uid, error } => {
                eprintln!("{} \"{uid}\": {error}", style("FAILED").red());
            }
        }
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(TetherError::SyncIncomplete(report.failures()))
    }
}

pub async fn sources() -> TetherResult<()> {
    let engine = open_engine()?;

    println!("Declared sources:");
    for name in engine.registry().list() {
        if let Some(decl) = engine.registry().decl(name) {
            let capability = if decl.is_updatable() {
                style("read-write").green()
            } else {
                style("read-only").yellow()
            };
            println!("  {} ({}) - {}", name, decl.type_tag(), capability);
        }
    }

    Ok(())
}
