use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use quire_editor::Page;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Directory or file to check (defaults to the configured docs directory)
    pub path: Option<PathBuf>,
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd, None)?;
    let root = args.path.unwrap_or_else(|| config.get_docs_dir(cwd));

    if !root.exists() {
        return Err(anyhow!("Path does not exist: {}", root.display()));
    }

    println!("{}", "🔍 Checking documents...".bright_blue().bold());

    let documents = find_documents(&root);
    if documents.is_empty() {
        println!("{}", "⚠️  No .json documents found".yellow());
        return Ok(());
    }

    let mut error_count = 0;
    for document in &documents {
        let relative_path = document.strip_prefix(&root).unwrap_or(document);
        match check_file(document) {
            Ok(blocks) => println!("  {} {} ({} blocks)", "✓".green(), relative_path.display(), blocks),
            Err(e) => {
                error_count += 1;
                eprintln!("  {} {} - {}", "✗".red(), relative_path.display(), e.to_string().red());
            }
        }
    }

    println!();
    if error_count == 0 {
        println!("{} {} documents are valid", "✅".green(), documents.len());
        Ok(())
    } else {
        Err(anyhow!("{} of {} documents are invalid", error_count, documents.len()))
    }
}

fn find_documents(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .filter(|path| path.file_name().and_then(|s| s.to_str()) != Some(DEFAULT_CONFIG_NAME))
        .collect()
}

/// Number of blocks in a valid document
fn check_file(path: &Path) -> Result<usize> {
    let source = fs::read_to_string(path)?;
    let page = Page::from_json(&source)?;
    page.validate()?;
    Ok(page.len())
}
