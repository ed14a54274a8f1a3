use crate::config::Config;
use anyhow::Result;
use clap::Args;
use quire_editor::{deep_link, BlockId};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct LinkArgs {
    /// Document id
    pub document: String,

    /// Block to link to
    pub block: String,

    /// Configuration file (defaults to quire.config.json in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn link(args: LinkArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd, args.config.as_deref())?;
    let url = config.editor.document_url(&args.document);
    println!("{}", deep_link(&url, &BlockId::from(args.block)));
    Ok(())
}
