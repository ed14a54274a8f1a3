use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use quire_editor::{Block, BlockKind};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Documents directory
    #[arg(short, long, default_value = "docs")]
    pub docs_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Quire workspace...".bright_blue().bold());

    let docs_dir = PathBuf::from(cwd).join(&args.docs_dir);
    if !docs_dir.exists() {
        fs::create_dir_all(&docs_dir)?;
        println!("  {} Created {}/", "✓".green(), args.docs_dir);
    }

    let welcome = docs_dir.join("welcome.json");
    if !welcome.exists() {
        let blocks = vec![
            Block::new(BlockKind::Heading1, "Welcome"),
            Block::text("Type / for block types, or start a line with # or - ."),
            Block::new(BlockKind::Toggle, "Shortcuts").with_children(vec![
                Block::new(BlockKind::BulletItem, "Mod+D duplicates a block"),
                Block::new(BlockKind::BulletItem, "Mod+Shift+Up/Down moves it"),
            ]),
            Block::new(BlockKind::Todo, "Try the replay command"),
        ];
        fs::write(&welcome, serde_json::to_string_pretty(&blocks)?)?;
        println!("  {} Created {}/welcome.json", "✓".green(), args.docs_dir);
    }

    let config = Config {
        docs_dir: args.docs_dir,
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "✨ Ready".green().bold());
    Ok(())
}
