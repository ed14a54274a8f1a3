use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use quire_editor::{BlockId, BlockKind, Page};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct OutlineArgs {
    /// Document JSON file
    pub document: PathBuf,

    /// Show block ids
    #[arg(long)]
    pub ids: bool,

    /// Expand closed toggles
    #[arg(short, long)]
    pub all: bool,
}

pub fn outline(args: OutlineArgs) -> Result<()> {
    let source = fs::read_to_string(&args.document)
        .with_context(|| format!("Cannot read {}", args.document.display()))?;
    let page = Page::from_json(&source)?;

    let mut lines = Vec::new();
    for root in page.roots() {
        render(&page, root, 0, &args, &mut lines);
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn render(page: &Page, id: &BlockId, depth: usize, args: &OutlineArgs, lines: &mut Vec<String>) {
    let Some(node) = page.get(id) else {
        return;
    };

    let marker = match node.kind {
        BlockKind::Todo if node.checked => "[x]".green().to_string(),
        BlockKind::Todo => "[ ]".to_string(),
        BlockKind::Toggle if node.toggle_open => "▾".to_string(),
        BlockKind::Toggle => "▸".to_string(),
        BlockKind::BulletItem => "•".to_string(),
        kind => kind.label().dimmed().to_string(),
    };

    let content = match node.kind {
        BlockKind::Heading1 | BlockKind::Heading2 | BlockKind::Heading3 => node.content.bold().to_string(),
        BlockKind::Code => node.content.replace('\n', " ⏎ ").cyan().to_string(),
        BlockKind::Divider => "───".dimmed().to_string(),
        _ => node.content.clone(),
    };

    let mut line = format!("{}{} {}", "  ".repeat(depth), marker, content);
    if args.ids {
        line.push_str(&format!("  {}", id.as_str().dimmed()));
    }
    lines.push(line);

    let hidden = node.kind == BlockKind::Toggle && !node.toggle_open && !args.all;
    if hidden {
        if !node.children.is_empty() {
            let note = format!("({} hidden)", node.children.len());
            lines.push(format!("{}{}", "  ".repeat(depth + 1), note.dimmed()));
        }
        return;
    }
    for child in &node.children {
        render(page, child, depth + 1, args, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_editor::Block;

    #[test]
    fn test_closed_toggle_is_collapsed() {
        colored::control::set_override(false);
        let mut page = Page::from_blocks(vec![Block::new(BlockKind::Toggle, "More")
            .with_id("t")
            .with_children(vec![Block::text("inside"), Block::text("also")])])
        .unwrap();
        page.get_mut(&"t".into()).unwrap().toggle_open = false;

        let args = OutlineArgs {
            document: PathBuf::new(),
            ids: false,
            all: false,
        };
        let mut lines = Vec::new();
        render(&page, &"t".into(), 0, &args, &mut lines);
        assert_eq!(lines, vec!["▸ More", "  (2 hidden)"]);

        let args = OutlineArgs { all: true, ..args };
        let mut lines = Vec::new();
        render(&page, &"t".into(), 0, &args, &mut lines);
        assert_eq!(lines.len(), 3);
    }
}
