use anyhow::{Result, bail};
use crossterm::terminal;
use dialoguer::Confirm;

use crate::{
    app::AppContext,
    cli::args::{Cli, Command},
    domain::memo::{Category, CategoryFilter, Memo, MemoId, parse_tags},
    format::{self, MemoDetail},
    tui,
};

pub(crate) fn dispatch(app: &AppContext, cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Add {
            title,
            content,
            category,
            tags,
        }) => add_memo(app, &title, &content, &category, &tags),
        Some(Command::List { category, json }) => {
            let memos = app
                .store()
                .filter_by_category(&CategoryFilter::parse(&category));
            print_memos(&memos, json)
        }
        Some(Command::Search { query, json }) => print_memos(&app.store().search(&query), json),
        Some(Command::Show { id }) => show_memo(app, &MemoId::from(id)),
        Some(Command::Edit {
            id,
            title,
            content,
            category,
            tags,
        }) => {
            let changes = MemoChanges {
                title,
                content,
                category,
                tags,
            };
            edit_memo(app, &MemoId::from(id), changes)
        }
        Some(Command::Delete { id, yes }) => delete_memo(app, &MemoId::from(id), yes),
        Some(Command::Clear { yes }) => clear_memos(app, yes),
        Some(Command::Seed) => {
            app.store().seed_if_empty();
            Ok(())
        }
        Some(Command::Version) => {
            println!("memo {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => match cli.content.as_deref() {
            Some(title) => add_memo(app, title, "", Category::Other.as_str(), &[]),
            None => tui::run_tui(app.store()),
        },
    }
}

fn add_memo(
    app: &AppContext,
    title: &str,
    content: &str,
    category: &str,
    tags: &[String],
) -> Result<()> {
    let memo = Memo::draft(title, content, category, collect_tags(tags));
    match app.store().insert(&memo) {
        Some(stored) => {
            println!("{}", stored.id);
            Ok(())
        }
        None => bail!("memo was not saved; see the log for details"),
    }
}

fn print_memos(memos: &[Memo], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(memos)?);
        return Ok(());
    }

    let terminal_width = terminal::size()
        .map(|(width, _)| width as usize)
        .unwrap_or(80);
    for memo in memos {
        let display_time = format::format_display_time(&memo.created_at);
        let label = Category::display_for(&memo.category).label();
        let line = format::format_memo_line(&display_time, label, &memo.title, terminal_width);
        println!("{}", line);
    }
    Ok(())
}

fn show_memo(app: &AppContext, id: &MemoId) -> Result<()> {
    let Some(memo) = app.store().get_by_id(id) else {
        bail!("memo {id} not found");
    };

    let detail = MemoDetail::new(&memo);
    println!("{}", detail.title);
    println!("[{}]  {}", detail.category.label(), detail.timestamps().join("  "));
    println!();
    println!("{}", memo.content);
    if !detail.tags.is_empty() {
        println!();
        println!("{}", detail.tags.join(" "));
    }
    Ok(())
}

struct MemoChanges {
    title: Option<String>,
    content: Option<String>,
    category: Option<String>,
    tags: Option<Vec<String>>,
}

fn edit_memo(app: &AppContext, id: &MemoId, changes: MemoChanges) -> Result<()> {
    let Some(current) = app.store().get_by_id(id) else {
        bail!("memo {id} not found");
    };

    let revised = current.revised(
        changes.title.unwrap_or_else(|| current.title.clone()),
        changes.content.unwrap_or_else(|| current.content.clone()),
        changes.category.unwrap_or_else(|| current.category.clone()),
        changes
            .tags
            .map(|tags| collect_tags(&tags))
            .unwrap_or_else(|| current.tags.clone()),
    );
    match app.store().update(&revised) {
        Some(stored) => {
            println!("{}", stored.id);
            Ok(())
        }
        None => bail!("memo {id} was not updated; see the log for details"),
    }
}

fn delete_memo(app: &AppContext, id: &MemoId, yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Delete memo {id}?"))? {
        return Ok(());
    }
    if !app.store().delete(id) {
        bail!("memo {id} was not deleted; see the log for details");
    }
    Ok(())
}

fn clear_memos(app: &AppContext, yes: bool) -> Result<()> {
    if !yes && !confirm("Delete every memo?")? {
        return Ok(());
    }
    if !app.store().clear_all() {
        bail!("memos were not cleared; see the log for details");
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

fn collect_tags(values: &[String]) -> Vec<String> {
    values.iter().flat_map(|value| parse_tags(value)).collect()
}
