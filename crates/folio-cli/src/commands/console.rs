use anyhow::Result;
use folio_core::{ConsoleEvent, EventKind, Portfolio, expand_home};
use folio_ui::{
    FileDownloader, KeyBindings, PortfolioShell, RandomSource, Resolution, load_keybindings,
    resolve, run_portfolio_shell,
};
use serde_json::json;
use std::time::Duration;

use crate::ExecArgs;
use crate::context::AppContext;
use crate::output::{print_json, print_lines};

pub(crate) fn run_shell(ctx: &AppContext) -> Result<()> {
    let keybindings_path = expand_home(&ctx.cfg.ui.keybindings_path);
    let bindings = if keybindings_path.exists() {
        load_keybindings(&keybindings_path).unwrap_or_else(|err| {
            ctx.observer.warn_log(&format!(
                "ignoring {}: {err}",
                keybindings_path.display()
            ));
            KeyBindings::default()
        })
    } else {
        KeyBindings::default()
    };

    let mut prefs = ctx.preferences();
    if let Some(language) = ctx.language_override() {
        prefs.set_language(language)?;
    }
    let mut shell = PortfolioShell::new(
        &ctx.cfg,
        prefs,
        Portfolio::embedded()?,
        bindings,
        Box::new(FileDownloader::from_config(&ctx.cfg.cv, ctx.workspace())),
        Box::new(RandomSource::from_entropy()),
    );
    run_portfolio_shell(
        &mut shell,
        Duration::from_millis(ctx.cfg.ui.tick_ms),
        |event| ctx.record(event),
    )
}

pub(crate) fn run_exec(ctx: &AppContext, args: ExecArgs) -> Result<()> {
    let raw = args.words.join(" ");
    let t = ctx.translator();

    if raw.trim().is_empty() {
        if ctx.json {
            print_json(&json!({ "command": raw, "control": "ignored", "lines": [] }))?;
        }
        return Ok(());
    }

    let resolution = resolve(&raw, &t);
    let (control, lines) = match &resolution {
        Resolution::Lines(lines) => (None, lines.clone()),
        Resolution::Clear => (Some("clear"), vec![t.t("cli.terminalCleared").to_string()]),
        Resolution::Exit => (Some("exit"), Vec::new()),
    };
    ctx.record(&ConsoleEvent::new(
        EventKind::CommandSubmitted,
        json!({ "command": raw.trim().to_lowercase(), "lines": lines.len() }),
    ));

    if ctx.json {
        print_json(&json!({
            "command": raw,
            "control": control,
            "lines": lines,
        }))?;
    } else {
        print_lines(&lines);
    }
    Ok(())
}
