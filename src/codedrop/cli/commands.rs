//! # Command Handlers
//!
//! `run()` parses arguments, installs logging, builds the context and
//! dispatches to one `handle_*` function per subcommand. Handlers call the
//! API facade and print what comes back; business rules stay in the library.

use super::render::{print_messages, render_file_list, render_info, render_text_list};
use super::setup::{init_logging, Cli, Commands};
use chrono::Utc;
use clap::Parser;
use codedrop::api::{CodedropApi, ConfigAction};
use codedrop::error::{CodedropError, Result};
use codedrop::init::{initialize, resolve_home, HOME_ENV};
use codedrop::store::fs::JsonFileBackend;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

struct AppContext {
    api: CodedropApi<JsonFileBackend>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = resolve_home(&cwd, cli.dir.clone(), std::env::var_os(HOME_ENV));
    let ctx = AppContext {
        api: initialize(home).api,
    };

    let outcome = match cli.command {
        Some(Commands::Upload { path, name }) => handle_upload(&ctx, &path, name),
        Some(Commands::Download {
            code,
            output,
            force,
        }) => handle_download(&ctx, &code, output, force, &cwd),
        Some(Commands::Info { code }) => handle_info(&ctx, &code),
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::Delete { code }) => handle_delete(&ctx, &code),
        Some(Commands::Doctor) => handle_doctor(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
    };

    ctx.api.close();
    outcome
}

fn handle_upload(ctx: &AppContext, path: &Path, name: Option<String>) -> Result<()> {
    let result = if path == Path::new("-") {
        let name = name.ok_or(CodedropError::EmptyInput)?;
        ctx.api.upload(&name, &mut io::stdin().lock())?
    } else {
        let name = name
            .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_default();
        let mut file = File::open(path)?;
        ctx.api.upload(&name, &mut file)?
    };

    print_messages(&result.messages);
    Ok(())
}

fn handle_download(
    ctx: &AppContext,
    code: &str,
    output: Option<PathBuf>,
    force: bool,
    cwd: &Path,
) -> Result<()> {
    let dest = output.unwrap_or_else(|| cwd.to_path_buf());
    let result = ctx.api.download(code, &dest, force)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_info(ctx: &AppContext, code: &str) -> Result<()> {
    let result = ctx.api.info(code)?;
    if let Some(info) = &result.info {
        print!("{}", render_info(info));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list()?;
    print!("{}", render_file_list(&result.listed_files, Utc::now()));
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &AppContext, code: &str) -> Result<()> {
    let result = ctx.api.delete(code)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let show_all = key.is_none();
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if show_all {
        let lines: Vec<String> = result
            .config
            .iter()
            .flat_map(|config| config.list_all())
            .map(|(k, v)| format!("{} = {}", k, v))
            .collect();
        print!("{}", render_text_list(&lines, "No configuration values."));
    }
    print_messages(&result.messages);
    Ok(())
}
