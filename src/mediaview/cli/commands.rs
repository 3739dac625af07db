use super::render::{
    render_bulk_form, render_config, render_fields, render_messages, render_pagination,
    render_record, render_table,
};
use super::setup::{Cli, Commands, ListArgs, OutputFormat};
use clap::Parser;
use mediaview::api::{parse_filter, parse_sort, MediaApi};
use mediaview::commands::CmdResult;
use mediaview::config::MediaViewConfig;
use mediaview::error::{MediaError, Result};
use mediaview::fields::media_fields;
use mediaview::source::fs::JsonFileSource;
use mediaview::view::{PaginationInfo, ViewResult, ViewSpec};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

struct AppContext {
    api: MediaApi<JsonFileSource>,
    color: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = MediaViewConfig::load(cli.config.as_deref())?;
    if let Some(file) = &cli.file {
        config.media_file = Some(file.clone());
    }
    let color = !cli.no_color && console::colors_enabled();
    debug!(media_file = ?config.media_file, "configuration loaded");

    // These do not need a media source.
    match &cli.command {
        Some(Commands::Config { template }) => return handle_config(&config, *template),
        Some(Commands::Fields) if config.media_file.is_none() => {
            print!("{}", render_fields(&media_fields(), color));
            return Ok(());
        }
        _ => {}
    }

    let mut ctx = init_context(config, color)?;
    let failed = match cli.command {
        Some(Commands::List(args)) => handle_list(&ctx, &args)?,
        Some(Commands::Show { id, output }) => handle_show(&ctx, id, output)?,
        Some(Commands::Edit { id, assignments }) => handle_edit(&mut ctx, id, &assignments)?,
        Some(Commands::BulkEdit { ids, assignments }) => {
            handle_bulk_edit(&mut ctx, &ids, &assignments)?
        }
        Some(Commands::Validate { id }) => handle_validate(&ctx, id)?,
        Some(Commands::Fields) => {
            print!("{}", render_fields(ctx.api.fields(), ctx.color));
            false
        }
        Some(Commands::Config { .. }) => false,
        None => handle_list(&ctx, &ListArgs::default())?,
    };

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

/// Logs go to stderr. `MEDIAVIEW_LOG` takes an `EnvFilter` directive;
/// otherwise `-v` selects debug and the default is warnings only.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("MEDIAVIEW_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(config: MediaViewConfig, color: bool) -> Result<AppContext> {
    let path = config.media_file.clone().ok_or_else(|| {
        MediaError::Api(
            "No media file configured: pass --file or set media_file in mediaview.toml"
                .to_string(),
        )
    })?;
    let api = MediaApi::new(JsonFileSource::new(path), config)?;
    Ok(AppContext { api, color })
}

fn build_view(ctx: &AppContext, args: &ListArgs) -> Result<ViewSpec> {
    let mut view = match &args.view {
        Some(path) => load_view(path)?,
        None => ctx.api.default_view(),
    };
    if let Some(search) = &args.search {
        view.search = search.clone();
    }
    for filter in &args.filters {
        view.filters.push(parse_filter(filter)?);
    }
    if let Some(sort) = &args.sort {
        view.sort = Some(parse_sort(sort)?);
    }
    if let Some(page) = args.page {
        view.page = page;
    }
    if let Some(per_page) = args.per_page {
        view.per_page = per_page;
    }
    if !args.fields.is_empty() {
        view.fields = args.fields.clone();
    }
    Ok(view)
}

fn load_view(path: &Path) -> Result<ViewSpec> {
    let content = std::fs::read_to_string(path).map_err(MediaError::Io)?;
    serde_json::from_str(&content)
        .map_err(|e| MediaError::InvalidView(format!("{}: {}", path.display(), e)))
}

fn handle_list(ctx: &AppContext, args: &ListArgs) -> Result<bool> {
    let view = build_view(ctx, args)?;
    let result = ctx.api.list(&view)?;
    let info = result.pagination.unwrap_or_default();

    match args.output {
        OutputFormat::Json => {
            let body = ViewResult {
                data: result.listed.clone(),
                pagination_info: info,
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
            eprint!("{}", render_messages(&result.messages, ctx.color));
        }
        OutputFormat::Table => {
            let columns = ctx.api.fields().visible(&view.fields);
            print!("{}", render_table(&result.listed, &columns, ctx.color));
            if info != PaginationInfo::default() {
                print!(
                    "{}",
                    render_pagination(&info, view.page, view.per_page, ctx.color)
                );
            }
            print!("{}", render_messages(&result.messages, ctx.color));
        }
    }
    Ok(result.has_errors())
}

fn handle_show(ctx: &AppContext, id: u64, output: OutputFormat) -> Result<bool> {
    let result = ctx.api.show(id)?;
    for record in &result.listed {
        match output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
            OutputFormat::Table => print!("{}", render_record(record, ctx.api.fields(), ctx.color)),
        }
    }
    Ok(false)
}

fn handle_edit(ctx: &mut AppContext, id: u64, assignments: &[String]) -> Result<bool> {
    let result = ctx.api.edit(id, assignments)?;
    print_result(ctx, &result);
    Ok(result.has_errors())
}

fn handle_bulk_edit(ctx: &mut AppContext, ids: &[u64], assignments: &[String]) -> Result<bool> {
    if assignments.is_empty() {
        let form = ctx.api.bulk_form(ids)?;
        print!("{}", render_bulk_form(&form, ctx.api.fields(), ctx.color));
        return Ok(false);
    }
    let result = ctx.api.bulk_edit(ids, assignments)?;
    print_result(ctx, &result);
    Ok(result.has_errors())
}

fn handle_validate(ctx: &AppContext, id: u64) -> Result<bool> {
    let result = ctx.api.validate(id)?;
    print!("{}", render_messages(&result.messages, ctx.color));
    Ok(result.has_errors())
}

fn handle_config(config: &MediaViewConfig, template: bool) -> Result<()> {
    if template {
        print!("{}", MediaViewConfig::template());
    } else {
        print!("{}", render_config(config));
    }
    Ok(())
}

fn print_result(ctx: &AppContext, result: &CmdResult) {
    print!("{}", render_messages(&result.messages, ctx.color));
}
