use clap::error::ErrorKind;
use clap::Parser;
use tokio::sync::mpsc;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::paginator::DEFAULT_PAGE_LENGTH;
use crate::render::{render_text, ViewRole};
use crate::runner::{Options, Runner, DEFAULT_POLL_INTERVAL_MS};
use crate::utils;

fn print_banner() {
    const BANNER: &str = r#"
                          _        _     _
  _____  ____ _ _ __ ___ | |_ __ _| |__ | | ___
 / _ \ \/ / _` | '_ ` _ \| __/ _` | '_ \| |/ _ \
|  __/>  < (_| | | | | | | || (_| | |_) | |  __/
 \___/_/\_\__,_|_| |_| |_|\__\__,_|_.__/|_|\___|

       v0.1.0 - live exam dashboard table
    "#;
    print!("{}", BANNER);
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn build_options(args: &CliArgs, cfg: ConfigFile) -> Result<Options, String> {
    validation::validate(args)?;

    let endpoint = args
        .endpoint
        .clone()
        .or(cfg.endpoint)
        .ok_or_else(|| "no endpoint provided (use --endpoint or the config file)".to_string())?;
    let viewer_id = args
        .viewer_id
        .or(cfg.viewer_id)
        .ok_or_else(|| "no viewer id provided (use --uid or the config file)".to_string())?;

    let role_raw = args
        .role
        .clone()
        .or(cfg.role)
        .unwrap_or_else(|| "student".to_string());
    let role = ViewRole::parse(&role_raw)
        .ok_or_else(|| format!("invalid role '{role_raw}', expected student or teacher"))?;

    let poll_interval_ms = args
        .poll_interval
        .or(cfg.poll_interval)
        .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
    utils::validate_poll_interval(poll_interval_ms)?;

    let page_length = args
        .page_length
        .or(cfg.page_length)
        .unwrap_or(DEFAULT_PAGE_LENGTH);
    utils::validate_page_length(page_length)?;

    let timeout_seconds = args.timeout.or(cfg.timeout).unwrap_or(10);
    let proxy = args.proxy.clone().or(cfg.proxy);
    let search = args.search.clone().or(cfg.search);
    let no_color = args.no_color || cfg.no_color.unwrap_or(false);

    Ok(Options {
        endpoint,
        viewer_id,
        role,
        poll_interval_ms,
        page_length,
        timeout_seconds,
        proxy,
        search,
        no_color,
    })
}

async fn run_async(options: Options, once: bool) -> Result<(), String> {
    let no_color = options.no_color;
    let runner = Runner::new(options).map_err(|e| e.to_string())?;

    if once {
        let view = runner.fetch_once().await.map_err(|e| e.to_string())?;
        print!("{}", render_text(&view, no_color));
        return Ok(());
    }

    // The event sender stays alive for the whole run so the poller keeps
    // its interaction channel open; the terminal host itself only renders.
    let (_events_tx, events_rx) = mpsc::channel(16);
    let live = runner.run_live(events_rx, |view| {
        println!();
        print!("{}", render_text(&view, no_color));
    });

    tokio::select! {
        result = live => result.map_err(|e| e.to_string())?,
        _ = tokio::signal::ctrl_c() => {
            println!();
            utils::info("stopping live view");
        }
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let cfg = match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => {
                if let Err(e) = config::ensure_default_config_file(&path) {
                    utils::warn(&e);
                }
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };

    let options = build_options(&args, cfg)?;

    if options.no_color {
        colored::control::set_override(false);
    }

    print_banner();
    format_kv_line("Endpoint", &options.endpoint);
    format_kv_line("Viewer", &options.viewer_id.to_string());
    format_kv_line("Role", options.role.label());
    format_kv_line("Interval", &format!("{}ms", options.poll_interval_ms));
    format_kv_line("Page len", &options.page_length.to_string());
    format_kv_line("Mode", if args.once { "once" } else { "live" });
    println!();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(options, args.once))?;
    Ok(())
}
