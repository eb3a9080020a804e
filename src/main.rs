use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use tracing::info;

use sshs::app::{App, AppConfig};
use sshs::error::LaunchError;
use sshs::event::{AppEvent, EventHandler};
use sshs::filter::{self, HEADER};
use sshs::ssh_config::model::{Host, SshConfigFile};
use sshs::ssh_config::path::{DEFAULT_CONFIG_PATH, ensure_config_exists, resolve_config_path};
use sshs::ui::{Renderer, Theme};
use sshs::{connection, handler, hosts, logging, tui};

#[derive(Parser)]
#[command(
    name = "sshs",
    about = "Browse the hosts in your SSH config and connect to one.",
    long_about = "sshs lists the hosts from your SSH config in a searchable table.\n\
                  Type to filter, move with the arrow keys, press Enter to connect.",
    version
)]
struct Cli {
    /// Path to SSH config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Host search filter
    #[arg(short, long, default_value = "")]
    search: String,

    /// Display full ProxyCommand instead of a placeholder
    #[arg(short, long)]
    proxy: bool,

    /// Sort hosts by name
    #[arg(long)]
    sort: bool,

    /// Exit when the SSH session ends, with its exit code
    #[arg(short, long)]
    exit: bool,

    /// Connection command. Placeholders: %u user, %h hostname, %p port,
    /// %r proxy command, %n name, %c config path [default: ssh -F %c %n]
    #[arg(short, long, value_name = "TEMPLATE", default_value = "")]
    template: String,

    /// Command to run before each SSH session (same placeholders)
    #[arg(long, value_name = "TEMPLATE", default_value = "")]
    on_session_start_template: String,

    /// Command to run after each SSH session (same placeholders)
    #[arg(long, value_name = "TEMPLATE", default_value = "")]
    on_session_end_template: String,

    /// Connect directly to a host by name (skip the TUI)
    #[arg(long, value_name = "NAME")]
    connect: Option<String>,

    /// List the matching hosts and exit
    #[arg(short, long)]
    list: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Shell completions (no config file needed)
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "sshs", &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let _log_guard = match &cli.log_file {
        Some(path) => Some(logging::init_tracing(path, &cli.log_level)?),
        None => None,
    };

    let config_path = resolve_config_path(&cli.config)?;
    if cli.config == DEFAULT_CONFIG_PATH {
        ensure_config_exists(&config_path)?;
    }
    let config = SshConfigFile::parse(&config_path)?;
    let hosts = hosts::normalize(&config.entries, cli.sort);
    info!(
        path = %config_path.display(),
        entries = config.entries.len(),
        hosts = hosts.len(),
        "Loaded SSH config"
    );

    let app_config = AppConfig {
        config_path,
        search_filter: cli.search,
        display_full_proxy: cli.proxy,
        exit_after_session: cli.exit,
        command_template: cli.template,
        on_session_start_template: cli.on_session_start_template,
        on_session_end_template: cli.on_session_end_template,
    };

    // Direct connect mode (--connect)
    if let Some(name) = cli.connect {
        let Some(host) = hosts.iter().find(|h| h.display_name == name) else {
            bail!("No host named '{}' in {}", name, app_config.config_path.display());
        };
        println!("Connecting to {}...\n", host.display_name);
        let code = match connection::run_session(
            host,
            &app_config.config_path,
            &app_config.command_template,
            &app_config.session_hooks(),
        ) {
            Ok(code) => code,
            Err(e) => report_launch_error(e),
        };
        return Ok(exit_code(code));
    }

    // List mode
    if cli.list {
        print_list(&hosts, &app_config);
        return Ok(ExitCode::SUCCESS);
    }

    let app = App::new(hosts, app_config);
    let code = run_tui(app)?;
    Ok(exit_code(code))
}

fn run_tui(mut app: App) -> Result<i32> {
    let mut renderer = Renderer::new(Theme::detect());
    let mut terminal = tui::Tui::new()?;
    terminal.enter()?;
    let mut events = EventHandler::new(250);

    while app.running {
        terminal.draw(&mut renderer, &app.view())?;

        match events.next()? {
            AppEvent::Action(action) => handler::handle_action(&mut app, action),
            AppEvent::Tick => app.tick_status(),
        }

        // Handle pending SSH connection
        if let Some(host) = app.take_pending_connect() {
            let exit_after = app.config.exit_after_session;
            let config = &app.config;
            let result = terminal.suspend(!exit_after, || {
                println!("Connecting to {}...\n", host.display_name);
                connection::run_session(
                    &host,
                    &config.config_path,
                    &config.command_template,
                    &config.session_hooks(),
                )
            })?;
            events.reset();

            if exit_after {
                let code = match result {
                    Ok(code) => code,
                    Err(e) => report_launch_error(e),
                };
                return Ok(code);
            }

            match result {
                Ok(0) => {}
                Ok(code) => app.set_status(
                    format!("Session to {} exited with code {}.", host.display_name, code),
                    true,
                ),
                Err(e) => app.set_status(format!("{:#}", anyhow::Error::new(e)), true),
            }
        }
    }

    terminal.exit()?;
    Ok(0)
}

/// Print a launch failure and return the exit code it maps to.
fn report_launch_error(e: LaunchError) -> i32 {
    let code = e.exit_code();
    eprintln!("Error: {:#}", anyhow::Error::new(e));
    code
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn print_list(hosts: &[Host], config: &AppConfig) {
    let rows = filter::visible(hosts, &config.search_filter, config.display_full_proxy);
    if rows.is_empty() {
        println!("No hosts found.");
        return;
    }

    let cells: Vec<[String; 4]> = rows.iter().map(|row| row.cells()).collect();
    let mut widths = HEADER.map(|title| title.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let [w0, w1, w2, w3] = widths;
    println!(
        "{:<w0$}  {:<w1$}  {:<w2$}  {:>w3$}",
        HEADER[0], HEADER[1], HEADER[2], HEADER[3]
    );
    for [name, user, target, port] in &cells {
        println!("{name:<w0$}  {user:<w1$}  {target:<w2$}  {port:>w3$}");
    }
}
