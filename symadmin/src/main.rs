// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::info;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use symadmin::admin::handlers;
use symadmin::app_state::AppState;
use symadmin::bootstrap::{self, BootstrapResult};
use symadmin::config::ValidatedConfig;
use symadmin::extensions::ExtensionManager;
use symadmin::runtime_paths::RuntimePaths;
use symadmin::util::{
    ActivityLogSettings, ActivityLogWriter, default_rules, init_logger, level_filter_from_config,
};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            eprintln!("❌ Use -F to echo the activity log to stderr.");
            return 1;
        }
    };

    if parsed_args.help {
        print!("{}", help_text());
        return 0;
    }

    let bootstrap = match bootstrap::bootstrap_runtime(&parsed_args.runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Bootstrap error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    match System::new().block_on(run_server(bootstrap, parsed_args.echo_log)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

async fn run_server(bootstrap: BootstrapResult, echo_log: bool) -> std::io::Result<()> {
    let BootstrapResult {
        validated_config,
        runtime_paths,
        database,
        ..
    } = bootstrap;

    let mut settings = ActivityLogSettings::from_config(&validated_config.log);
    settings.echo_to_stderr = echo_log;
    let writer = ActivityLogWriter::new(runtime_paths.activity_log_file(), settings)
        .inspect_err(|error| eprintln!("❌ Failed to open activity log: {}", error))?;

    let logger = env_logger::Builder::from_default_env()
        .filter_level(level_filter_from_config(&validated_config.log.level))
        .target(env_logger::Target::Pipe(Box::new(writer)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .build();

    init_logger(default_rules(), logger).map_err(|error| {
        eprintln!("❌ Failed to initialize logger: {}", error);
        std::io::Error::other(error.to_string())
    })?;

    log_startup_info(&validated_config, &runtime_paths);

    let host = validated_config.server.host.clone();
    let port = validated_config.server.port;
    let workers = validated_config.server.workers;
    let admin_path = validated_config.admin.path.clone();

    let app_state = Arc::new(AppState::new(
        validated_config,
        runtime_paths,
        database,
        ExtensionManager::new(),
    ));
    info!(
        "✅ App state initialized with {} backend page(s)",
        app_state.pages.classnames().len()
    );

    HttpServer::new(move || {
        let admin_path = admin_path.clone();
        App::new()
            .app_data(web::Data::from(app_state.clone()))
            .wrap(Logger::new("%a \"%r\" %s %b %Dms"))
            .configure(move |cfg| handlers::configure(cfg, &admin_path))
    })
    .workers(workers)
    .bind((host.as_str(), port))?
    .run()
    .await
}

fn log_startup_info(config: &ValidatedConfig, runtime_paths: &RuntimePaths) {
    info!("Starting {} on {}:{}", config.app.name, config.server.host, config.server.port);
    info!("Admin panel available at: {}/", config.admin_url());
    info!("Database file: {}", runtime_paths.database_file.display());
    info!("Content directory: {}", runtime_paths.content_dir.display());
    info!("Extensions directory: {}", runtime_paths.extensions_dir.display());
    info!("Config file: {}", runtime_paths.config_file.display());
    info!("Runtime root: {}", runtime_paths.root.display());
}

fn help_text() -> &'static str {
    "Usage: symadmin [-C <root>] [-F]\n\n  -C <root>  runtime directory (default: current directory)\n  -F         echo the activity log to stderr\n  -h         show this help\n"
}

struct ParsedArgs {
    runtime_root: PathBuf,
    echo_log: bool,
    help: bool,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut runtime_root = PathBuf::from(".");
    let mut echo_log = false;
    let mut help = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--" => continue,
            "-C" => {
                let value = args
                    .next()
                    .ok_or_else(|| "Missing value for -C".to_string())?;
                runtime_root = PathBuf::from(value);
            }
            "-F" => echo_log = true,
            "-h" | "--help" => help = true,
            other => return Err(format!("Unexpected argument '{}'", other)),
        }
    }

    Ok(ParsedArgs {
        runtime_root: make_runtime_root_absolute(runtime_root)?,
        echo_log,
        help,
    })
}

fn make_runtime_root_absolute(runtime_root: PathBuf) -> Result<PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}
