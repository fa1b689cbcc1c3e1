//! Terminal front end for the inventory dashboard.
//!
//! # Responsibility
//! - Load configuration, start logging and open the dashboard.
//! - Translate typed commands into dashboard actions.

mod command;
mod terminal;

use clap::Parser;
use command::{parse_command, Command, HELP};
use inventory_core::{
    core_version, init_from_config, Args, Config, Dashboard, DashboardView, SqliteItemStore,
};
use log::{error, info};
use std::io;
use std::process::ExitCode;
use terminal::TerminalView;

fn main() -> ExitCode {
    let args = Args::parse();
    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if args.validate {
        println!(
            "configuration ok: target={} config={}",
            config.database.target(),
            args.config.display()
        );
        return ExitCode::SUCCESS;
    }

    if let Err(err) = init_from_config(&config.logging) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }
    info!(
        "event=dashboard_open module=cli status=start version={} target={}",
        core_version(),
        config.database.target()
    );

    let view = TerminalView::new(io::stdin().lock(), io::stdout());
    let mut dashboard = Dashboard::open(SqliteItemStore::new(config.database), view);

    loop {
        let line = match dashboard.view_mut().read_line("> ") {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!("event=read_command module=cli status=error error={err}");
                return ExitCode::FAILURE;
            }
        };

        match parse_command(&line) {
            Ok(Command::Dispatch(actions)) => {
                for action in actions {
                    dashboard.dispatch(action);
                }
            }
            Ok(Command::Show) => {
                let state = dashboard.state().clone();
                dashboard.view_mut().render(&state);
            }
            Ok(Command::Help) => dashboard.view_mut().print(HELP),
            Ok(Command::Quit) => break,
            Err(message) => dashboard.view_mut().print(&message),
        }
    }

    info!("event=dashboard_close module=cli status=ok");
    ExitCode::SUCCESS
}
