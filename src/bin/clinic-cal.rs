extern crate clinic_calendar as lib;

use flexi_logger::{FileSpec, Logger};
use lib::agenda::AppointmentBook;
use lib::command::{parse_command, Cmd};
use lib::conflict::{spawn_check, ConflictCheck};
use lib::navigator::{Navigate, Navigator};
use lib::render::{self, Theme};
use lib::slots::SlotPicker;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "clinic-cal",
    about = "Monthly appointment calendar of the clinic."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "d",
        long = "date",
        help = "date (YYYY-MM-DD) or query string selecting the month to show"
    )]
    pub date: Option<String>,

    #[structopt(
        short = "a",
        long = "appointments",
        help = "appointments file, overrides the config",
        parse(from_os_str)
    )]
    pub appointments: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only show calendar non-interactively"
    )]
    pub show: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

/// Day selections leave the calendar: print the link of the day view.
struct TerminalNavigate;

impl Navigate for TerminalNavigate {
    fn navigate(&mut self, href: &str) {
        println!("-> {}", href);
    }
}

fn run_command(
    cmd: &Cmd,
    navigator: &mut Navigator,
    book: &Arc<AppointmentBook>,
    picker: &mut SlotPicker,
    theme: &Theme,
) -> lib::Result<()> {
    match *cmd {
        Cmd::Slots(day) => {
            let date = navigator.month().date(day)?;
            let free_slots = picker.free_slots(date, &**book);
            print!("{}", render::render_slots(date, &free_slots));
        }
        Cmd::Check(day, time) => {
            let date = navigator.month().date(day)?;
            let checker: Arc<dyn ConflictCheck> = book.clone();
            match spawn_check(checker, date, time)?.wait() {
                Ok(status) => {
                    let value = picker.select(&time.format("%H:%M").to_string());
                    println!("{}", status.message());
                    if let Ok(value) = value {
                        println!("hora_consulta = {}", value);
                    }
                }
                Err(e) => println!("{}", e.user_message()),
            }
        }
        Cmd::SelectDay(day) => {
            let target = navigator.go_to_day(day, &mut TerminalNavigate)?;
            let appointments = book.appointments_of_day(target.date());
            print!("{}", render::render_day(target.date(), &appointments));
        }
        _ => {
            if let Some(grid) = navigator.handle(cmd, &mut TerminalNavigate)? {
                print!("{}", render::render_month(&grid, theme));
            }
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    std::panic::set_hook(Box::new(move |info| {
        println!("clinic-cal ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let book = match args.appointments.as_ref().or_else(|| config.appointments.as_ref()) {
        Some(path) => AppointmentBook::from_file(path)?,
        None => {
            log::info!("No appointments file configured");
            AppointmentBook::default()
        }
    };
    let book = Arc::new(book);

    let theme = Theme::default();
    let mut picker = SlotPicker::new(&config.slots);
    let mut navigator = Navigator::new(&config, &*book);
    navigator.initialize_from_query(args.date.as_deref());

    print!("{}", render::render_month(&navigator.grid(), &theme));

    if args.show {
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        if line.trim().is_empty() {
            continue;
        }

        let cmd = match parse_command(&line) {
            Ok(Cmd::Quit) => break,
            Ok(cmd) => cmd,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        if let Err(e) = run_command(&cmd, &mut navigator, &book, &mut picker, &theme) {
            eprintln!("{}", e);
        }
    }

    Ok(())
}
