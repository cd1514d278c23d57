use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use scout_core::{ChannelProgressSink, ControllerEvent, JobOutcome, TaskController};
use scout_engine::{ManagedDriverResolver, MapsScrapeJob};
use scout_logging::scout_info;

use crate::cli::Args;

/// Everything the interactive loop reacts to, funneled through one channel
/// so all presentation happens on this one context.
enum FrontendMsg {
    Line(String),
    Event(ControllerEvent),
    InputClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Start(String),
    Stop,
    Status,
    Quit,
    Help,
    Empty,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word.to_lowercase().as_str() {
        "start" => Command::Start(rest.to_string()),
        "stop" => Command::Stop,
        "status" => Command::Status,
        "quit" | "exit" => Command::Quit,
        "help" => Command::Help,
        other => Command::Unknown(other.to_string()),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  start <query>   begin scraping Maps results for <query>");
    println!("  stop            request the running scrape to stop");
    println!("  status          show task state and current count");
    println!("  quit            leave the console");
}

/// Run the interactive console until stdin closes or the user quits.
pub fn run(args: Args) -> anyhow::Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel::<FrontendMsg>();
    let (event_tx, event_rx) = mpsc::channel::<ControllerEvent>();
    let controller = TaskController::new(ManagedDriverResolver::default(), event_tx.clone());

    spawn_event_relay(event_rx, msg_tx.clone());
    spawn_stdin_reader(msg_tx);

    println!("mapscout interactive console. Type 'help' for commands.");
    while let Ok(msg) = msg_rx.recv() {
        match msg {
            FrontendMsg::Line(line) => match parse_command(&line) {
                Command::Start(query) => {
                    let config = args.job_config(&query);
                    let sink = ChannelProgressSink::new(event_tx.clone());
                    match controller.start(config, MapsScrapeJob::new(), sink) {
                        Ok(()) => println!("Scraping started for {query:?}."),
                        Err(err) => println!("Cannot start: {err}"),
                    }
                }
                Command::Stop => {
                    if controller.is_running() {
                        controller.request_stop();
                        println!("Stop requested; the scraper halts at its next checkpoint.");
                    } else {
                        println!("Nothing is running.");
                    }
                }
                Command::Status => {
                    println!(
                        "State: {} (results scraped: {})",
                        controller.state(),
                        controller.last_count()
                    );
                }
                Command::Quit => {
                    if controller.is_running() {
                        controller.request_stop();
                        println!("Stop requested; quitting.");
                    }
                    break;
                }
                Command::Help => print_help(),
                Command::Empty => {}
                Command::Unknown(word) => {
                    println!("Unknown command {word:?}; type 'help' for commands.");
                }
            },
            FrontendMsg::Event(ControllerEvent::Progress { count }) => {
                println!("Results scraped: {count}");
            }
            FrontendMsg::Event(ControllerEvent::Finished { outcome }) => match outcome {
                JobOutcome::Completed { total } => {
                    println!("Done. {total} results scraped.");
                }
                JobOutcome::Cancelled { total } => {
                    println!("Stopped. {total} results scraped before cancellation.");
                }
                JobOutcome::Failed { error } => {
                    println!("Scrape failed: {error}");
                }
            },
            FrontendMsg::InputClosed => {
                if controller.is_running() {
                    controller.request_stop();
                }
                break;
            }
        }
    }

    scout_info!("console session ended");
    Ok(())
}

/// Marshal worker-side events onto the interactive loop's channel.
fn spawn_event_relay(event_rx: mpsc::Receiver<ControllerEvent>, msg_tx: mpsc::Sender<FrontendMsg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            if msg_tx.send(FrontendMsg::Event(event)).is_err() {
                break;
            }
        }
    });
}

fn spawn_stdin_reader(msg_tx: mpsc::Sender<FrontendMsg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if msg_tx.send(FrontendMsg::Line(line)).is_err() {
                return;
            }
        }
        let _ = msg_tx.send(FrontendMsg::InputClosed);
    });
}
