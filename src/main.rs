use clap::Parser;
use course_quiz::{
    ApiRequest, ApiResponse, Config, HttpQuizApi, KeyFlow, QuizApi, QuizController, handle_key, logger,
    session::Event, spawn_api_worker, ui,
};
use crossterm::{
    event::{Event as TermEvent, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    let setup = config.validate()?;

    if let Err(e) = logger::init(&config.log_file) {
        eprintln!(
            "Warning: cannot open log file {}: {}",
            config.log_file.display(),
            e
        );
    }
    info!(server = %setup.server, multi_course = setup.deployment.multi_course, "starting quiz client");

    let api: Arc<dyn QuizApi> = Arc::new(HttpQuizApi::new(&setup.server, setup.request_timeout)?);
    let (request_tx, response_rx, worker) = spawn_api_worker(api);
    let controller = QuizController::new(setup.deployment, setup.settings);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_app(&mut terminal, controller, request_tx, response_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    worker.abort();

    if let Err(e) = &result {
        error!(error = %e, "quiz client stopped with an error");
    }
    info!("quiz client exited");
    result.map_err(Into::into)
}

fn dispatch(request_tx: &UnboundedSender<ApiRequest>, request: Option<ApiRequest>) {
    if let Some(request) = request
        && request_tx.send(request).is_err()
    {
        warn!("api worker is gone; request dropped");
    }
}

async fn run_app(
    terminal: &mut Tui,
    mut controller: QuizController,
    request_tx: UnboundedSender<ApiRequest>,
    mut response_rx: UnboundedReceiver<ApiResponse>,
) -> io::Result<()> {
    let mut events = EventStream::new();
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut counting = false;

    dispatch(&request_tx, controller.start());

    loop {
        terminal.draw(|f| ui::draw(f, &mut controller))?;

        // restart the period whenever a new countdown begins
        let active = controller.countdown_active();
        if active && !counting {
            ticker.reset();
        }
        counting = active;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(TermEvent::Key(key))) => match handle_key(&mut controller, key) {
                        KeyFlow::Quit => {
                            info!("user quit");
                            return Ok(());
                        }
                        KeyFlow::Continue(request) => dispatch(&request_tx, request),
                    },
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e),
                    None => return Ok(()),
                }
            }
            _ = ticker.tick(), if counting => {
                dispatch(&request_tx, controller.handle(Event::Tick));
            }
            Some(response) = response_rx.recv() => {
                dispatch(&request_tx, controller.handle(Event::Api(response)));
            }
        }
    }
}
