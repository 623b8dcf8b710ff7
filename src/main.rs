use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use interactive_quizzes::{
    App, Config, Session, SourceKind,
    db,
    loader::{JsonTreeSource, import_into_sqlite},
    logger,
    timer::{Ticker, reconcile_ticker},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    layout::Rect,
};
use std::io;

const USAGE: &str = "Usage: interactive-quizzes [--import]

  --import   copy every quiz under QUIZ_DIR into the SQLite database at QUIZ_DB

Environment: QUIZ_DIR, QUIZ_SOURCE (json|sqlite), QUIZ_DB, QUIZ_LOCALE (en|ar), QUIZ_USER";

#[tokio::main]
async fn main() -> io::Result<()> {
    logger::init();
    let config = Config::from_env();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return Ok(());
    }
    if args.iter().any(|a| a == "--import") {
        return import(&config).await;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, config).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        logger::log(&format!("Exited with error: {}", e));
    }
    result
}

async fn import(config: &Config) -> io::Result<()> {
    let source = JsonTreeSource::new(&config.quiz_dir);
    let conn = db::init_db(&config.db_path).map_err(io::Error::other)?;
    let imported = import_into_sqlite(&source, &conn)
        .await
        .map_err(io::Error::other)?;
    logger::log(&format!(
        "Imported {} quizzes from {} into {}",
        imported,
        config.quiz_dir.display(),
        config.db_path.display()
    ));
    println!(
        "Imported {} quizzes into {}",
        imported,
        config.db_path.display()
    );
    Ok(())
}

/// Resolves on the next second while a ticker exists, never otherwise.
async fn next_tick(ticker: &mut Option<Ticker>) -> Option<()> {
    match ticker {
        Some(ticker) => ticker.next_tick().await,
        None => std::future::pending().await,
    }
}

async fn run<B: Backend>(terminal: &mut Terminal<B>, config: Config) -> io::Result<()> {
    let source_label = match config.source {
        SourceKind::Json => format!("json {}", config.quiz_dir.display()),
        SourceKind::Sqlite => "sqlite".to_string(),
    };
    let mut app = App::new(Session::from_config(&config), config.locale, source_label);
    app.refresh().await;

    let mut events = EventStream::new();
    let mut ticker: Option<Ticker> = None;

    loop {
        terminal.draw(|f| app.draw(f))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key).await;
                }
                Some(Ok(Event::Mouse(mouse))) => {
                    let size = terminal.size()?;
                    app.handle_mouse(mouse, Rect::new(0, 0, size.width, size.height));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => break,
            },
            Some(()) = next_tick(&mut ticker) => app.handle_tick(),
        }

        if app.should_quit {
            break;
        }
        reconcile_ticker(&mut ticker, app.is_timer_running());
    }

    Ok(())
}
