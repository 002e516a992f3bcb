use anyhow::Result;
use breakpoints::prelude::*;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use futures::StreamExt;
use ratatui::{
    layout::{Constraint, Layout},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use tracing_subscriber::EnvFilter;

fn overrides() -> Result<Breakpoints> {
    let raw = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("BREAKPOINTS").ok())
        .unwrap_or_default();
    Ok(raw.parse()?)
}

fn report(bp: &UseBreakpoints) -> Result<String> {
    let mut lines = vec![
        format!("mobile:  {}", bp.is_mobile.get()),
        format!("tablet:  {}", bp.is_tablet.get()),
        format!("desktop: {}", bp.is_desktop.get()),
    ];
    for (name, width) in bp.breakpoints().iter() {
        lines.push(format!("{name} ({width}): >= {}", bp.greater(name)?.get()));
    }
    lines.push(String::new());
    lines.push("resize the terminal, 'q' to quit".to_string());
    Ok(lines.join("\n"))
}

fn main() -> Result<()> {
    init_tracing()?;
    let breakpoints = overrides()?;
    let window = Window::from_terminal()?;

    let mut term = init_tui()?;
    init_panic_hook();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = create_tracking_scope(|| {
        provide_context(window.clone());
        let app = mount(|| use_breakpoints(breakpoints));
        let bp = app.as_ref().map_err(|e| anyhow::anyhow!("{e}"))?.clone();
        let badge = TierBadge::new(bp.clone());

        runtime.block_on(async {
            let mut events = terminal_events();
            loop {
                // Each frame mounts its own lookups so they are released before the next one
                let frame = mount(|| report(&bp));
                let text = frame.as_ref().map_err(|e| anyhow::anyhow!("{e}"))?.clone();
                term.draw(|f| {
                    let chunks = Layout::default()
                        .constraints([Constraint::Length(1), Constraint::Min(0)])
                        .split(f.size());
                    f.render_widget_ref(badge.clone(), chunks[0]);
                    f.render_widget(
                        Paragraph::new(text).block(Block::default().borders(Borders::TOP)),
                        chunks[1],
                    );
                })?;

                let Some(event) = events.next().await else {
                    break;
                };
                let event = event?;
                if let Event::Key(key) = &event {
                    if key.kind == KeyEventKind::Press
                        && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                    {
                        break;
                    }
                }
                window.dispatch(&event);
            }
            Ok::<(), anyhow::Error>(())
        })
    });

    restore_tui()?;
    result
}

fn init_tracing() -> Result<()> {
    let log = std::fs::File::create("breakpoints.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(log))
        .with_ansi(false)
        .init();
    Ok(())
}

pub fn init_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_tui();
        original_hook(panic_info);
    }));
}

pub fn init_tui() -> std::io::Result<Terminal<impl ratatui::backend::Backend>> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(std::io::stderr(), crossterm::terminal::EnterAlternateScreen)?;
    Terminal::new(ratatui::backend::CrosstermBackend::new(std::io::stderr()))
}

pub fn restore_tui() -> Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(std::io::stderr(), crossterm::terminal::LeaveAlternateScreen)?;
    Ok(())
}
