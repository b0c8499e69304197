mod config;
mod error;
mod ledger;
mod logging;
mod models;
mod storage;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::{error, info};

use crate::config::{AppConfig, Backend};
use crate::error::AppError;
use crate::ledger::Ledger;
use crate::storage::open_store;
use crate::ui::{App, render};

/// 获取数据目录路径 (~/.local/share/estoque/)
fn get_data_dir() -> io::Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "无法获取用户数据目录"))?
        .join("estoque");

    fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

fn main() -> Result<(), AppError> {
    let data_dir = get_data_dir()?;
    let config = AppConfig::load(&data_dir.join("config.toml"))?;
    let _log_guard = logging::init(&config.logging, &data_dir)?;

    // 存储打不开时直接终止启动
    let storage_path = config.storage_path(&data_dir);
    let store = open_store(config.storage.backend, &storage_path).inspect_err(|e| {
        error!(error = %e, path = %storage_path.display(), "无法打开存储");
    })?;
    let ledger = Ledger::load(store, config.alerts.low_stock_threshold)?;

    let mut app = App::new(ledger);

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!(products = app.ledger.len(), "退出");
    if config.storage.backend != Backend::Memory {
        println!("数据保存在 {}", storage_path.display());
    }

    result.map_err(AppError::from)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
            if key.kind == crossterm::event::KeyEventKind::Press && ui::handle_key_event(app, key.code) {
                break;
            }
        }
    }
    Ok(())
}
