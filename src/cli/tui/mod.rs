mod app;
mod data;
mod dialog;
mod list;
mod terminal;
mod theme;
mod ui;

use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEventKind};
use ratatui::layout::Rect;

use crate::cli::i18n::texts;
use crate::config::{remove_provider_state_dir, ProvidersConfig};
use crate::error::AppError;
use crate::services::{ConnectionResult, ProbeService, ProbeTarget, ProviderService};

use app::{Action, App, ToastKind};
use data::UiData;
use terminal::{PanicRestoreHookGuard, TuiTerminal};
use theme::Theme;

/// Everything the worker side can post back into the loop.
enum LoopMsg {
    Connection(ConnectionResult),
}

struct ProbeSystem {
    req_tx: mpsc::Sender<ProbeTarget>,
    _handle: std::thread::JoinHandle<()>,
}

/// Runs the provider browser. Returns the provider the user chose to launch,
/// after the terminal has been restored.
pub fn run() -> Result<Option<String>, AppError> {
    let _panic_hook = PanicRestoreHookGuard::install();
    let mut terminal = TuiTerminal::new()?;
    let mut data = UiData::load()?;
    let mut app = App::new(&data, Theme::detect());

    let (msg_tx, msg_rx) = mpsc::channel::<LoopMsg>();
    let probe = match start_probe_system(msg_tx) {
        Ok(system) => Some(system),
        Err(err) => {
            app.push_toast(
                texts::tui_toast_probe_unavailable(&err.to_string()),
                ToastKind::Warning,
            );
            None
        }
    };

    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        let size = terminal.size()?;
        let viewport = ui::list_viewport(Rect::new(0, 0, size.width, size.height), &app);
        app.list.set_viewport(viewport);
        terminal.draw(|f| ui::render(f, &app, &data))?;

        // 先处理后台消息，再处理按键
        while let Ok(msg) = msg_rx.try_recv() {
            match msg {
                LoopMsg::Connection(result) => app.apply_connection_result(&result),
            }
        }

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout).map_err(|e| AppError::Terminal(e.to_string()))? {
            if let event::Event::Key(key) =
                event::read().map_err(|e| AppError::Terminal(e.to_string()))?
            {
                if key.kind == KeyEventKind::Press {
                    let action = app.on_key(key, &data);
                    dispatch(
                        &mut app,
                        &mut data,
                        probe.as_ref().map(|p| &p.req_tx),
                        action,
                    );
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(app.run_target.take())
}

/// Load, mutate, save, then rebuild the list from what is on disk.
fn persist<T>(
    app: &mut App,
    data: &mut UiData,
    mutate: impl FnOnce(&mut ProvidersConfig) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let value = ProvidersConfig::update(mutate)?;
    *data = UiData::load()?;
    app.reload(data);
    Ok(value)
}

/// A failed action surfaces as an error toast; the loop keeps running.
fn dispatch(
    app: &mut App,
    data: &mut UiData,
    probe_tx: Option<&mpsc::Sender<ProbeTarget>>,
    action: Action,
) {
    if let Err(err) = handle_action(app, data, probe_tx, action) {
        app.push_toast(err.to_string(), ToastKind::Error);
    }
}

fn handle_action(
    app: &mut App,
    data: &mut UiData,
    probe_tx: Option<&mpsc::Sender<ProbeTarget>>,
    action: Action,
) -> Result<(), AppError> {
    match action {
        Action::None | Action::Quit | Action::Run { .. } => Ok(()),
        Action::SaveProvider { record } => {
            let name = record.name.clone();
            persist(app, data, |cfg| ProviderService::upsert(cfg, record))?;
            app.push_toast(texts::tui_toast_saved(&name), ToastKind::Success);
            Ok(())
        }
        Action::RemoveProvider { name } => {
            persist(app, data, |cfg| ProviderService::remove(cfg, &name))?;
            if let Err(e) = remove_provider_state_dir(&name) {
                log::warn!("failed to remove state for '{name}': {e}");
            }
            app.push_toast(texts::tui_toast_removed(&name), ToastKind::Success);
            Ok(())
        }
        Action::SetDefault { name } => {
            let configured = persist(app, data, |cfg| ProviderService::set_default(cfg, &name))?;
            if configured {
                app.push_toast(texts::tui_toast_default_set(&name), ToastKind::Success);
            } else {
                app.push_toast(
                    texts::tui_toast_default_set_unconfigured(&name),
                    ToastKind::Warning,
                );
            }
            Ok(())
        }
        Action::TestConnection { name } => {
            let target = match ProviderService::resolve(&data.config, &name) {
                Ok(resolved) => ProbeTarget::from(&resolved),
                Err(err) => {
                    app.apply_connection_result(&ConnectionResult::failed(&name, err.to_string()));
                    return Err(err);
                }
            };
            let Some(tx) = probe_tx else {
                app.apply_connection_result(&ConnectionResult::failed(
                    &name,
                    texts::tui_probe_disabled(),
                ));
                return Ok(());
            };
            if let Err(err) = tx.send(target) {
                app.apply_connection_result(&ConnectionResult::failed(&name, err.to_string()));
            }
            Ok(())
        }
    }
}

fn start_probe_system(msg_tx: mpsc::Sender<LoopMsg>) -> Result<ProbeSystem, AppError> {
    let (req_tx, req_rx) = mpsc::channel::<ProbeTarget>();

    let handle = std::thread::Builder::new()
        .name("ccm-probe".to_string())
        .spawn(move || probe_worker_loop(req_rx, msg_tx))
        .map_err(|e| AppError::IoContext {
            context: "failed to spawn probe worker thread".to_string(),
            source: e,
        })?;

    Ok(ProbeSystem {
        req_tx,
        _handle: handle,
    })
}

/// One task per request, so a slow endpoint never holds up the others.
/// Each request produces exactly one message.
fn probe_worker_loop(rx: mpsc::Receiver<ProbeTarget>, tx: mpsc::Sender<LoopMsg>) {
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            let err = e.to_string();
            while let Ok(target) = rx.recv() {
                let _ = tx.send(LoopMsg::Connection(ConnectionResult::failed(
                    target.name,
                    err.clone(),
                )));
            }
            return;
        }
    };

    while let Ok(target) = rx.recv() {
        let tx = tx.clone();
        rt.spawn(async move {
            let result = ProbeService::test_connection(target).await;
            let _ = tx.send(LoopMsg::Connection(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{config_path, provider_state_dir, HOME_ENV};
    use crate::provider::ProviderRecord;
    use serial_test::serial;
    use std::fs;
    use std::net::TcpListener;
    use tempfile::TempDir;

    struct HomeGuard {
        _dir: TempDir,
        prev: Option<String>,
    }

    impl HomeGuard {
        fn new() -> Self {
            let dir = TempDir::new().expect("temp dir");
            let prev = std::env::var(HOME_ENV).ok();
            std::env::set_var(HOME_ENV, dir.path());
            Self { _dir: dir, prev }
        }
    }

    impl Drop for HomeGuard {
        fn drop(&mut self) {
            match &self.prev {
                Some(v) => std::env::set_var(HOME_ENV, v),
                None => std::env::remove_var(HOME_ENV),
            }
        }
    }

    fn custom(name: &str, base_url: &str) -> ProviderRecord {
        ProviderRecord {
            name: name.to_string(),
            display_name: name.to_string(),
            api_key: format!("sk-{name}"),
            base_url: base_url.to_string(),
            model: "m".to_string(),
            key_url: String::new(),
        }
    }

    fn loaded_app() -> (App, UiData) {
        let data = UiData::load().expect("load");
        let app = App::new(&data, Theme::new(theme::ThemeKind::Dark, true));
        (app, data)
    }

    fn toast_kind(app: &App) -> Option<ToastKind> {
        app.toast.as_ref().map(|t| t.kind)
    }

    fn data_with(name: &str, base_url: String) -> UiData {
        let mut config = ProvidersConfig::default();
        config.providers.insert(
            name.to_string(),
            ProviderRecord {
                name: name.to_string(),
                display_name: name.to_string(),
                api_key: "sk".to_string(),
                base_url,
                model: "m".to_string(),
                key_url: String::new(),
            },
        );
        UiData { config }
    }

    #[test]
    fn probe_result_arrives_through_the_loop_channel() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let data = data_with("alpha", format!("http://{addr}"));
        let (msg_tx, msg_rx) = mpsc::channel();
        let probe = start_probe_system(msg_tx).expect("worker");
        let mut app = App::new(&data, Theme::new(theme::ThemeKind::Dark, true));
        let mut data = data;

        app.list.mark_testing("alpha");
        handle_action(
            &mut app,
            &mut data,
            Some(&probe.req_tx),
            Action::TestConnection {
                name: "alpha".into(),
            },
        )
        .expect("dispatch");

        let LoopMsg::Connection(result) = msg_rx
            .recv_timeout(Duration::from_secs(15))
            .expect("one result");
        assert_eq!(result.name, "alpha");
        app.apply_connection_result(&result);
        assert_eq!(
            app.list.entry("alpha").map(|e| e.status),
            Some(crate::services::ConnectionStatus::Error)
        );
    }

    #[test]
    fn test_without_worker_marks_error() {
        let mut data = data_with("alpha", "http://127.0.0.1:9".into());
        let mut app = App::new(&data, Theme::new(theme::ThemeKind::Dark, true));
        handle_action(
            &mut app,
            &mut data,
            None,
            Action::TestConnection {
                name: "alpha".into(),
            },
        )
        .expect("dispatch");
        assert_eq!(
            app.list.entry("alpha").map(|e| e.status),
            Some(crate::services::ConnectionStatus::Error)
        );
    }

    #[test]
    #[serial]
    fn save_writes_file_and_refreshes_list() {
        let _home = HomeGuard::new();
        let (mut app, mut data) = loaded_app();
        assert!(app.list.entry("alpha").is_none());

        dispatch(
            &mut app,
            &mut data,
            None,
            Action::SaveProvider {
                record: custom("alpha", "https://alpha.example.com/v1"),
            },
        );

        assert_eq!(toast_kind(&app), Some(ToastKind::Success));
        let entry = app.list.entry("alpha").expect("listed after save");
        assert!(entry.summary.is_configured);
        let on_disk = ProvidersConfig::load().expect("load");
        assert_eq!(
            on_disk.record("alpha").map(|r| r.base_url.as_str()),
            Some("https://alpha.example.com/v1")
        );
        assert_eq!(data.config, on_disk);
    }

    #[test]
    #[serial]
    fn removing_the_default_clears_it_and_its_state() {
        let _home = HomeGuard::new();
        let mut config = ProvidersConfig::default();
        config
            .providers
            .insert("kimi".into(), custom("kimi", "https://api.moonshot.cn/v1"));
        config.default = Some("kimi".into());
        config.save().expect("save");
        let state = provider_state_dir("kimi").expect("state dir");
        fs::create_dir_all(&state).expect("mkdir");

        let (mut app, mut data) = loaded_app();
        dispatch(
            &mut app,
            &mut data,
            None,
            Action::RemoveProvider {
                name: "kimi".into(),
            },
        );

        assert_eq!(toast_kind(&app), Some(ToastKind::Success));
        let entry = app.list.entry("kimi").expect("preset stays listed");
        assert!(!entry.summary.has_record);
        assert!(!entry.summary.is_default);
        assert_eq!(ProvidersConfig::load().expect("load").default, None);
        assert!(!state.exists());
    }

    #[test]
    #[serial]
    fn default_on_unconfigured_preset_is_saved_with_warning() {
        let _home = HomeGuard::new();
        let prev = std::env::var("CCM_API_KEY_GLM").ok();
        std::env::remove_var("CCM_API_KEY_GLM");

        let (mut app, mut data) = loaded_app();
        dispatch(
            &mut app,
            &mut data,
            None,
            Action::SetDefault { name: "glm".into() },
        );

        assert_eq!(toast_kind(&app), Some(ToastKind::Warning));
        assert_eq!(
            ProvidersConfig::load().expect("load").default.as_deref(),
            Some("glm")
        );
        assert!(app.list.entry("glm").is_some_and(|e| e.summary.is_default));

        if let Some(v) = prev {
            std::env::set_var("CCM_API_KEY_GLM", v);
        }
    }

    #[test]
    #[serial]
    fn rejected_save_leaves_file_untouched() {
        let _home = HomeGuard::new();
        let mut config = ProvidersConfig::default();
        config
            .providers
            .insert("alpha".into(), custom("alpha", "https://alpha.example.com"));
        config.save().expect("save");
        let path = config_path().expect("path");
        let before = fs::read(&path).expect("read");

        let (mut app, mut data) = loaded_app();
        dispatch(
            &mut app,
            &mut data,
            None,
            Action::SaveProvider {
                record: custom("alpha", "ftp://x"),
            },
        );

        assert_eq!(toast_kind(&app), Some(ToastKind::Error));
        assert_eq!(fs::read(&path).expect("read"), before);
        assert_eq!(
            app.list.entry("alpha").map(|e| e.summary.base_url.as_str()),
            Some("https://alpha.example.com")
        );
    }
}
