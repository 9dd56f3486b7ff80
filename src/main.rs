use std::io::BufRead;
use std::thread;

use tracing::{info, warn};

use tumblebox::app::{Action, App};
use tumblebox::config::load_simulation_settings;
use tumblebox::playground::FixedRateScheduler;
use tumblebox::utils::logging::init_logging;

/// Read console commands line by line and forward them as actions.
fn spawn_command_thread(sender: crossbeam_channel::Sender<Action>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match Action::parse(&line) {
                Some(action) => {
                    let quit = action == Action::Quit;
                    if sender.send(action).is_err() || quit {
                        return;
                    }
                }
                None if line.trim().is_empty() => {}
                None => warn!(
                    command = %line.trim(),
                    "unknown command (try: sphere, box, push, reset, quit)"
                ),
            }
        }
        // stdin closed: stop the frame loop as well
        let _ = sender.send(Action::Quit);
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let settings = load_simulation_settings().unwrap_or_default();
    info!(
        version = tumblebox::VERSION,
        gravity = ?settings.world.gravity(),
        "starting {}",
        tumblebox::APP_NAME
    );

    let (sender, receiver) = crossbeam_channel::unbounded();
    spawn_command_thread(sender);

    let app = App::new(settings, receiver);
    let mut scheduler = FixedRateScheduler::new(60.0);
    app.run(&mut scheduler).await
}
