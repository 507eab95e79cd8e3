//! Foreground timer session.

use std::time::Duration;

use clap::Args;
use tokio::sync::mpsc;
use tracing::warn;

use tomata_core::{Callbacks, Phase, Settings, Timer, TimerConfig};

#[derive(Args)]
pub struct RunArgs {
    /// Work phase length in minutes
    #[arg(long)]
    pub work: Option<u64>,
    /// Short break length in minutes
    #[arg(long)]
    pub short_break: Option<u64>,
    /// Long break length in minutes
    #[arg(long)]
    pub long_break: Option<u64>,
    /// Work sessions between long breaks
    #[arg(long)]
    pub sessions: Option<u32>,
    /// Suppress desktop notifications
    #[arg(long)]
    pub no_notify: bool,
}

enum SessionEvent {
    Tick(Phase, Duration),
    Change(Phase, Phase),
}

pub async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let config = apply_overrides(settings.timer_config(), &args);
    let notify = settings.notifications.enabled && !args.no_notify;

    // The timer's sinks only forward into this channel; printing and
    // notification delivery stay out of the driver's tick path.
    let (event_tx, mut events) = mpsc::unbounded_channel();
    let tick_tx = event_tx.clone();
    let callbacks = Callbacks::new()
        .time_update(move |phase, remaining| {
            let _ = tick_tx.send(SessionEvent::Tick(phase, remaining));
        })
        .state_change(move |from, to| {
            let _ = event_tx.send(SessionEvent::Change(from, to));
        });

    let timer = Timer::spawn(config, callbacks);
    println!("{}  {}  (Ctrl-C to quit)", timer.phase(), clock(timer.remaining()));
    timer.play();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("{} pomodoros completed", timer.completed_pomodoros());
                break;
            }
            event = events.recv() => match event {
                Some(SessionEvent::Tick(phase, remaining)) => {
                    println!("{}  {}", phase, clock(remaining));
                }
                Some(SessionEvent::Change(from, to)) => {
                    println!(
                        "{} finished, {} begins  ({} pomodoros)",
                        from,
                        to,
                        timer.completed_pomodoros()
                    );
                    if notify {
                        send_notification(from, to);
                    }
                }
                None => break,
            },
        }
    }
    Ok(())
}

fn apply_overrides(mut config: TimerConfig, args: &RunArgs) -> TimerConfig {
    if let Some(minutes) = args.work {
        config.work = Duration::from_secs(minutes * 60);
    }
    if let Some(minutes) = args.short_break {
        config.short_break = Duration::from_secs(minutes * 60);
    }
    if let Some(minutes) = args.long_break {
        config.long_break = Duration::from_secs(minutes * 60);
    }
    if let Some(sessions) = args.sessions {
        config.sessions_before_long_break = sessions;
    }
    config
}

fn clock(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn send_notification(from: Phase, to: Phase) {
    let body = format!("{from} is over, time for {to}.");
    if let Err(e) = notify_rust::Notification::new()
        .summary("Tomata")
        .body(&body)
        .show()
    {
        warn!("notification failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formats_minutes_and_seconds() {
        assert_eq!(clock(Duration::from_secs(25 * 60)), "25:00");
        assert_eq!(clock(Duration::from_secs(61)), "01:01");
        assert_eq!(clock(Duration::ZERO), "00:00");
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let args = RunArgs {
            work: Some(50),
            short_break: None,
            long_break: None,
            sessions: Some(2),
            no_notify: false,
        };
        let config = apply_overrides(TimerConfig::default(), &args);
        assert_eq!(config.work, Duration::from_secs(50 * 60));
        assert_eq!(config.short_break, Duration::from_secs(5 * 60));
        assert_eq!(config.sessions_before_long_break, 2);
    }
}
