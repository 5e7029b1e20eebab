use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use game_audio::audio_system::MemoryAssets;
use game_audio::error::AppResult;
use game_audio::{logging, AudioManager, Config, Event, EventBus, UserProfile};

const APP_TITLE: &str = "game-audio-demo";

/// Simulated run length
const RUN_LENGTH: Duration = Duration::from_secs(4);

fn main() -> AppResult<()> {
    // Optional first argument: path to config.json
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);

    let config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    logging::init_tracing(&config.logging)?;

    let version = env!("CARGO_PKG_VERSION");
    tracing::info!("Starting {} v{}", APP_TITLE, version);

    let bus = EventBus::new();
    let (events, _subscription) = bus.subscribe();
    let assets = MemoryAssets::new();
    let manager = AudioManager::attach(&bus, &assets, &config.audio);

    // Restore volumes from the last session
    let profile_path = config.profile_file();
    let stored = if profile_path.exists() {
        let profile = UserProfile::load_from_file(&profile_path)?;
        if profile.is_compatible(APP_TITLE, version) {
            profile
        } else {
            tracing::warn!(
                "Profile {} belongs to {} v{}, starting fresh",
                profile_path.display(),
                profile.app_title,
                profile.app_version
            );
            UserProfile::new(APP_TITLE, version)
        }
    } else {
        UserProfile::new(APP_TITLE, version)
    };
    let profile = stored.into_shared();

    if let Err(e) = bus.publish(Event::Load {
        profile: profile.clone(),
    }) {
        tracing::warn!("Keeping configured volumes: {:#}", e);
    }

    println!("===========================================");
    println!("  Audio playback demo (headless backend)");
    println!("===========================================");
    println!(
        "  Music volume: {:.2}  Sound volume: {:.2}\n",
        manager.music_volume(),
        manager.sound_volume()
    );

    let (theme, theme_player) = MemoryAssets::music("theme", Duration::from_secs(3));
    let (jump, jump_clip) = MemoryAssets::sound("jump", Duration::from_millis(400));
    manager.play_music(&theme);

    let tick = Duration::from_millis(config.tick_interval_ms);
    let frames = (RUN_LENGTH.as_millis() / tick.as_millis()) as usize;

    for frame in 0..frames {
        if frame == 10 {
            manager.play_sound(&jump);
        }
        if frame == frames / 2 {
            bus.publish(Event::Notification {
                message: "Halfway there".to_string(),
            })?;
            manager.pause_all_music();
        }
        if frame == frames / 2 + 5 {
            manager.resume_all_music();
        }

        theme_player.advance(tick);
        jump_clip.advance(tick);
        assets.notification_clip().advance(tick);

        bus.publish(Event::Update {
            tpf: tick.as_secs_f64(),
        })?;
    }

    println!("  Theme: {}", manager.music_state(&theme).description());
    println!("  Active sounds: {}", manager.active_sound_count());
    println!("  Active music: {}", manager.active_music_count());

    bus.publish(Event::Save {
        profile: profile.clone(),
    })?;
    profile.read().save_to_file(&profile_path)?;
    println!("  Saved profile to: {}", profile_path.display());
    println!("  Events delivered: {}", events.try_iter().count());

    manager.stop_all_sounds();
    manager.stop_all_music();
    drop(manager);
    tracing::info!("Shut down cleanly");
    Ok(())
}
