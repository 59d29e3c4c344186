use std::thread;
use std::time::{Duration, Instant};

use super::*;
use crate::engine::EnginePhase;
use crate::error::{ErrorKind, PlayerError, PlayerResult};
use crate::library::Track;
use crate::testing::FakeMedia;

const WAIT: Duration = Duration::from_secs(5);

fn track(id: &str) -> Track {
    Track {
        id: id.into(),
        title: format!("Track {id}"),
        artist: "Artist".into(),
        album: String::new(),
        duration: 245.0,
        artwork: String::new(),
        audio_url: format!("https://example.com/{id}.mp3"),
    }
}

fn playlist() -> Playlist {
    Playlist::new("1", "Chill Vibes", vec![track("a"), track("b"), track("c")])
}

fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.player.idle_poll_ms = 10;
    settings
}

fn wait_until(player: &Player, what: &str, cond: impl Fn(&PlayerSnapshot) -> bool) -> PlayerSnapshot {
    let start = Instant::now();
    loop {
        let snap = player.snapshot();
        if cond(&snap) {
            return snap;
        }
        assert!(start.elapsed() < WAIT, "timed out waiting for {what}: {snap:?}");
        thread::sleep(Duration::from_millis(5));
    }
}

fn finish(mut done: Completion) -> PlayerResult<()> {
    done.wait_timeout(WAIT).expect("completion never resolved")
}

#[test]
fn spawn_loads_the_first_track() {
    let media = FakeMedia::auto(245.0);
    let player = Player::spawn(media.clone(), playlist(), settings()).unwrap();

    let snap = wait_until(&player, "first track ready", |s| s.engine.phase == EnginePhase::Ready);
    assert_eq!(snap.playlist_index, Some(0));
    assert_eq!(snap.engine.track.as_ref().map(|t| t.id.as_str()), Some("a"));
    assert_eq!(snap.engine.state.duration, 245.0);
    assert_eq!(snap.order, vec![0, 1, 2]);
    assert_eq!(media.state().loads, 1);
}

#[test]
fn play_round_trip_publishes_state_and_samples() {
    let media = FakeMedia::auto(245.0);
    media.set_spectrum(200, 140);
    let player = Player::spawn(media.clone(), playlist(), settings()).unwrap();
    wait_until(&player, "ready", |s| s.engine.phase == EnginePhase::Ready);

    assert_eq!(finish(player.play()), Ok(()));
    let snap = wait_until(&player, "playing", |s| s.engine.state.is_playing);
    assert_eq!(snap.engine.phase, EnginePhase::Playing);

    let start = Instant::now();
    let sample = loop {
        let sample = player.latest_sample();
        if sample.frame > 0 {
            break sample;
        }
        assert!(start.elapsed() < WAIT, "no visualization sample published");
        thread::sleep(Duration::from_millis(5));
    };
    assert_eq!(sample.frequencies.len(), 128);
    assert!(sample.frequencies.iter().all(|&v| v == 200));

    player.pause();
    wait_until(&player, "paused", |s| s.engine.phase == EnginePhase::Paused);
    assert_eq!(media.state().graphs_built, 1);
}

#[test]
fn previous_from_first_wraps_to_last() {
    let media = FakeMedia::auto(10.0);
    let player = Player::spawn(media.clone(), playlist(), settings()).unwrap();
    wait_until(&player, "ready", |s| s.playlist_index == Some(0));

    assert_eq!(finish(player.previous()), Ok(()));
    let snap = wait_until(&player, "last selected", |s| s.playlist_index == Some(2));
    assert_eq!(snap.engine.track.map(|t| t.id.clone()), Some("c".to_string()));

    assert_eq!(finish(player.next()), Ok(()));
    wait_until(&player, "wrapped to first", |s| s.playlist_index == Some(0));
    assert_eq!(
        media.state().source.as_deref(),
        Some("https://example.com/a.mp3")
    );
}

#[test]
fn select_loads_by_id_and_reports_unknown_ids() {
    let media = FakeMedia::auto(10.0);
    let player = Player::spawn(media, playlist(), settings()).unwrap();

    assert_eq!(finish(player.select("b")), Ok(()));
    wait_until(&player, "b selected", |s| s.playlist_index == Some(1));

    let err = finish(player.select("nope")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unclassified);
    assert_eq!(player.snapshot().playlist_index, Some(1));
}

#[test]
fn volume_and_mute_are_applied_on_the_player_thread() {
    let media = FakeMedia::auto(10.0);
    let player = Player::spawn(media.clone(), playlist(), settings()).unwrap();

    player.set_volume(0.0);
    wait_until(&player, "muted by volume", |s| s.engine.state.is_muted);

    player.set_volume(0.4);
    wait_until(&player, "unmuted", |s| !s.engine.state.is_muted);

    player.toggle_mute();
    wait_until(&player, "muted", |s| s.engine.state.is_muted);
    assert_eq!(media.state().volume, 0.0);

    player.toggle_mute();
    wait_until(&player, "restored", |s| !s.engine.state.is_muted);
    assert_eq!(media.state().volume, 0.4);
}

#[test]
fn shuffle_and_repeat_flags_reach_the_snapshot() {
    let media = FakeMedia::auto(10.0);
    let player = Player::spawn(media, playlist(), settings()).unwrap();

    player.toggle_shuffle();
    let snap = wait_until(&player, "shuffled", |s| s.engine.state.is_shuffled);
    assert_eq!(snap.order[0], 0);
    let mut sorted = snap.order.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![0, 1, 2]);

    player.cycle_repeat();
    wait_until(&player, "repeat all", |s| {
        s.engine.state.repeat_mode == RepeatMode::All
    });

    player.set_shuffle(false);
    let snap = wait_until(&player, "unshuffled", |s| !s.engine.state.is_shuffled);
    assert_eq!(snap.order, vec![0, 1, 2]);
}

#[test]
fn empty_playlist_reports_no_track() {
    let player = Player::spawn(
        FakeMedia::auto(1.0),
        Playlist::from_tracks(Vec::new()),
        settings(),
    )
    .unwrap();

    assert_eq!(finish(player.next()), Err(PlayerError::NoTrackLoaded));
    assert_eq!(finish(player.play()), Err(PlayerError::NoTrackLoaded));
}

#[test]
fn quit_tears_down_the_engine_and_aborts_later_requests() {
    let media = FakeMedia::auto(10.0);
    let player = Player::spawn(media.clone(), playlist(), settings()).unwrap();
    assert_eq!(finish(player.play()), Ok(()));

    player.quit();
    {
        let s = media.state();
        assert_eq!(s.unsubscribes, 1);
        assert_eq!(s.graphs_closed, 1);
    }
    assert!(!player.snapshot().engine.state.is_playing);

    let err = finish(player.play()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PlaybackAborted);

    // Second quit (and the one in Drop) is a no-op.
    player.quit();
}
