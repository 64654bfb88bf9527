use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, SeedableRng};
use reelspin_core::{
    AudioCue, RandDigits, RecordingSink, ReelPhase, SeededDigits, SettingsError, Settings,
    SoundFx, SpinController, TimingConfig, WidgetEvent,
};

fn widget(count: usize, sound_on: bool, seed: u64) -> (SpinController, RecordingSink) {
    let rec = RecordingSink::new();
    let ctl = SpinController::new(
        Settings {
            digit_count: count,
            sound_enabled: sound_on,
        },
        TimingConfig::default(),
        Box::new(RandDigits::new(StdRng::seed_from_u64(seed))),
        SoundFx::new(Box::new(rec.clone()), sound_on),
    )
    .unwrap();
    (ctl, rec)
}

/// Steps the clock 1ms at a time and stamps each event with the step it fired on.
fn run_until_idle(ctl: &mut SpinController, from: u64) -> Vec<(u64, WidgetEvent)> {
    let mut out = Vec::new();
    let mut now = from;
    while ctl.is_spinning() {
        now += 1;
        out.extend(ctl.advance(now).into_iter().map(|ev| (now, ev)));
        assert!(now < from + 60_000, "cycle never completed");
    }
    out
}

#[test]
fn resize_covers_full_range() {
    let (mut ctl, _) = widget(4, false, 1);
    ctl.request_spin(0).unwrap();
    run_until_idle(&mut ctl, 0);
    let spun = ctl.values();

    // Grow first, then shrink step by step: truncation only ever drops the tail.
    for n in (1..=10).rev() {
        ctl.set_digit_count(n).unwrap();
        assert_eq!(ctl.reels().len(), n);
        let keep = n.min(4);
        assert_eq!(&ctl.values()[..keep], &spun[..keep]);
    }
    // Everything past the first four positions was appended fresh.
    ctl.set_digit_count(1).unwrap();
    ctl.set_digit_count(10).unwrap();
    assert_eq!(&ctl.values()[1..], &[0u8; 9][..]);
    assert!(ctl.reel_states().iter().all(|r| r.phase == ReelPhase::Idle));
    for (i, r) in ctl.reel_states().iter().enumerate() {
        assert_eq!(r.position, i);
    }
}

#[test]
fn resize_out_of_range_rejected() {
    let (mut ctl, _) = widget(4, false, 1);
    assert_eq!(
        ctl.set_digit_count(0),
        Err(SettingsError::DigitCountOutOfRange(0))
    );
    assert_eq!(
        ctl.set_digit_count(11),
        Err(SettingsError::DigitCountOutOfRange(11))
    );
    assert_eq!(ctl.reels().len(), 4);
}

#[test]
fn settle_times_follow_stagger() {
    let timing = TimingConfig::default();
    let (mut ctl, _) = widget(10, false, 9);
    let start = 250;
    ctl.request_spin(start).unwrap();
    let planned: Vec<u64> = ctl.reels().iter().filter_map(|r| r.settle_at()).collect();
    assert_eq!(planned.len(), 10);
    let events = run_until_idle(&mut ctl, start);
    assert!(ctl.reels().iter().all(|r| r.settle_at().is_none()));

    let settles: Vec<(usize, u64)> = events
        .iter()
        .filter_map(|(step, ev)| match ev {
            WidgetEvent::ReelStopped { position, at, .. } => {
                assert_eq!(at, step);
                Some((*position, *at))
            }
            _ => None,
        })
        .collect();
    assert_eq!(settles.len(), 10);

    for (i, (position, at)) in settles.iter().enumerate() {
        assert_eq!(*position, i);
        assert_eq!(*at, planned[i]);
        assert!(*at - start >= timing.base_spin_ms + i as u64 * timing.stagger_ms);
        if i > 0 {
            assert!(*at > settles[i - 1].1);
        }
    }

    let (done_at, last) = events.last().unwrap();
    assert!(matches!(last, WidgetEvent::CycleComplete { .. }));
    assert!(*done_at >= settles[9].1);
}

#[test]
fn four_digit_scenario() {
    let (mut ctl, rec) = widget(4, true, 42);
    let cycle = ctl.request_spin(0).unwrap();
    assert_eq!(cycle.reel_count(), 4);
    let targets = cycle.target_values.clone();
    assert_eq!(targets.len(), 4);
    assert!(targets.iter().all(|d| *d <= 9));
    assert!(ctl.is_spinning());
    assert_eq!(rec.cues(), vec![AudioCue::Click]);

    let events: Vec<WidgetEvent> = run_until_idle(&mut ctl, 0)
        .into_iter()
        .map(|(_, ev)| ev)
        .collect();
    let expected = vec![
        WidgetEvent::ReelStopped { position: 0, value: targets[0], at: 1000 },
        WidgetEvent::ReelStopped { position: 1, value: targets[1], at: 1150 },
        WidgetEvent::ReelStopped { position: 2, value: targets[2], at: 1300 },
        WidgetEvent::ReelStopped { position: 3, value: targets[3], at: 1450 },
        WidgetEvent::CycleComplete { at: 2100, values: targets.clone() },
    ];
    assert_eq!(events, expected);

    assert!(!ctl.is_spinning());
    assert_eq!(ctl.values(), targets);
    assert_eq!(
        rec.cues(),
        vec![
            AudioCue::Click,
            AudioCue::ReelStop,
            AudioCue::ReelStop,
            AudioCue::ReelStop,
            AudioCue::ReelStop,
            AudioCue::Win,
        ]
    );
    assert_eq!(ctl.pending_timers(), 0);
}

#[test]
fn sound_off_is_silent_for_whole_cycle() {
    let (mut ctl, rec) = widget(4, true, 3);
    assert!(!ctl.toggle_sound());
    ctl.request_spin(0).unwrap();
    let events = run_until_idle(&mut ctl, 0);
    assert_eq!(events.len(), 5);
    assert!(rec.cues().is_empty());
    assert!(!ctl.sound().is_enabled());
}

#[test]
fn teardown_mid_spin_cancels_everything() {
    let (mut ctl, rec) = widget(6, true, 5);
    ctl.request_spin(0).unwrap();
    let early = ctl.advance(1200);
    assert_eq!(early.len(), 2);

    let cancelled = ctl.teardown();
    assert_eq!(cancelled, 4 + 1);
    assert_eq!(ctl.pending_timers(), 0);
    assert!(!ctl.is_spinning());

    assert!(ctl.advance(100_000).is_empty());
    assert_eq!(rec.count(AudioCue::ReelStop), 2);
    assert_eq!(rec.count(AudioCue::Win), 0);
    assert!(ctl.reel_states().iter().all(|r| r.phase == ReelPhase::Idle));
}

#[test]
fn seeded_runs_replay() {
    let build = || {
        SpinController::new(
            Settings::default(),
            TimingConfig::turbo(),
            Box::new(SeededDigits::new("replay", "test")),
            SoundFx::silent(),
        )
        .unwrap()
    };
    let mut a = build();
    let mut b = build();
    let mut now = 0;
    for _ in 0..5 {
        let ta = a.request_spin(now).unwrap().target_values.clone();
        let tb = b.request_spin(now).unwrap().target_values.clone();
        assert_eq!(ta, tb);
        now += TimingConfig::turbo().completion_offset(4);
        a.advance(now);
        b.advance(now);
        assert!(!a.is_spinning());
        assert_eq!(a.values(), ta);
    }
}

#[test]
fn events_serialize_tagged() {
    let ev = WidgetEvent::ReelStopped { position: 1, value: 7, at: 1150 };
    let json = serde_json::to_string(&ev).unwrap();
    assert_eq!(json, r#"{"event":"reel_stopped","position":1,"value":7,"at":1150}"#);
}
