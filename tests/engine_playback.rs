use oasis_dsp::{
    dsp::filter::FilterType,
    graph::{Destination, Node, Param},
    io::{OfflineBackend, OfflineRenderer},
    presets::shredder,
    EngineConfig, EngineError, PlaybackState, SoundscapeEngine, SoundscapeKind,
};

const SAMPLE_RATE: f32 = 8_000.0;

fn engine() -> (SoundscapeEngine, OfflineRenderer) {
    let config = EngineConfig {
        noise_seconds: 0.25,
        ..EngineConfig::default()
    };
    let backend = OfflineBackend::new(SAMPLE_RATE);
    let renderer = backend.renderer();
    let engine = SoundscapeEngine::new(config, Box::new(backend)).expect("valid config");
    (engine, renderer)
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

#[test]
fn play_then_stop_leaves_no_nodes_for_every_kind() {
    let (mut engine, _renderer) = engine();
    engine.set_volume(0.4);

    for kind in SoundscapeKind::ALL {
        engine.play(kind, 0.4).expect("play");
        assert_eq!(engine.state(), PlaybackState::Playing(kind));
        assert!(engine.active_node_count() > 0, "{kind:?} has no nodes");

        engine.stop();
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert_eq!(engine.active_node_count(), 0, "{kind:?} leaked nodes");
        assert_eq!(engine.sink_gain(), 0.4, "stop must not reset the volume");
    }
}

#[test]
fn latest_volume_wins() {
    let (mut engine, _renderer) = engine();

    engine.set_volume(0.2);
    engine.play(SoundscapeKind::Rain, 0.8).expect("play");
    assert_eq!(engine.sink_gain(), 0.8);

    engine.set_volume(0.3);
    assert_eq!(engine.sink_gain(), 0.3);
    engine.stop();
    engine.set_volume(0.9);
    engine.set_volume(0.1);
    assert_eq!(engine.sink_gain(), 0.1);
    assert_eq!(engine.volume(), 0.1);

    engine.set_volume(7.0);
    assert_eq!(engine.sink_gain(), 1.0);
    engine.set_volume(-1.0);
    assert_eq!(engine.sink_gain(), 0.0);
}

#[test]
fn second_play_replaces_the_first_session() {
    let (mut engine, _renderer) = engine();

    engine.play(SoundscapeKind::Ocean, 0.5).expect("play ocean");
    let first_id = engine.with_session(|s| s.id()).expect("session");

    engine.play(SoundscapeKind::Bowl, 0.5).expect("play bowl");
    assert_eq!(engine.state(), PlaybackState::Playing(SoundscapeKind::Bowl));
    assert_eq!(engine.active_node_count(), 6);

    let (kind, id, filters) = engine
        .with_session(|s| {
            let graph = s.graph();
            let filters = graph
                .ids()
                .filter(|&id| graph.node(id).and_then(Node::as_filter).is_some())
                .count();
            (s.kind(), s.id(), filters)
        })
        .expect("session");
    assert_eq!(kind, SoundscapeKind::Bowl);
    assert_ne!(id, first_id);
    assert_eq!(filters, 0, "ocean's filter survived the switch");
}

#[test]
fn replaying_the_same_kind_restarts_it() {
    let (mut engine, _renderer) = engine();
    engine.play(SoundscapeKind::Rain, 0.5).expect("play");
    let first = engine.with_session(|s| s.id());
    engine.play(SoundscapeKind::Rain, 0.5).expect("play again");
    let second = engine.with_session(|s| s.id());

    assert_eq!(engine.state(), PlaybackState::Playing(SoundscapeKind::Rain));
    assert_ne!(first, second);
    assert_eq!(engine.active_node_count(), 2);
}

#[test]
fn ocean_topology() {
    let (mut engine, _renderer) = engine();
    engine.play(SoundscapeKind::Ocean, 0.5).expect("play");
    assert_eq!(engine.sink_gain(), 0.5);

    engine
        .with_session(|session| {
            let graph = session.graph();
            assert_eq!(graph.len(), 4);

            let mut sources = 0;
            let mut lowpass = None;
            let mut lfo = None;
            let mut depth = None;
            for id in graph.ids() {
                match graph.node(id).expect("node") {
                    Node::NoiseSource(_) => sources += 1,
                    Node::Filter(filter) => {
                        assert_eq!(filter.filter_type(), FilterType::LowPass);
                        assert_eq!(filter.frequency(), 500.0);
                        assert_eq!(graph.destination(id), Some(Destination::Sink));
                        lowpass = Some(id);
                    }
                    Node::Oscillator(osc) => {
                        assert_eq!(osc.frequency(), 0.15);
                        lfo = Some(id);
                    }
                    Node::Gain(gain) => {
                        assert_eq!(gain.gain(), 400.0);
                        depth = Some(id);
                    }
                }
            }

            let (lowpass, lfo, depth) = (
                lowpass.expect("lowpass"),
                lfo.expect("lfo"),
                depth.expect("depth"),
            );
            assert_eq!(sources, 1);
            assert_eq!(graph.destination(lfo), Some(Destination::Input(depth)));
            assert_eq!(
                graph.destination(depth),
                Some(Destination::Param(lowpass, Param::Frequency))
            );
        })
        .expect("session");
}

#[test]
fn bowl_topology_and_level() {
    let (mut engine, renderer) = engine();
    engine.play(SoundscapeKind::Bowl, 0.3).expect("play");
    assert_eq!(engine.sink_gain(), 0.3);
    assert_eq!(engine.active_node_count(), 6);

    let (oscillators, gains) = engine
        .with_session(|s| {
            let graph = s.graph();
            let mut oscillators: Vec<f32> = graph
                .ids()
                .filter_map(|id| graph.node(id).and_then(Node::as_oscillator))
                .map(|osc| osc.frequency())
                .collect();
            oscillators.sort_by(f32::total_cmp);
            let gains: Vec<f32> = graph
                .ids()
                .filter_map(|id| graph.node(id).and_then(Node::as_gain))
                .map(|gain| gain.gain())
                .collect();
            (oscillators, gains)
        })
        .expect("session");
    assert_eq!(oscillators, vec![180.0, 182.0, 540.0]);
    assert_eq!(gains, vec![0.2, 0.2, 0.2]);

    // Three partials at 0.2 through a 0.3 sink can never exceed 0.18
    let audio = renderer.render_mono(SAMPLE_RATE as usize);
    let level = peak(&audio);
    assert!(level > 0.05 && level <= 0.18 + 1e-4, "peak {level}");
}

#[test]
fn stop_when_idle_is_a_no_op() {
    let (mut engine, renderer) = engine();
    engine.stop();
    engine.stop();
    assert_eq!(engine.state(), PlaybackState::Idle);
    assert!(!engine.is_output_open());
    assert!(!renderer.is_open());
}

#[test]
fn unavailable_output_leaves_idle_state() {
    let config = EngineConfig::default();
    let mut engine =
        SoundscapeEngine::new(config, Box::new(OfflineBackend::unavailable("no device")))
            .expect("valid config");

    let err = engine.play(SoundscapeKind::Rain, 0.5).unwrap_err();
    assert!(matches!(err, EngineError::Unavailable(_)));
    assert_eq!(engine.state(), PlaybackState::Idle);

    assert!(matches!(
        engine.play_one_shot(),
        Err(EngineError::Unavailable(_))
    ));

    // Volume is still recorded for the next successful play
    engine.set_volume(0.7);
    assert_eq!(engine.volume(), 0.7);
    assert_eq!(engine.sink_gain(), 0.7);
    assert_eq!(engine.state(), PlaybackState::Idle);
}

#[test]
fn failed_resume_keeps_current_soundscape() {
    let (mut engine, renderer) = engine();
    engine.play(SoundscapeKind::Rain, 0.5).expect("play");

    renderer.set_resume_failure(true);
    let err = engine.play(SoundscapeKind::Ocean, 0.9).unwrap_err();
    assert!(matches!(err, EngineError::Unavailable(_)));
    assert_eq!(engine.state(), PlaybackState::Playing(SoundscapeKind::Rain));
    assert_eq!(engine.active_node_count(), 2);
    assert_eq!(engine.sink_gain(), 0.5);

    renderer.set_resume_failure(false);
    engine.play(SoundscapeKind::Ocean, 0.9).expect("recovers");
    assert_eq!(engine.state(), PlaybackState::Playing(SoundscapeKind::Ocean));
}

#[test]
fn output_opens_lazily_once() {
    let (mut engine, renderer) = engine();
    assert!(!renderer.is_open());

    engine.set_volume(0.5);
    assert!(renderer.is_open());
    assert_eq!(engine.sample_rate(), Some(SAMPLE_RATE));

    engine.play(SoundscapeKind::Forest, 0.5).expect("play");
    engine.stop();
    assert!(engine.is_output_open());
}

#[test]
fn one_shot_envelope() {
    let curve = shredder::envelope().expect("valid envelope");
    assert_eq!(curve.value_at(0.0), 0.0);
    assert!(curve.value_at(0.1) >= 0.75);
    assert!(curve.value_at(3.0) <= 0.02);
}

#[test]
fn one_shot_layers_over_loop_and_self_terminates() {
    let (mut engine, renderer) = engine();
    engine.set_volume(1.0);

    engine.play_one_shot().expect("one-shot");
    assert_eq!(engine.state(), PlaybackState::Idle);
    assert_eq!(engine.one_shot_count(), 1);

    let head = renderer.render_mono((SAMPLE_RATE * 0.5) as usize);
    assert!(peak(&head) > 0.0, "one-shot is silent");

    engine.play(SoundscapeKind::Bowl, 1.0).expect("play");
    assert_eq!(engine.one_shot_count(), 1, "one-shot must survive play");
    assert_eq!(engine.state(), PlaybackState::Playing(SoundscapeKind::Bowl));

    // Past the 3 s envelope the one-shot is finished; the next call reaps it
    renderer.render_mono((SAMPLE_RATE * 2.6) as usize);
    engine.stop();
    assert_eq!(engine.one_shot_count(), 0);

    let tail = renderer.render_mono(512);
    assert!(tail.iter().all(|&s| s == 0.0));
}

#[test]
fn one_shots_are_capped() {
    let (mut engine, _renderer) = engine();
    for _ in 0..10 {
        engine.play_one_shot().expect("one-shot");
    }
    assert_eq!(engine.one_shot_count(), EngineConfig::default().max_one_shots);
}

#[test]
fn toggle_matches_caller_behavior() {
    let (mut engine, _renderer) = engine();

    let state = engine.toggle(SoundscapeKind::Stream, 0.5).expect("toggle");
    assert_eq!(state, PlaybackState::Playing(SoundscapeKind::Stream));

    let state = engine.toggle(SoundscapeKind::Stream, 0.5).expect("toggle");
    assert_eq!(state, PlaybackState::Idle);

    engine.toggle(SoundscapeKind::Stream, 0.5).expect("toggle");
    let state = engine.toggle(SoundscapeKind::PinkNoise, 0.5).expect("toggle");
    assert_eq!(state, PlaybackState::Playing(SoundscapeKind::PinkNoise));
}

#[test]
fn dropping_the_engine_silences_output() {
    let (mut engine, renderer) = engine();
    engine.play(SoundscapeKind::WhiteNoise, 1.0).expect("play");
    engine.play_one_shot().expect("one-shot");
    assert!(peak(&renderer.render(256)) > 0.0);

    drop(engine);
    assert!(renderer.render(256).iter().all(|&s| s == 0.0));
}

#[test]
fn volume_changes_during_playback_never_drop_a_block() {
    let (mut engine, renderer) = engine();
    engine.play(SoundscapeKind::Rain, 0.6).expect("play");

    // Prime the callback so a locked mixer has a block to repeat
    assert!(peak(&renderer.render(256)) > 0.0);

    let worker = {
        let renderer = renderer.clone();
        std::thread::spawn(move || {
            (0..400)
                .filter(|_| renderer.render(256).iter().all(|&s| s == 0.0))
                .count()
        })
    };

    let mut step = 0u32;
    while !worker.is_finished() {
        let level = 0.2 + 0.8 * (step % 5) as f32 / 4.0;
        engine.set_volume(level);
        assert!(engine.active_node_count() > 0);
        engine.with_session(|session| session.node_count());
        step = step.wrapping_add(1);
    }

    let silent_blocks = worker.join().expect("render thread");
    assert_eq!(silent_blocks, 0, "rendered blocks dropped to silence");
    assert_eq!(engine.state(), PlaybackState::Playing(SoundscapeKind::Rain));
}

#[test]
fn status_queries_track_control_calls() {
    let (mut engine, renderer) = engine();
    assert_eq!(engine.active_node_count(), 0);
    assert_eq!(engine.one_shot_count(), 0);

    engine.play(SoundscapeKind::Ocean, 0.5).expect("play");
    engine.play_one_shot().expect("one-shot");
    assert_eq!(engine.active_node_count(), 4);
    assert_eq!(engine.one_shot_count(), 1);

    // Volume written while playing lands on the open sink
    engine.set_volume(0.25);
    assert_eq!(engine.sink_gain(), 0.25);

    renderer.render_mono((SAMPLE_RATE * 3.2) as usize);
    engine.stop();
    assert_eq!(engine.active_node_count(), 0);
    assert_eq!(engine.one_shot_count(), 0);
    assert_eq!(engine.sink_gain(), 0.25);
}
