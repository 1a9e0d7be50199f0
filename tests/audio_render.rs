use brainwave::analysis::{dominant_frequency, interaural_beat, peak, rms};
use brainwave::io::OfflineOutput;
use brainwave::{
    BinauralGenerator, BrainwaveBand, ControllerConfig, GraphBackend, SessionParameters,
};

const SAMPLE_RATE: f32 = 48_000.0;

type OfflineGenerator = BinauralGenerator<GraphBackend<OfflineOutput>>;

fn generator(params: SessionParameters) -> OfflineGenerator {
    BinauralGenerator::new(GraphBackend::new(OfflineOutput::new(SAMPLE_RATE)), params)
}

fn render(generator: &mut OfflineGenerator, seconds: f32) -> (Vec<f32>, Vec<f32>) {
    generator
        .backend_mut()
        .output_mut()
        .render_seconds(seconds)
        .unwrap()
}

fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

#[test]
fn default_session_renders_200_and_206() {
    let mut gen = generator(SessionParameters::default());
    gen.start().unwrap();
    let (left, right) = render(&mut gen, 1.0);

    assert_close(dominant_frequency(&left, SAMPLE_RATE).unwrap(), 200.0, 0.2);
    assert_close(dominant_frequency(&right, SAMPLE_RATE).unwrap(), 206.0, 0.2);
    assert_close(interaural_beat(&left, &right, SAMPLE_RATE).unwrap(), 6.0, 0.2);
}

#[test]
fn volume_sets_per_ear_level() {
    let mut gen = generator(SessionParameters::default());
    gen.start().unwrap();
    let (left, right) = render(&mut gen, 0.5);

    // -20 dB sine: peak 0.1, rms 0.1/√2
    for ear in [&left, &right] {
        assert_close(peak(ear), 0.1, 0.002);
        assert_close(rms(ear), 0.1 * std::f32::consts::FRAC_1_SQRT_2, 0.002);
    }

    gen.set_volume(-40.0);
    let (left, _) = render(&mut gen, 0.5);
    assert_close(peak(&left), 0.01, 0.0005);
}

#[test]
fn band_switch_retunes_playing_audio() {
    let mut gen = generator(SessionParameters::default());
    gen.start().unwrap();
    let _ = render(&mut gen, 0.25);

    gen.select_band(BrainwaveBand::Alpha);
    let (left, right) = render(&mut gen, 1.0);

    assert_close(dominant_frequency(&left, SAMPLE_RATE).unwrap(), 200.0, 0.2);
    assert_close(dominant_frequency(&right, SAMPLE_RATE).unwrap(), 210.0, 0.2);
}

#[test]
fn ears_are_fully_separated() {
    // 1000 Hz carrier, gamma beat: tones 40 Hz apart are easy to tell apart
    let params = SessionParameters {
        carrier_hz: 1000.0,
        band: BrainwaveBand::Gamma,
        beat_hz: 40.0,
        ..SessionParameters::default()
    };
    let mut gen = generator(params);
    gen.start().unwrap();
    let (left, right) = render(&mut gen, 1.0);

    assert_close(dominant_frequency(&left, SAMPLE_RATE).unwrap(), 1000.0, 0.2);
    assert_close(dominant_frequency(&right, SAMPLE_RATE).unwrap(), 1040.0, 0.2);

    // Hard panning leaves nothing of the other tone: each ear is one pure sine
    for ear in [&left, &right] {
        assert_close(rms(ear) / peak(ear), std::f32::consts::FRAC_1_SQRT_2, 0.002);
    }
}

#[test]
fn stop_silences_output() {
    let mut gen = generator(SessionParameters::default());
    gen.start().unwrap();
    gen.stop();

    let (left, right) = render(&mut gen, 0.1);
    assert_eq!(peak(&left), 0.0);
    assert_eq!(peak(&right), 0.0);
    assert!(gen.backend().lock().unwrap().is_empty());
}

#[test]
fn unavailable_output_fails_start() {
    let mut gen = BinauralGenerator::new(
        GraphBackend::new(OfflineOutput::unavailable(SAMPLE_RATE, "no device")),
        SessionParameters::default(),
    );
    assert!(gen.start().is_err());
    assert!(!gen.is_playing());
    assert!(gen.backend().lock().unwrap().is_empty());
}

#[test]
fn test_tone_plays_for_one_second() {
    let params = SessionParameters {
        volume_db: -40.0,
        ..SessionParameters::default()
    };
    let mut gen = BinauralGenerator::with_config(
        GraphBackend::new(OfflineOutput::new(SAMPLE_RATE)),
        params,
        ControllerConfig { test_tone: true },
    );
    gen.start().unwrap();

    // Tone at -20 dB drowns the -40 dB session while it lasts
    let (left, _) = render(&mut gen, 0.5);
    assert_close(dominant_frequency(&left, SAMPLE_RATE).unwrap(), 440.0, 0.5);

    let _ = render(&mut gen, 0.5);
    let (left, right) = render(&mut gen, 1.0);
    assert_close(dominant_frequency(&left, SAMPLE_RATE).unwrap(), 200.0, 0.2);
    assert_close(dominant_frequency(&right, SAMPLE_RATE).unwrap(), 206.0, 0.2);
}
