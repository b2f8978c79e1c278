use std::error::Error;
use std::f32::consts::TAU;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rand::RngExt;
use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

const SAMPLE_RATE: u32 = 44_100;
const BGM_VOLUME: f32 = 0.4;
const LAUNCH_SECS: f32 = 0.2;
const EXPLOSION_SECS: f32 = 0.4;

/// The fallback tune, C major and cheerful: (frequency Hz, duration s)
/// events, synthesized once and looped forever.
pub const MELODY: &[(f32, f32)] = &[
    (523.25, 0.15), // C5
    (587.33, 0.15), // D5
    (659.25, 0.15), // E5
    (783.99, 0.30), // G5
    (659.25, 0.15), // E5
    (587.33, 0.15), // D5
    (523.25, 0.30), // C5
    (392.00, 0.20), // G4
    (440.00, 0.20), // A4
    (493.88, 0.40), // B4
    (523.25, 0.15), // C5
    (659.25, 0.15), // E5
    (783.99, 0.40), // G5
];

struct Output {
    handle: OutputStreamHandle,
    bgm: Option<Sink>,
    muted: bool,
    // keeps the device open for the life of the manager
    _stream: OutputStream,
}

/// Best-effort sound. Every call is a no-op when the output device could
/// not be opened, when muted, or when an individual cue fails to queue —
/// the show itself never notices audio problems.
pub struct SoundManager {
    out: Option<Output>,
}

impl SoundManager {
    /// Sound permanently off (tests, --silent).
    pub fn disabled() -> Self {
        SoundManager { out: None }
    }

    /// Open the default output device; without one, sound stays off for the
    /// whole session.
    pub fn init() -> Self {
        match OutputStream::try_default() {
            Ok((stream, handle)) => SoundManager {
                out: Some(Output {
                    handle,
                    bgm: None,
                    muted: false,
                    _stream: stream,
                }),
            },
            Err(e) => {
                eprintln!("skyburst: audio unavailable ({e}), continuing silently");
                SoundManager { out: None }
            }
        }
    }

    pub fn enabled(&self) -> bool {
        self.out.is_some()
    }

    pub fn muted(&self) -> bool {
        self.out.as_ref().is_none_or(|o| o.muted)
    }

    /// Returns the new muted state.
    pub fn toggle_mute(&mut self) -> bool {
        let Some(out) = &mut self.out else {
            return true;
        };
        out.muted = !out.muted;
        if let Some(bgm) = &out.bgm {
            bgm.set_volume(if out.muted { 0.0 } else { BGM_VOLUME });
        }
        out.muted
    }

    /// Short rising chirp for a shell leaving the ground.
    pub fn play_launch(&self) {
        self.play_cue(launch_cue());
    }

    /// Noise thump through a falling low-pass for a shell bursting.
    pub fn play_explosion(&self) {
        self.play_cue(explosion_cue());
    }

    fn play_cue(&self, cue: SamplesBuffer<f32>) {
        let Some(out) = &self.out else { return };
        if out.muted {
            return;
        }
        let _ = out.handle.play_raw(cue.convert_samples());
    }

    /// Start background music: the given file if it decodes, otherwise the
    /// built-in melody. Does nothing if music is already playing.
    pub fn start_bgm(&mut self, file: Option<&Path>) {
        let Some(out) = &mut self.out else { return };
        if out.bgm.is_some() {
            return;
        }

        let sink = match file {
            Some(path) => match bgm_from_file(&out.handle, path) {
                Ok(sink) => sink,
                Err(e) => {
                    eprintln!(
                        "skyburst: music file '{}' failed ({e}), using the built-in melody",
                        path.display()
                    );
                    match bgm_fallback(&out.handle) {
                        Ok(sink) => sink,
                        Err(_) => return,
                    }
                }
            },
            None => match bgm_fallback(&out.handle) {
                Ok(sink) => sink,
                Err(_) => return,
            },
        };

        sink.set_volume(if out.muted { 0.0 } else { BGM_VOLUME });
        out.bgm = Some(sink);
    }

    pub fn stop_bgm(&mut self) {
        if let Some(out) = &mut self.out
            && let Some(sink) = out.bgm.take()
        {
            sink.stop();
        }
    }
}

fn bgm_from_file(handle: &OutputStreamHandle, path: &Path) -> Result<Sink, Box<dyn Error>> {
    let source = Decoder::new(BufReader::new(File::open(path)?))?;
    let sink = Sink::try_new(handle)?;
    sink.append(source.repeat_infinite());
    Ok(sink)
}

fn bgm_fallback(handle: &OutputStreamHandle) -> Result<Sink, Box<dyn Error>> {
    let sink = Sink::try_new(handle)?;
    sink.append(melody_loop().repeat_infinite());
    Ok(sink)
}

fn seconds_to_samples(secs: f32) -> usize {
    (secs * SAMPLE_RATE as f32) as usize
}

/// Sine chirp sweeping up one octave from 400 Hz, fading out linearly.
fn launch_cue() -> SamplesBuffer<f32> {
    let n = seconds_to_samples(LAUNCH_SECS);
    let mut phase = 0.0f32;
    let samples: Vec<f32> = (0..n)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let freq = 400.0 * 2f32.powf(t / LAUNCH_SECS);
            phase += TAU * freq / SAMPLE_RATE as f32;
            let fade = 1.0 - t / LAUNCH_SECS;
            phase.sin() * 0.05 * fade
        })
        .collect();
    SamplesBuffer::new(1, SAMPLE_RATE, samples)
}

/// White noise through a one-pole low-pass whose cutoff falls from 1 kHz to
/// 100 Hz, over a sub-bass rumble.
fn explosion_cue() -> SamplesBuffer<f32> {
    let n = seconds_to_samples(EXPLOSION_SECS);
    let mut rng = rand::rng();
    let mut lp = 0.0f32;
    let samples: Vec<f32> = (0..n)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let cutoff = 1000.0 * 0.1f32.powf(t / EXPLOSION_SECS);
            let alpha = (TAU * cutoff / SAMPLE_RATE as f32).min(1.0);
            let noise: f32 = rng.random_range(-1.0..1.0);
            lp += alpha * (noise - lp);
            let rumble = (TAU * 55.0 * t).sin() * 0.3;
            let envelope = (-t * 8.0).exp();
            (lp * 0.9 + rumble) * envelope * 0.3
        })
        .collect();
    SamplesBuffer::new(1, SAMPLE_RATE, samples)
}

/// One pass of MELODY: sine lead over a triangle an octave down.
fn melody_loop() -> SamplesBuffer<f32> {
    let total: usize = MELODY.iter().map(|&(_, dur)| seconds_to_samples(dur)).sum();
    let mut samples = Vec::with_capacity(total);
    for &(freq, dur) in MELODY {
        for i in 0..seconds_to_samples(dur) {
            let t = i as f32 / SAMPLE_RATE as f32;
            let envelope = note_envelope(t, dur);
            let lead = (TAU * freq * t).sin() * 0.3;
            let bass = triangle(TAU * freq * 0.5 * t) * 0.15;
            samples.push((lead + bass) * envelope);
        }
    }
    SamplesBuffer::new(1, SAMPLE_RATE, samples)
}

/// Quick linear attack, exponential decay scaled to the note length.
fn note_envelope(t: f32, dur: f32) -> f32 {
    if t < 0.02 {
        t / 0.02
    } else {
        (-(t - 0.02) * (3.0 / dur)).exp()
    }
}

fn triangle(phase: f32) -> f32 {
    (2.0 / std::f32::consts::PI) * phase.sin().asin()
}
