//! Audio worker: tones, sample files and the three jingles.

use super::PresentationError;
use super::latch::CommandLatch;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, trace};

/// Playback volume [%].
pub const VOLUME: u8 = 100;

/// A single beep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    /// Frequency [Hz]; 0 is silence.
    pub freq: u32,
    pub duration_ms: u32,
}

impl Tone {
    pub const fn new(freq: u32, duration_ms: u32) -> Self {
        Self { freq, duration_ms }
    }
}

/// Paddle hit.
pub const HIT_TONE: Tone = Tone::new(420, 50);

/// Wall bounce.
pub const WALL_TONE: Tone = Tone::new(210, 50);

/// Next serve is coming.
pub const SERVE_TONE: Tone = Tone::new(250, 100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Note {
    Play(Tone),
    Rest(u64),
}

const COUNTDOWN: &[Note] = &[
    Note::Play(Tone::new(300, 150)),
    Note::Rest(700),
    Note::Play(Tone::new(300, 150)),
    Note::Rest(700),
    Note::Play(Tone::new(300, 150)),
    Note::Rest(700),
    Note::Play(Tone::new(1000, 500)),
];

const MISS: &[Note] = &[
    Note::Play(Tone::new(0, 50)),
    Note::Rest(150),
    Note::Play(Tone::new(0, 50)),
    Note::Rest(150),
    Note::Play(Tone::new(0, 500)),
];

const VICTORY: &[Note] = &[
    Note::Play(Tone::new(400, 150)),
    Note::Rest(50),
    Note::Play(Tone::new(400, 500)),
];

/// Pause after a sample file [ms].
const SAMPLE_TAIL_MS: u64 = 50;

/// Tone and sample playback primitives. Playback blocks until done.
pub trait Speaker: Send {
    fn play_tone(&mut self, tone: Tone, volume: u8) -> Result<(), PresentationError>;

    fn play_sample(&mut self, path: &Path, volume: u8) -> Result<(), PresentationError>;

    /// Silence between notes.
    fn rest(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Request for the audio worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCommand {
    File(PathBuf),
    Tone(Tone),
    Countdown,
    Miss,
    Victory,
}

fn play_jingle(speaker: &mut dyn Speaker, notes: &[Note]) -> Result<(), PresentationError> {
    for note in notes {
        match *note {
            Note::Play(tone) => speaker.play_tone(tone, VOLUME)?,
            Note::Rest(ms) => speaker.rest(Duration::from_millis(ms)),
        }
    }
    Ok(())
}

fn execute(speaker: &mut dyn Speaker, command: &AudioCommand) -> Result<(), PresentationError> {
    match command {
        AudioCommand::File(path) => {
            speaker.play_sample(path, VOLUME)?;
            speaker.rest(Duration::from_millis(SAMPLE_TAIL_MS));
            Ok(())
        }
        AudioCommand::Tone(tone) => speaker.play_tone(*tone, VOLUME),
        AudioCommand::Countdown => play_jingle(speaker, COUNTDOWN),
        AudioCommand::Miss => play_jingle(speaker, MISS),
        AudioCommand::Victory => play_jingle(speaker, VICTORY),
    }
}

/// Handle to the audio worker thread. Every request is fire-and-forget.
pub struct Audio {
    latch: Arc<CommandLatch<AudioCommand>>,
    worker: Option<JoinHandle<()>>,
}

impl Audio {
    pub fn spawn(mut speaker: Box<dyn Speaker>) -> Result<Self, PresentationError> {
        let latch = Arc::new(CommandLatch::new());
        let worker = {
            let latch = latch.clone();
            thread::Builder::new()
                .name("audio".to_string())
                .spawn(move || run_audio(speaker.as_mut(), &latch))
                .map_err(|e| PresentationError::Device(e.to_string()))?
        };
        Ok(Self {
            latch,
            worker: Some(worker),
        })
    }

    pub fn play_file(&self, path: impl Into<PathBuf>) {
        self.latch.post(AudioCommand::File(path.into()));
    }

    pub fn tone(&self, tone: Tone) {
        self.latch.post(AudioCommand::Tone(tone));
    }

    pub fn countdown(&self) {
        self.latch.post(AudioCommand::Countdown);
    }

    pub fn miss(&self) {
        self.latch.post(AudioCommand::Miss);
    }

    pub fn victory(&self) {
        self.latch.post(AudioCommand::Victory);
    }

    /// Stop the worker once the pending command has played.
    pub fn shutdown(mut self) {
        self.latch.close();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for Audio {
    fn drop(&mut self) {
        self.latch.close();
    }
}

fn run_audio(speaker: &mut dyn Speaker, latch: &CommandLatch<AudioCommand>) {
    while let Some(command) = latch.wait() {
        trace!("Audio: {:?}", command);
        if let Err(e) = execute(speaker, &command) {
            error!("Audio worker stopped on {:?}: {}", command, e);
            return;
        }
    }
    debug!("Audio worker finished");
}

/// Speaker that logs what it would play and keeps every tone.
pub struct TracingSpeaker {
    played: Arc<Mutex<Vec<Tone>>>,
    paced: bool,
}

impl TracingSpeaker {
    /// Takes as long as real playback would.
    pub fn new() -> Self {
        Self {
            played: Arc::default(),
            paced: true,
        }
    }

    pub fn unpaced() -> Self {
        Self {
            paced: false,
            ..Self::new()
        }
    }

    /// Shared list of every tone played so far.
    pub fn transcript(&self) -> Arc<Mutex<Vec<Tone>>> {
        self.played.clone()
    }
}

impl Default for TracingSpeaker {
    fn default() -> Self {
        Self::new()
    }
}

impl Speaker for TracingSpeaker {
    fn play_tone(&mut self, tone: Tone, volume: u8) -> Result<(), PresentationError> {
        debug!("speaker: {} Hz for {} ms at {}%", tone.freq, tone.duration_ms, volume);
        self.played.lock().push(tone);
        self.rest(Duration::from_millis(tone.duration_ms as u64));
        Ok(())
    }

    fn play_sample(&mut self, path: &Path, volume: u8) -> Result<(), PresentationError> {
        if !path.exists() {
            return Err(PresentationError::Device(format!(
                "sample {} not found",
                path.display()
            )));
        }
        debug!("speaker: sample {} at {}%", path.display(), volume);
        Ok(())
    }

    fn rest(&mut self, duration: Duration) {
        if self.paced {
            thread::sleep(duration);
        }
    }
}
