//! Audio boundary
//!
//! The simulation only ever calls [`AudioSink::play`] and [`AudioSink::stop`].
//! A missing or failing backend turns every call into a no-op.

use std::io::{self, Write};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Game start / resume
    Start,
    /// Bomb caught
    Catch,
    /// Bomb hit the floor
    Miss,
    /// Level cleared
    LevelUp,
    /// Game lost
    GameOver,
}

/// A plain sine tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u32,
}

impl SoundEffect {
    pub fn tone(&self) -> Tone {
        let (frequency_hz, duration_ms) = match self {
            SoundEffect::Start => (440, 100),
            SoundEffect::Catch => (880, 50),
            SoundEffect::Miss => (165, 300),
            SoundEffect::LevelUp => (523, 200),
            SoundEffect::GameOver => (110, 1000),
        };
        Tone {
            frequency_hz,
            duration_ms,
        }
    }
}

/// What the game loop needs from audio
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    fn stop(&mut self);
}

/// Silent sink
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
    fn stop(&mut self) {}
}

/// A recorded audio call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    Play(SoundEffect),
    Stop,
}

/// Sink that remembers every call (for replays and tests)
#[derive(Debug, Clone, Default)]
pub struct AudioLog {
    pub calls: Vec<AudioCall>,
}

impl AudioLog {
    pub fn played(&self, effect: SoundEffect) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == AudioCall::Play(effect))
            .count()
    }
}

impl AudioSink for AudioLog {
    fn play(&mut self, effect: SoundEffect) {
        self.calls.push(AudioCall::Play(effect));
    }

    fn stop(&mut self) {
        self.calls.push(AudioCall::Stop);
    }
}

/// Device that can sound a tone
pub trait AudioBackend {
    fn start_tone(&mut self, tone: Tone, volume: f32) -> io::Result<()>;
    fn silence(&mut self) -> io::Result<()>;
}

/// Rings the terminal bell for long tones (miss, game over)
pub struct TerminalBell<W: Write> {
    out: W,
    min_duration_ms: u32,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            min_duration_ms: 300,
        }
    }
}

impl<W: Write> AudioBackend for TerminalBell<W> {
    fn start_tone(&mut self, tone: Tone, _volume: f32) -> io::Result<()> {
        if tone.duration_ms >= self.min_duration_ms {
            self.out.write_all(b"\x07")?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn silence(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    playing: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AudioManager {
    pub fn new(backend: Option<Box<dyn AudioBackend>>) -> Self {
        if backend.is_none() {
            log::warn!("No audio backend - audio disabled");
        }
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            playing: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Drop a backend that failed; every later call becomes a no-op
    fn disable(&mut self, err: io::Error) {
        log::warn!("Audio backend failed ({err}) - audio disabled");
        self.backend = None;
        self.playing = false;
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else { return };

        // A new effect cuts off the one still sounding
        let result = if self.playing {
            backend.silence().and_then(|_| backend.start_tone(effect.tone(), vol))
        } else {
            backend.start_tone(effect.tone(), vol)
        };
        match result {
            Ok(()) => self.playing = true,
            Err(err) => self.disable(err),
        }
    }

    fn stop(&mut self) {
        if !self.playing {
            return;
        }
        let Some(backend) = self.backend.as_mut() else { return };
        match backend.silence() {
            Ok(()) => self.playing = false,
            Err(err) => self.disable(err),
        }
    }
}
