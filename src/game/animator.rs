//! # Animator
//!
//! Named frame sequences played back at a fixed rate.

use super::timer::Timer;
use std::collections::HashMap;

/// Plays named clips of sprite-sheet frame indices.
///
/// # Examples
///
/// ```
/// use pixelfw::Animator;
///
/// let mut anim = Animator::new();
/// anim.add("walk", &[1, 2, 3]);
/// anim.play("walk", 0.1, false);
/// assert_eq!(anim.frame(), 1);
///
/// for _ in 0..10 {
///     anim.update(0.1);
/// }
/// assert_eq!(anim.frame(), 3);
/// assert!(anim.is_finished());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Animator {
    clips: HashMap<String, Vec<u32>>,
    current: Option<String>,
    timer: Timer,
    looping: bool,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a clip, replacing any clip with the same name.
    pub fn add(&mut self, name: impl Into<String>, frames: &[u32]) {
        self.clips.insert(name.into(), frames.to_vec());
    }

    /// Selects a clip. Playback restarts only if the clip or its speed changes, so this
    /// can be called every frame.
    ///
    /// Unknown clip names are ignored.
    pub fn play(&mut self, name: &str, speed: f32, looping: bool) {
        if !self.clips.contains_key(name) {
            log::debug!("Animator has no clip named '{}'", name);
            return;
        }
        let same_clip = self.current.as_deref() == Some(name);
        if !same_clip || self.timer.speed != speed {
            self.current = Some(name.to_string());
            self.timer = Timer::new(speed);
        }
        self.looping = looping;
    }

    pub fn update(&mut self, dt: f32) {
        if self.current.is_some() {
            self.timer.tick(dt);
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    fn clip(&self) -> Option<&[u32]> {
        let name = self.current.as_ref()?;
        self.clips.get(name).map(Vec::as_slice)
    }

    /// Position inside the current clip.
    fn position(&self, len: usize) -> usize {
        let step = self.timer.frame() as usize;
        if self.looping {
            step % len
        } else {
            step.min(len - 1)
        }
    }

    /// The sheet index to draw. Zero when nothing is playing.
    pub fn frame(&self) -> u32 {
        match self.clip() {
            Some(frames) if !frames.is_empty() => frames[self.position(frames.len())],
            _ => 0,
        }
    }

    /// True once a non-looping clip has reached its last frame.
    pub fn is_finished(&self) -> bool {
        match self.clip() {
            Some(frames) if !self.looping => {
                self.timer.frame() as usize + 1 >= frames.len()
            }
            _ => false,
        }
    }
}
