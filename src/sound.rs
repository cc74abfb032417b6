//! Sound playback capability.

use crate::config::{ALARM_SOUND, COMPLETION_SOUND, MSG_COMPLETE};
use log::warn;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

/// The two distinct signals the timer can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// An interval alarm was reached.
    AlarmReached,
    /// The timer finished.
    Completion,
}

pub trait SoundPlayer {
    /// Start playing `signal` from the beginning. Failures are not fatal.
    fn play(&mut self, signal: Signal);
    fn stop_all(&mut self);
}

impl<T: SoundPlayer + ?Sized> SoundPlayer for Box<T> {
    fn play(&mut self, signal: Signal) {
        (**self).play(signal)
    }

    fn stop_all(&mut self) {
        (**self).stop_all()
    }
}

/// Plays nothing. Used when audio elements cannot be created.
#[derive(Debug, Default)]
pub struct Silent;

impl SoundPlayer for Silent {
    fn play(&mut self, _signal: Signal) {}
    fn stop_all(&mut self) {}
}

/// Plays the signals through two `<audio>` elements.
pub struct HtmlAudioPlayer {
    alarm: HtmlAudioElement,
    completion: HtmlAudioElement,
}

impl HtmlAudioPlayer {
    pub fn new() -> Option<Self> {
        let alarm = HtmlAudioElement::new_with_src(ALARM_SOUND).ok()?;
        let completion = HtmlAudioElement::new_with_src(COMPLETION_SOUND).ok()?;
        alarm.set_loop(false);
        completion.set_loop(false);
        Some(Self { alarm, completion })
    }

    fn element(&self, signal: Signal) -> &HtmlAudioElement {
        match signal {
            Signal::AlarmReached => &self.alarm,
            Signal::Completion => &self.completion,
        }
    }
}

impl SoundPlayer for HtmlAudioPlayer {
    fn play(&mut self, signal: Signal) {
        let audio = self.element(signal);
        audio.set_current_time(0.0);
        let promise = match audio.play() {
            Ok(p) => p,
            Err(e) => {
                warn!("Could not play {:?} sound: {:?}", signal, e);
                return;
            }
        };

        // Autoplay policies reject the promise asynchronously.
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                warn!("Could not play {:?} sound: {:?}", signal, e);
                if signal == Signal::Completion {
                    let _ = gloo_utils::window().alert_with_message(MSG_COMPLETE);
                }
            }
        });
    }

    fn stop_all(&mut self) {
        for audio in [&self.alarm, &self.completion] {
            if let Err(e) = audio.pause() {
                warn!("Could not pause audio: {:?}", e);
            }
            audio.set_current_time(0.0);
        }
    }
}

/// Records every call; lets tests assert on what would have been heard.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    pub played: Vec<Signal>,
    pub stops: usize,
}

#[cfg(test)]
impl SoundPlayer for RecordingPlayer {
    fn play(&mut self, signal: Signal) {
        self.played.push(signal);
    }

    fn stop_all(&mut self) {
        self.stops += 1;
    }
}
