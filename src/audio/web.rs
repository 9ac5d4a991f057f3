//! Browser audio: `<audio>` elements for music and the death sound, Web Audio
//! oscillators for the short flap/point blips.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use super::{Clip, MediaService};
use crate::settings::Settings;

/// DOM id of the looping background track
pub const MUSIC_ELEMENT_ID: &str = "bgMusic";
/// DOM id of the crash sound
pub const DEATH_ELEMENT_ID: &str = "deathSound";

/// Audio manager for the browser build
pub struct WebMedia {
    ctx: Option<AudioContext>,
    music: Option<HtmlAudioElement>,
    death: Option<HtmlAudioElement>,
    music_volume: f32,
    sfx_volume: f32,
}

impl WebMedia {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - synthesized sounds disabled");
        }

        let music = audio_element(MUSIC_ELEMENT_ID);
        if let Some(music) = &music {
            music.set_loop(true);
        }

        Self {
            ctx,
            music,
            death: audio_element(DEATH_ELEMENT_ID),
            music_volume: settings.effective_music_volume(),
            sfx_volume: settings.effective_sfx_volume(),
        }
    }

    /// Pick up changed volumes or mute
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.music_volume = settings.effective_music_volume();
        self.sfx_volume = settings.effective_sfx_volume();
        if let Some(music) = &self.music {
            music.set_volume(self.music_volume as f64);
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Flap - short upward chirp
    fn play_flap(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(700.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Point - two-note ding
    fn play_point(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [800.0, 1200.0].iter().enumerate() {
            let delay = i as f64 * 0.07;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Death without a `<audio>` element - sad descending
    fn play_death_synth(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }

    /// Audio context ready for synthesis, resumed if the browser suspended it
    fn live_context(&self) -> Option<&AudioContext> {
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }
}

impl MediaService for WebMedia {
    fn play_background_loop(&mut self) {
        if let Some(music) = &self.music {
            music.set_volume(self.music_volume as f64);
            play_from_start(music, MUSIC_ELEMENT_ID);
        }
    }

    fn stop_background_loop(&mut self) {
        if let Some(music) = &self.music {
            if let Err(e) = music.pause() {
                log::warn!("Failed to pause music: {:?}", e);
            }
        }
    }

    fn play_one_shot(&mut self, clip: Clip) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }

        match clip {
            Clip::Death => {
                if let Some(death) = &self.death {
                    death.set_volume(vol as f64);
                    play_from_start(death, DEATH_ELEMENT_ID);
                } else if let Some(ctx) = self.live_context() {
                    self.play_death_synth(ctx, vol);
                }
            }
            Clip::Flap => {
                if let Some(ctx) = self.live_context() {
                    self.play_flap(ctx, vol);
                }
            }
            Clip::Point => {
                if let Some(ctx) = self.live_context() {
                    self.play_point(ctx, vol);
                }
            }
        }
    }
}

fn audio_element(id: &str) -> Option<HtmlAudioElement> {
    let element = web_sys::window()?.document()?.get_element_by_id(id);
    match element.map(|e| e.dyn_into::<HtmlAudioElement>()) {
        Some(Ok(audio)) => Some(audio),
        Some(Err(_)) => {
            log::warn!("#{} is not an <audio> element", id);
            None
        }
        None => {
            log::warn!("No #{} element - that sound is disabled", id);
            None
        }
    }
}

/// Rewind and play; a rejected play promise is logged, never propagated
fn play_from_start(element: &HtmlAudioElement, label: &'static str) {
    element.set_current_time(0.0);
    match element.play() {
        Ok(promise) => {
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("#{} playback rejected: {:?}", label, e);
                }
            });
        }
        Err(e) => log::warn!("#{} playback failed: {:?}", label, e),
    }
}
