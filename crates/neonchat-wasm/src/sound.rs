use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

use neonchat_core::Sound;

/// Short notification blip, shared by both clips
const NOTIFICATION_WAV: &str = "data:audio/wav;base64,UklGRnoGAABXQVZFZm10IBAAAAABAAEAQB8AAEAfAAABAAgAZGF0YQoGAACBhYqFbF1fdJivrJBhNjVgodDbq2EcBj+a2/LDciUFLIHO8tiJNwgZaLvt559NEAxQp+PwtmMcBjiR1/LMeSwFJHfH8N2QQAoUXrTp66hVFApGn+DyvmwhBTGH0fPTgjMGHm7A7+OZTA0PVa3m7q9aFg1Lp+Txunr/BAMm3Pj6/wD/BAMm3Pj6/wD/BAMm3Pj6/wD/BAMm3Pj6";

pub struct SoundBank {
    send: Option<HtmlAudioElement>,
    receive: Option<HtmlAudioElement>,
}

impl SoundBank {
    pub fn new() -> Self {
        Self {
            send: load_clip(NOTIFICATION_WAV),
            receive: load_clip(NOTIFICATION_WAV),
        }
    }

    /// Restart and play a clip. Autoplay rejections are logged, not raised.
    pub fn play(&self, sound: Sound) {
        let clip = match sound {
            Sound::Send => &self.send,
            Sound::Receive => &self.receive,
        };
        let Some(audio) = clip else {
            return;
        };

        audio.set_current_time(0.0);
        match audio.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::debug!("Notification sound blocked: {:?}", e);
                }
            }),
            Err(e) => log::debug!("Failed to play notification sound: {:?}", e),
        }
    }
}

fn load_clip(src: &str) -> Option<HtmlAudioElement> {
    match HtmlAudioElement::new_with_src(src) {
        Ok(audio) => Some(audio),
        Err(e) => {
            log::warn!("Failed to create audio element: {:?}", e);
            None
        }
    }
}
