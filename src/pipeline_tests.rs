// Integration tests for the emotion pipeline
// These use synthetic WAV fixtures to exercise the audio path end to end
// and the degraded-result convention both classifiers share.

#[cfg(test)]
mod tests {
    use crate::audio::{AudioEmotionProvider, MfccConfig, AUDIO_EMOTION_LABELS, FEATURE_DIM};
    use crate::history::{ChatHistory, ChatMessage, Sender};
    use crate::result::{EmotionResult, OrDegraded, ERROR_LABEL};
    use std::f32::consts::PI;
    use std::io::Write;
    use std::path::Path;

    const SAMPLE_RATE: u32 = 16000;

    // Write a sine tone as 16-bit mono WAV
    fn write_tone_wav(path: &Path, freq: f32, secs: f32, sample_rate: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let n = (sample_rate as f32 * secs) as usize;
        for i in 0..n {
            let t = i as f32 / sample_rate as f32;
            let s = ((2.0 * PI * freq * t).sin() * 0.5 * i16::MAX as f32) as i16;
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    // A speech-like mix of harmonics, closer to real input than a pure tone
    fn write_speechlike_wav(path: &Path, secs: f32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let n = (SAMPLE_RATE as f32 * secs) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let sample = (2.0 * PI * 200.0 * t).sin() * 0.4
                + (2.0 * PI * 400.0 * t).sin() * 0.3
                + (2.0 * PI * 800.0 * t).sin() * 0.2;
            writer
                .write_sample((sample * i16::MAX as f32 * 0.8) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }

    fn provider() -> AudioEmotionProvider {
        AudioEmotionProvider::new(MfccConfig::default()).expect("Failed to build provider")
    }

    #[test]
    fn test_audio_distribution_sums_to_one() {
        let file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        write_speechlike_wav(file.path(), 1.0);

        let result = provider().predict(file.path()).unwrap();
        assert!(
            (result.probability_sum() - 1.0).abs() < 1e-3,
            "probabilities sum to {}",
            result.probability_sum()
        );
    }

    #[test]
    fn test_audio_result_invariants() {
        let file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        write_tone_wav(file.path(), 440.0, 1.0, SAMPLE_RATE);

        let result = provider().predict(file.path()).unwrap();

        // The dominant entry carries exactly the confidence, and nothing
        // beats it
        assert_eq!(result.all_emotions[&result.dominant_emotion], result.confidence);
        assert!(result
            .all_emotions
            .values()
            .all(|&p| p <= result.confidence));
        assert!(AUDIO_EMOTION_LABELS.contains(&result.dominant_emotion.as_str()));
    }

    #[test]
    fn test_same_file_twice_is_bit_identical() {
        let file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        write_speechlike_wav(file.path(), 2.0);

        let mut p = provider();
        let a = p.predict(file.path()).unwrap();
        let b = p.predict(file.path()).unwrap();
        assert_eq!(a, b);

        // And across provider instances
        let c = provider().predict(file.path()).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn test_fixed_tone_features_are_stable_and_13_dim() {
        let file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        write_tone_wav(file.path(), 440.0, 1.0, SAMPLE_RATE);

        let mut p = provider();
        let first = p.features(file.path()).unwrap();
        assert_eq!(first.len(), FEATURE_DIM);

        for _ in 0..3 {
            let again = p.features(file.path()).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_missing_file_degrades_instead_of_raising() {
        let result = provider()
            .predict(Path::new("/nonexistent/upload.wav"))
            .or_degraded();

        assert_eq!(result.dominant_emotion, ERROR_LABEL);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.all_emotions.len(), 1);
        assert!(!result.error.as_deref().unwrap_or_default().is_empty());
    }

    #[test]
    fn test_corrupt_file_degrades_with_message() {
        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        file.write_all(b"definitely not audio data").unwrap();
        file.flush().unwrap();

        let result = provider().predict(file.path()).or_degraded();
        assert!(result.is_degraded());
        assert_eq!(result.dominant_emotion, ERROR_LABEL);
        assert!(!result.error.unwrap().is_empty());
    }

    #[test]
    fn test_non_16k_input_is_resampled_transparently() {
        let file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        write_tone_wav(file.path(), 440.0, 1.0, 44100);

        let result = provider().predict(file.path()).unwrap();
        assert!(!result.is_degraded());
        assert_eq!(result.all_emotions.len(), 4);
    }

    #[test]
    fn test_chat_round_trip_shapes_history() {
        let file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        write_speechlike_wav(file.path(), 0.5);

        let mut p = provider();
        let mut history = ChatHistory::new();

        // Audio turn
        history.push(ChatMessage::user_audio("clip.wav"));
        let result = p.predict(file.path()).or_degraded();
        history.push(ChatMessage::bot_audio("clip.wav", result));

        // Failed turn still lands in the history as a bot message
        history.push(ChatMessage::user_audio("broken.wav"));
        let degraded = p.predict(Path::new("/no/broken.wav")).or_degraded();
        history.push(ChatMessage::bot_audio("broken.wav", degraded));

        assert_eq!(history.len(), 4);
        let messages = history.messages();
        assert_eq!(messages[0].sender, Sender::User);
        assert!(messages[0].result.is_none());
        assert!(!messages[1].result.as_ref().unwrap().is_degraded());
        assert!(messages[3].result.as_ref().unwrap().is_degraded());

        // Earlier failures never disturb earlier entries
        assert_eq!(messages[1].content, "clip.wav");

        history.clear();
        assert_eq!(history.len(), 0);
    }

    #[test]
    fn test_degraded_results_share_one_shape() {
        // Whatever the failing modality, consumers see the same sentinel
        let audio_failure = provider()
            .predict(Path::new("/no/file.wav"))
            .or_degraded();
        let synthetic_text_failure: Result<EmotionResult, String> =
            Err("inference failed".to_string());
        let text_failure = synthetic_text_failure.or_degraded();

        assert_eq!(audio_failure.dominant_emotion, text_failure.dominant_emotion);
        assert_eq!(audio_failure.confidence, text_failure.confidence);
        assert_eq!(
            audio_failure.all_emotions.keys().collect::<Vec<_>>(),
            text_failure.all_emotions.keys().collect::<Vec<_>>()
        );
    }
}
