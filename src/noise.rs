// noise.rs
//
// Stateless classifier for STT noise artifacts. Whisper emits bracketed
// markers for non-speech audio; Gemini tags noise-only chunks with a literal
// token. Anything this module rejects never reaches the accumulator.

/// Whisper STT noise patterns to filter out
pub const WHISPER_NOISE_PATTERNS: &[&str] = &[
    "[BLANK_AUDIO]",
    "[INAUDIBLE]",
    "[MUSIC]",
    "[SOUND]",
    "[NOISE]",
    "(BLANK_AUDIO)",
    "(INAUDIBLE)",
    "(MUSIC)",
    "(SOUND)",
    "(NOISE)",
];

/// Noise token Gemini uses for chunks with no speech content
pub const GEMINI_NOISE_TOKEN: &str = "<noise>";

/// True if a trimmed Whisper transcript is a noise artifact: it contains or
/// equals a known marker, or is too short to be meaningful speech (<= 2 chars).
pub fn is_whisper_noise(text: &str) -> bool {
    if text.chars().count() <= 2 {
        return true;
    }
    WHISPER_NOISE_PATTERNS
        .iter()
        .any(|pattern| text.contains(pattern) || text == *pattern)
}

/// True if a trimmed Gemini chunk carries no usable speech
pub fn is_gemini_noise(text: &str) -> bool {
    text.is_empty() || text == GEMINI_NOISE_TOKEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_are_noise() {
        for pattern in WHISPER_NOISE_PATTERNS {
            assert!(is_whisper_noise(pattern), "pattern not filtered: {}", pattern);
        }
    }

    #[test]
    fn test_pattern_embedded_in_text_is_noise() {
        assert!(is_whisper_noise("so [MUSIC] playing"));
    }

    #[test]
    fn test_short_strings_are_noise() {
        assert!(is_whisper_noise(""));
        assert!(is_whisper_noise("ok"));
        assert!(is_whisper_noise("ab"));
        // Multi-byte chars count as chars, not bytes
        assert!(is_whisper_noise("éé"));
    }

    #[test]
    fn test_real_speech_passes() {
        assert!(!is_whisper_noise("hello world"));
        assert!(!is_whisper_noise("oui"));
    }

    #[test]
    fn test_gemini_noise_token() {
        assert!(is_gemini_noise("<noise>"));
        assert!(is_gemini_noise(""));
        assert!(!is_gemini_noise("bonjour"));
    }
}
