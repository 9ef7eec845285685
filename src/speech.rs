//! Text-to-speech for notifications.
//!
//! Speech is fire-and-forget: the synthesiser is spawned and never awaited,
//! and a missing synthesiser only produces a debug log line.

use std::process::{Command, Stdio};

/// Locale used when the environment does not name one.
pub const FALLBACK_LOCALE: &str = "en-US";

/// Reads text aloud.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str, locale: &str);
}

/// Speech disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&self, _text: &str, _locale: &str) {}
}

/// Uses the platform's command-line synthesiser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpeaker;

impl Speaker for SystemSpeaker {
    fn speak(&self, text: &str, locale: &str) {
        if text.trim().is_empty() {
            return;
        }
        for (program, args) in speech_commands(text, locale) {
            let spawned = Command::new(program)
                .args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            match spawned {
                Ok(mut child) => {
                    // Reap in the background so the child never lingers as a zombie.
                    std::thread::spawn(move || {
                        let _ = child.wait();
                    });
                    return;
                }
                Err(e) => log::debug!("Speech synthesiser '{}' unavailable: {}", program, e),
            }
        }
    }
}

/// Candidate synthesiser invocations for the current platform, in order of
/// preference.
pub fn speech_commands(text: &str, locale: &str) -> Vec<(&'static str, Vec<String>)> {
    // Keep a leading dash from being parsed as an option.
    let text = if text.starts_with('-') {
        format!(" {text}")
    } else {
        text.to_string()
    };

    #[cfg(target_os = "macos")]
    {
        let _ = locale; // `say` picks the system voice
        vec![("say", vec![text])]
    }

    #[cfg(target_os = "windows")]
    {
        let _ = locale;
        let script = format!(
            "Add-Type -AssemblyName System.Speech; \
             (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak('{}')",
            text.replace('\'', "''")
        );
        vec![(
            "powershell",
            vec!["-NoProfile".to_string(), "-Command".to_string(), script],
        )]
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let language = locale.split('-').next().unwrap_or("en").to_string();
        vec![
            ("spd-say", vec!["-l".to_string(), language, text.clone()]),
            ("espeak", vec!["-v".to_string(), locale.to_ascii_lowercase(), text]),
        ]
    }
}

/// Detect the user's locale from `LC_ALL`, `LC_MESSAGES` and `LANG`.
pub fn detect_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|value| normalize_locale(&value))
        .unwrap_or_else(|| FALLBACK_LOCALE.to_string())
}

/// Turn a POSIX locale (`en_US.UTF-8`, `de_DE@euro`) into a BCP 47 tag
/// (`en-US`, `de-DE`). Returns `None` for `C`, `POSIX` and empty values.
pub fn normalize_locale(raw: &str) -> Option<String> {
    let base = raw
        .split(['.', '@'])
        .next()
        .unwrap_or("")
        .trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    let mut parts = base.split(['_', '-']);
    let language = parts.next()?.to_ascii_lowercase();
    if language.is_empty() {
        return None;
    }
    match parts.next() {
        Some(region) if !region.is_empty() => {
            Some(format!("{}-{}", language, region.to_ascii_uppercase()))
        }
        _ => Some(language),
    }
}
