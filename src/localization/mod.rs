pub mod strings;

/// Looks up a fixed reply. Unknown keys yield an empty string.
pub fn get(key: &str) -> &'static str {
    strings::BILINGUAL_STRINGS.get(key).copied().unwrap_or("")
}

pub fn get_message(message: &str) -> &'static str {
    let key = format!("message_{}", message.to_lowercase());
    get(&key)
}

/// The one reply shown when every oracle attempt failed. Never derived from error detail.
pub fn apology() -> &'static str {
    get("message_apology")
}

pub fn is_greeting(text: &str) -> bool {
    strings::GREETING_WORDS.contains(text.trim().to_lowercase().as_str())
}
