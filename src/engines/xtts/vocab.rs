use std::collections::HashMap;
use std::path::Path;

use super::model::XttsError;

/// Build the character vocabulary from a Coqui-style config.json.
///
/// The config must contain a `"characters"` object with `"characters"` and
/// (optionally) `"punctuations"` strings.
pub fn load_vocab(config_path: &Path) -> Result<HashMap<char, i64>, XttsError> {
    let content = std::fs::read_to_string(config_path)?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| XttsError::Config(format!("failed to parse JSON: {e}")))?;
    from_json(&json)
}

/// Build the vocabulary from an already-parsed config.
pub fn from_json(config: &serde_json::Value) -> Result<HashMap<char, i64>, XttsError> {
    let characters = config
        .get("characters")
        .and_then(|v| v.as_object())
        .ok_or_else(|| XttsError::Config("missing 'characters' object".to_string()))?;

    let letters = characters
        .get("characters")
        .and_then(|v| v.as_str())
        .ok_or_else(|| XttsError::Config("missing 'characters.characters' string".to_string()))?;
    let punctuations = characters
        .get("punctuations")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    Ok(build_vocab(letters, punctuations))
}

/// Default LJSpeech character set, used when config.json carries no vocabulary.
pub fn default_vocab() -> HashMap<char, i64> {
    build_vocab(
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz",
        "!'(),-.:;? ",
    )
}

/// Token ID 0 is reserved for padding; punctuation follows, then letters.
fn build_vocab(letters: &str, punctuations: &str) -> HashMap<char, i64> {
    let mut map = HashMap::new();
    let mut next_id = 1i64;
    for ch in punctuations.chars().chain(letters.chars()) {
        map.entry(ch).or_insert_with(|| {
            let id = next_id;
            next_id += 1;
            id
        });
    }
    map
}

/// Map text to token IDs. Characters outside the vocabulary are silently
/// dropped, matching the reference tokenizer.
pub fn tokenize(text: &str, vocab: &HashMap<char, i64>) -> Vec<i64> {
    text.chars().filter_map(|c| vocab.get(&c).copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocab_covers_basic_text() {
        let vocab = default_vocab();
        let tokens = tokenize("Hello, world!", &vocab);
        // Every character of the text is in the default set.
        assert_eq!(tokens.len(), "Hello, world!".chars().count());
        assert!(tokens.iter().all(|&t| t > 0));
    }

    #[test]
    fn unknown_characters_are_dropped() {
        let vocab = build_vocab("ab", "");
        assert_eq!(tokenize("aXbY", &vocab), vec![1, 2]);
        assert!(tokenize("漢字", &vocab).is_empty());
    }

    #[test]
    fn duplicate_characters_keep_first_id() {
        let vocab = build_vocab("aba", "");
        assert_eq!(vocab[&'a'], 1);
        assert_eq!(vocab[&'b'], 2);
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn vocab_from_config_json() {
        let config: serde_json::Value = serde_json::from_str(
            r#"{"characters": {"characters": "abc", "punctuations": ".! "}}"#,
        )
        .unwrap();
        let vocab = from_json(&config).unwrap();
        assert_eq!(vocab[&'.'], 1);
        assert_eq!(vocab[&'a'], 4);

        let missing: serde_json::Value = serde_json::from_str("{}").unwrap();
        assert!(from_json(&missing).is_err());
    }
}
