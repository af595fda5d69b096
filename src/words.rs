//! Static word tables.
//!
//! The daily word game draws from a curated list of five-letter words, each
//! carrying a category hint; guesses must themselves appear in the list. The
//! drawing game offers its drawer words from a separate pool, and room codes
//! use an alphabet with the ambiguous glyphs (0/O, 1/I/L) removed.

/// A curated daily-game word with its category hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordEntry {
    /// The target word, exactly five lowercase letters.
    pub word: &'static str,
    /// Category hint shown once the game completes.
    pub hint: &'static str,
}

/// Curated list for the daily word game.
pub const WORD_LIST: &[WordEntry] = &[
    WordEntry { word: "apple", hint: "fruit" },
    WordEntry { word: "mango", hint: "fruit" },
    WordEntry { word: "lemon", hint: "fruit" },
    WordEntry { word: "melon", hint: "fruit" },
    WordEntry { word: "peach", hint: "fruit" },
    WordEntry { word: "grape", hint: "fruit" },
    WordEntry { word: "berry", hint: "fruit" },
    WordEntry { word: "olive", hint: "fruit" },
    WordEntry { word: "guava", hint: "fruit" },
    WordEntry { word: "tiger", hint: "animal" },
    WordEntry { word: "zebra", hint: "animal" },
    WordEntry { word: "horse", hint: "animal" },
    WordEntry { word: "mouse", hint: "animal" },
    WordEntry { word: "whale", hint: "animal" },
    WordEntry { word: "shark", hint: "animal" },
    WordEntry { word: "eagle", hint: "animal" },
    WordEntry { word: "snake", hint: "animal" },
    WordEntry { word: "camel", hint: "animal" },
    WordEntry { word: "otter", hint: "animal" },
    WordEntry { word: "bison", hint: "animal" },
    WordEntry { word: "llama", hint: "animal" },
    WordEntry { word: "sloth", hint: "animal" },
    WordEntry { word: "koala", hint: "animal" },
    WordEntry { word: "gecko", hint: "animal" },
    WordEntry { word: "moose", hint: "animal" },
    WordEntry { word: "geese", hint: "animal" },
    WordEntry { word: "robin", hint: "animal" },
    WordEntry { word: "crane", hint: "animal" },
    WordEntry { word: "quail", hint: "animal" },
    WordEntry { word: "bread", hint: "food" },
    WordEntry { word: "pizza", hint: "food" },
    WordEntry { word: "pasta", hint: "food" },
    WordEntry { word: "salsa", hint: "food" },
    WordEntry { word: "onion", hint: "food" },
    WordEntry { word: "bacon", hint: "food" },
    WordEntry { word: "toast", hint: "food" },
    WordEntry { word: "honey", hint: "food" },
    WordEntry { word: "candy", hint: "food" },
    WordEntry { word: "river", hint: "nature" },
    WordEntry { word: "ocean", hint: "nature" },
    WordEntry { word: "beach", hint: "nature" },
    WordEntry { word: "storm", hint: "nature" },
    WordEntry { word: "cloud", hint: "nature" },
    WordEntry { word: "flame", hint: "nature" },
    WordEntry { word: "stone", hint: "nature" },
    WordEntry { word: "plant", hint: "nature" },
    WordEntry { word: "grass", hint: "nature" },
    WordEntry { word: "maple", hint: "nature" },
    WordEntry { word: "cedar", hint: "nature" },
    WordEntry { word: "level", hint: "word" },
    WordEntry { word: "chair", hint: "object" },
    WordEntry { word: "table", hint: "object" },
    WordEntry { word: "piano", hint: "object" },
    WordEntry { word: "flute", hint: "object" },
    WordEntry { word: "clock", hint: "object" },
    WordEntry { word: "knife", hint: "object" },
    WordEntry { word: "spoon", hint: "object" },
    WordEntry { word: "plate", hint: "object" },
    WordEntry { word: "brush", hint: "object" },
    WordEntry { word: "broom", hint: "object" },
    WordEntry { word: "green", hint: "color" },
    WordEntry { word: "black", hint: "color" },
    WordEntry { word: "white", hint: "color" },
    WordEntry { word: "brown", hint: "color" },
    WordEntry { word: "coral", hint: "color" },
    WordEntry { word: "amber", hint: "color" },
];

/// Case-insensitive list lookup.
pub fn lookup(word: &str) -> Option<&'static WordEntry> {
    WORD_LIST.iter().find(|e| e.word.eq_ignore_ascii_case(word))
}

/// Pool of words offered to the drawer in the drawing game.
pub const DRAWING_WORDS: &[&str] = &[
    "house",
    "bicycle",
    "rainbow",
    "guitar",
    "elephant",
    "castle",
    "rocket",
    "pirate",
    "dragon",
    "island",
    "campfire",
    "snowman",
    "tornado",
    "lighthouse",
    "butterfly",
    "umbrella",
    "robot",
    "wizard",
    "violin",
    "volcano",
    "penguin",
    "mermaid",
    "sandwich",
    "telescope",
    "waterfall",
    "skateboard",
    "helicopter",
    "dinosaur",
    "octopus",
    "scarecrow",
];

/// Room-code alphabet, unambiguous glyphs only.
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_curated_word_is_five_lowercase_letters() {
        for entry in WORD_LIST {
            assert_eq!(entry.word.len(), 5, "{}", entry.word);
            assert!(
                entry.word.chars().all(|c| c.is_ascii_lowercase()),
                "{}",
                entry.word
            );
            assert!(!entry.hint.is_empty());
        }
    }

    #[test]
    fn curated_words_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for entry in WORD_LIST {
            assert!(seen.insert(entry.word), "duplicate {}", entry.word);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert!(lookup("Apple").is_some());
        assert!(lookup("APPLE").is_some());
        assert!(lookup("apples").is_none());
    }

    #[test]
    fn room_code_alphabet_omits_ambiguous_glyphs() {
        for banned in b"01OIL" {
            assert!(!ROOM_CODE_ALPHABET.contains(banned));
        }
    }
}
