//! Tokenization, stop words and small text helpers

use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Standard English stop words removed before vectorizing.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
    "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Function words plus filler that shows up in nearly every job ad.
const POSTING_NOISE_WORDS: &[&str] = &[
    "and", "the", "for", "with", "or", "in", "on", "at", "to", "of", "a", "an", "is", "are",
    "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "can", "must", "shall", "this", "that", "these", "those",
    "we", "you", "they", "he", "she", "it", "i", "me", "us", "them", "him", "her", "my", "your",
    "our", "their", "his", "its", "auction", "experience", "work", "working", "job", "position",
    "role", "team", "company", "business", "years", "skills", "knowledge",
];

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    noise_words: HashSet<&'static str>,
    term_regex: Regex,
    alpha_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let term_regex = Regex::new(r"\b\w\w+\b").expect("Invalid term regex");
        let alpha_regex = Regex::new(r"[a-z]+").expect("Invalid alphabetic regex");

        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
            noise_words: POSTING_NOISE_WORDS.iter().copied().collect(),
            term_regex,
            alpha_regex,
        }
    }

    /// Lower-cased terms of two or more word characters, stop words removed.
    pub fn vector_terms(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.term_regex
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|term| !self.stop_words.contains(term))
            .map(str::to_string)
            .collect()
    }

    /// Lower-cased runs of ASCII letters; everything else separates tokens.
    pub fn alphabetic_tokens(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.alpha_regex
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn is_posting_noise(&self, word: &str) -> bool {
        self.noise_words.contains(word)
    }
}

/// Upper-case the first letter, lower-case the rest.
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// First `max_graphemes` user-perceived characters of `text`.
pub fn truncate_graphemes(text: &str, max_graphemes: usize) -> &str {
    match text.grapheme_indices(true).nth(max_graphemes) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
