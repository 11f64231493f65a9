//! Stop word handling for the vectorizer.
//!
//! Genre tokens are numeric ids, so the English list never removes anything
//! from the catalog today. It stays configurable for corpora that tag movies
//! with genre names instead.

use std::collections::HashSet;

/// Tokens dropped before counting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StopWords {
    /// Built-in English list
    #[default]
    English,
    /// Keep every token
    None,
    /// Caller-supplied list, compared after lowercasing
    Custom(HashSet<String>),
}

impl StopWords {
    pub fn custom<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopWords::Custom(words.into_iter().map(|w| w.into().to_lowercase()).collect())
    }

    pub fn contains(&self, token: &str) -> bool {
        match self {
            StopWords::English => ENGLISH_STOP_WORDS.binary_search(&token).is_ok(),
            StopWords::None => false,
            StopWords::Custom(words) => words.contains(token),
        }
    }
}

/// The 318-word English list of the scikit-learn vectorizer, sorted for
/// binary search
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "amoungst",
    "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere",
    "are", "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "bill", "both", "bottom", "but", "by", "call", "can", "cannot", "cant", "co", "con",
    "could", "couldnt", "cry", "de", "describe", "detail", "do", "done", "down", "due", "during",
    "each", "eg", "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc",
    "even", "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
    "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty", "found",
    "four", "from", "front", "full", "further", "get", "give", "go", "had", "has", "hasnt", "have",
    "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon", "hers", "herself",
    "him", "himself", "his", "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed",
    "interest", "into", "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least",
    "less", "ltd", "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more",
    "moreover", "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely",
    "neither", "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor",
    "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed", "seeming",
    "seems", "serious", "several", "she", "should", "show", "side", "since", "sincere", "six",
    "sixty", "so", "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere",
    "still", "such", "system", "take", "ten", "than", "that", "the", "their", "them", "themselves",
    "then", "thence", "there", "thereafter", "thereby", "therefore", "therein", "thereupon",
    "these", "they", "thick", "thin", "third", "this", "those", "though", "three", "through",
    "throughout", "thru", "thus", "to", "together", "too", "top", "toward", "towards", "twelve",
    "twenty", "two", "un", "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well",
    "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who",
    "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet",
    "you", "your", "yours", "yourself", "yourselves",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_list_is_sorted() {
        assert!(ENGLISH_STOP_WORDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_english_list_is_complete() {
        assert_eq!(ENGLISH_STOP_WORDS.len(), 318);
        for word in [
            "two", "three", "show", "fire", "system", "find", "get", "made", "see", "top", "full",
        ] {
            assert!(StopWords::English.contains(word), "{} missing", word);
        }
    }

    #[test]
    fn test_numeric_tokens_survive_english_list() {
        let stop = StopWords::English;
        assert!(stop.contains("the"));
        assert!(stop.contains("yourselves"));
        assert!(!stop.contains("28"));
        assert!(!stop.contains("action"));
    }

    #[test]
    fn test_custom_and_none() {
        let stop = StopWords::custom(["Drama", "18"]);
        assert!(stop.contains("drama"));
        assert!(stop.contains("18"));
        assert!(!stop.contains("the"));
        assert!(!StopWords::None.contains("the"));
    }
}
