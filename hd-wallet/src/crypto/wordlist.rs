//! The BIP39 English word list
//!
//! The table is the 2048-entry list compiled into the `bip39` crate; it is
//! sorted, so lookups are binary searches.

use bip39::Language;

/// Number of words in the list
pub const WORDLIST_LEN: usize = 2048;

/// The full English word list, indexed by 11-bit word index
pub fn wordlist() -> &'static [&'static str; WORDLIST_LEN] {
    Language::English.word_list()
}

/// Index of `word` in the list, if present
pub fn word_index(word: &str) -> Option<u16> {
    wordlist()
        .binary_search_by(|probe| (*probe).cmp(word))
        .ok()
        .map(|i| i as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wordlist_bounds() {
        let list = wordlist();
        assert_eq!(list[0], "abandon");
        assert_eq!(list[3], "about");
        assert_eq!(list[2047], "zoo");
        assert!(list.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_word_index() {
        assert_eq!(word_index("abandon"), Some(0));
        assert_eq!(word_index("zoo"), Some(2047));
        assert_eq!(word_index("vote"), Some(1967));
        assert_eq!(word_index("Abandon"), None);
        assert_eq!(word_index("bitcoin"), None);
        assert_eq!(word_index(""), None);
    }
}
