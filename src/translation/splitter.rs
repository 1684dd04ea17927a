/// Splits long text into sentence-aligned chunks of bounded character length.
///
/// Lengths count `char`s, not bytes. A single sentence longer than the limit is
/// emitted whole.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    max_chars: usize,
    terminators: Vec<char>,
}

impl TextSplitter {
    pub fn new(max_chars: usize, terminators: Vec<char>) -> Self {
        Self {
            max_chars,
            terminators,
        }
    }

    /// Fragments ending right after each terminator; the tail may lack one.
    pub fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_inclusive(|c: char| self.terminators.contains(&c))
            .collect()
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_chars = 0;

        for sentence in self.sentences(text) {
            let sentence_chars = sentence.chars().count();

            if current_chars + sentence_chars > self.max_chars && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
            }

            current.push_str(sentence);
            current_chars += sentence_chars;
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn splitter(max_chars: usize) -> TextSplitter {
        TextSplitter::new(max_chars, vec!['。', '.'])
    }

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = splitter(100).split("这是第一句。这是第二句。");
        assert_eq!(chunks, vec!["这是第一句。这是第二句。"]);
    }

    #[test]
    fn splits_at_limit_on_sentence_boundary() {
        // each sentence is 6 chars
        let chunks = splitter(12).split("这是第一句。这是第二句。这是第三句。");
        assert_eq!(chunks, vec!["这是第一句。这是第二句。", "这是第三句。"]);
    }

    #[test]
    fn oversized_sentence_is_not_subdivided() {
        let long = "一".repeat(30) + "。";
        let text = format!("短句。{}短句。", long);
        let chunks = splitter(10).split(&text);
        assert_eq!(chunks, vec!["短句。".to_string(), long, "短句。".to_string()]);
    }

    #[test]
    fn oversized_first_sentence_emits_no_empty_chunk() {
        let text = "a".repeat(20) + ".b.";
        let chunks = splitter(5).split(&text);
        assert_eq!(chunks, vec!["a".repeat(20) + ".", "b.".to_string()]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(splitter(10).split("").is_empty());
    }

    #[test]
    fn trailing_text_without_terminator_is_kept() {
        let chunks = splitter(4).split("ab.cd");
        assert_eq!(chunks, vec!["ab.", "cd"]);
    }

    #[test]
    fn custom_terminators_are_honoured() {
        let splitter = TextSplitter::new(3, vec!['；']);
        assert_eq!(splitter.split("甲乙；丙丁；"), vec!["甲乙；", "丙丁；"]);
    }

    #[rstest]
    #[case("")]
    #[case("no terminators at all in this one")]
    #[case("1. A device. 2. The device of claim 1, wherein.")]
    #[case("一种电池组件。包括壳体、电芯和盖板。所述壳体为铝合金。所述盖板设有防爆阀。")]
    #[case("mixed 中文。and English. 以及更多内容。。..")]
    #[case("...。。。")]
    fn chunks_concatenate_to_input_and_respect_limit(#[case] text: &str) {
        for max_chars in [1, 2, 5, 8, 13, 600] {
            let splitter = splitter(max_chars);
            let chunks = splitter.split(text);

            assert_eq!(chunks.concat(), text, "max_chars = {}", max_chars);

            for chunk in &chunks {
                assert!(!chunk.is_empty());
                let within_limit = chunk.chars().count() <= max_chars;
                let single_sentence = splitter.sentences(chunk).len() == 1;
                assert!(
                    within_limit || single_sentence,
                    "chunk {:?} exceeds {} and has several sentences",
                    chunk,
                    max_chars
                );
            }
        }
    }
}
